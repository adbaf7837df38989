use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum Role {
    Employer,
    Employee,
    Admin,
}

/// Full user row. Never serialized to clients — see `UserResponse`.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
}

/// Client-safe projection of a user (no password digest).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Employer).unwrap(), "\"employer\"");
        let role: Role = serde_json::from_str("\"employee\"").unwrap();
        assert_eq!(role, Role::Employee);
    }

    #[test]
    fn test_user_response_has_no_digest() {
        let json = serde_json::to_value(UserResponse {
            id: Uuid::new_v4(),
            email: "a@b.c".to_string(),
            name: "A".to_string(),
            role: Role::Admin,
            created_at: Utc::now(),
        })
        .unwrap();
        assert!(json.get("password_digest").is_none());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "chat_role", rename_all = "snake_case")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A screening thread attached to an application.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ChatRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MessageRow {
    pub id: Uuid,
    pub chat_id: Uuid,
    /// Insertion order within the chat. Transcript replay sorts on this;
    /// timestamps are not guaranteed unique.
    pub seq: i64,
    pub role: MessageRole,
    pub content: String,
    /// Free-form client tag ("question", "evaluation", ...). Stored verbatim.
    pub message_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_serde() {
        assert_eq!(
            serde_json::to_string(&MessageRole::Assistant).unwrap(),
            "\"assistant\""
        );
        let r: MessageRole = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(r, MessageRole::System);
    }
}

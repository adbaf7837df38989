pub mod handlers;
pub mod middleware;
pub mod password;
pub mod sessions;

use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::Role;

/// The authenticated caller, injected by the auth middleware as a request
/// extension.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// 403 unless the caller has `role` (admin passes everything).
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == role || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// 403 unless the caller is `owner` or an admin.
    pub fn require_owner(&self, owner: Uuid) -> Result<(), AppError> {
        if self.id == owner || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: "x@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_admin_passes_role_checks() {
        assert!(user(Role::Admin).require_role(Role::Employer).is_ok());
        assert!(user(Role::Admin).require_owner(Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_role_mismatch_is_forbidden() {
        let u = user(Role::Employee);
        assert!(matches!(
            u.require_role(Role::Employer),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_owner_check() {
        let u = user(Role::Employee);
        assert!(u.require_owner(u.id).is_ok());
        assert!(u.require_owner(Uuid::new_v4()).is_err());
    }
}

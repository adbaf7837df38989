//! Opaque bearer sessions backed by Redis.
//!
//! A login issues a UUIDv4 token; the session payload lives at
//! `session:{token}` with the configured TTL. Logout deletes the key, so
//! revocation is immediate.

use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::user::Role;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
struct SessionPayload {
    user_id: Uuid,
    email: String,
    role: Role,
}

fn session_key(token: &str) -> String {
    format!("session:{token}")
}

/// Stores a new session and returns the opaque token.
pub async fn create_session(state: &AppState, user: &AuthUser) -> Result<String, AppError> {
    let token = Uuid::new_v4().to_string();
    let payload = serde_json::to_string(&SessionPayload {
        user_id: user.id,
        email: user.email.clone(),
        role: user.role,
    })
    .map_err(|e| AppError::Internal(e.into()))?;

    let mut conn = state.redis.get_multiplexed_async_connection().await?;
    let ttl_secs = state.config.session_ttl_hours * 3600;
    conn.set_ex::<_, _, ()>(session_key(&token), payload, ttl_secs)
        .await?;
    Ok(token)
}

/// Resolves a bearer token to its user, or fails with 401.
pub async fn resolve_session(state: &AppState, token: &str) -> Result<AuthUser, AppError> {
    let mut conn = state.redis.get_multiplexed_async_connection().await?;
    let payload: Option<String> = conn.get(session_key(token)).await?;
    let payload = payload.ok_or(AppError::Unauthorized)?;
    let session: SessionPayload =
        serde_json::from_str(&payload).map_err(|_| AppError::Unauthorized)?;
    Ok(AuthUser {
        id: session.user_id,
        email: session.email,
        role: session.role,
    })
}

/// Deletes the session key. Deleting an unknown token is not an error.
pub async fn destroy_session(state: &AppState, token: &str) -> Result<(), AppError> {
    let mut conn = state.redis.get_multiplexed_async_connection().await?;
    conn.del::<_, ()>(session_key(token)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_format() {
        assert_eq!(session_key("abc"), "session:abc");
    }

    #[test]
    fn test_payload_serde_round_trip() {
        let payload = SessionPayload {
            user_id: Uuid::new_v4(),
            email: "a@b.c".to_string(),
            role: Role::Employer,
        };
        let json = serde_json::to_string(&payload).unwrap();
        let back: SessionPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back.user_id, payload.user_id);
        assert_eq!(back.role, Role::Employer);
    }
}

use axum::{
    extract::{Request, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::sessions::{create_session, destroy_session};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::user::{Role, UserResponse, UserRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: UserResponse,
}

/// POST /api/v1/auth/register
///
/// Self-registration for employers and employees. Admin accounts are seeded
/// at startup and cannot be created here.
pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    validate_credentials(&request.email, &request.password)?;
    if request.role == Role::Admin {
        return Err(AppError::Validation(
            "Admin accounts cannot be self-registered".to_string(),
        ));
    }

    let user = sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (id, email, name, role, password_digest)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(request.email.trim().to_lowercase())
    .bind(request.name.trim())
    .bind(request.role)
    .bind(hash_password(&request.password))
    .fetch_one(&state.db)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "An account with this email already exists"))?;

    let auth_user = AuthUser {
        id: user.id,
        email: user.email.clone(),
        role: user.role,
    };
    let token = create_session(&state, &auth_user).await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
        .bind(request.email.trim().to_lowercase())
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&request.password, &user.password_digest) {
        return Err(AppError::Unauthorized);
    }

    let auth_user = AuthUser {
        id: user.id,
        email: user.email.clone(),
        role: user.role,
    };
    let token = create_session(&state, &auth_user).await?;

    Ok(Json(TokenResponse {
        token,
        user: user.into(),
    }))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    request: Request,
) -> Result<StatusCode, AppError> {
    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    destroy_session(&state, token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>, AppError> {
    let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(user.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(row.into()))
}

/// Upserts the configured admin account. Called once at startup.
pub async fn seed_admin(state: &AppState) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (
        state.config.admin_email.as_deref(),
        state.config.admin_password.as_deref(),
    ) else {
        return Ok(());
    };

    sqlx::query(
        "INSERT INTO users (id, email, name, role, password_digest)
         VALUES ($1, $2, 'Administrator', 'admin', $3)
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(Uuid::new_v4())
    .bind(email.trim().to_lowercase())
    .bind(hash_password(password))
    .execute(&state.db)
    .await?;

    tracing::info!("Admin account ensured for {email}");
    Ok(())
}

fn validate_credentials(email: &str, password: &str) -> Result<(), AppError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_credentials_accepts_reasonable_input() {
        assert!(validate_credentials("a@b.c", "longenough").is_ok());
    }

    #[test]
    fn test_validate_credentials_rejects_bad_email() {
        assert!(validate_credentials("not-an-email", "longenough").is_err());
        assert!(validate_credentials("  ", "longenough").is_err());
    }

    #[test]
    fn test_validate_credentials_rejects_short_password() {
        assert!(validate_credentials("a@b.c", "short").is_err());
    }

    #[test]
    fn test_register_request_role_parses() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@b.c","password":"longenough","name":"A","role":"employer"}"#,
        )
        .unwrap();
        assert_eq!(req.role, Role::Employer);
    }
}

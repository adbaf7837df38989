//! Admin user management. All routes here require the admin role.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::user::{Role, UserResponse};
use crate::pagination::{Page, Pagination};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub role: Option<Role>,
}

/// GET /api/v1/users
pub async fn handle_list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(pagination): Query<Pagination>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Page<UserResponse>>, AppError> {
    user.require_role(Role::Admin)?;

    let total: i64 = sqlx::query_scalar(
        "SELECT count(*) FROM users WHERE ($1::user_role IS NULL OR role = $1)",
    )
    .bind(query.role)
    .fetch_one(&state.db)
    .await?;

    let items = sqlx::query_as::<_, UserResponse>(
        "SELECT id, email, name, role, created_at FROM users
         WHERE ($1::user_role IS NULL OR role = $1)
         ORDER BY created_at DESC
         LIMIT $2 OFFSET $3",
    )
    .bind(query.role)
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(Page::new(items, &pagination, total)))
}

/// GET /api/v1/users/:id
pub async fn handle_get_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    user.require_role(Role::Admin)?;

    let row = sqlx::query_as::<_, UserResponse>(
        "SELECT id, email, name, role, created_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;

    Ok(Json(row))
}

/// PATCH /api/v1/users/:id
pub async fn handle_update_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    user.require_role(Role::Admin)?;

    let row = sqlx::query_as::<_, UserResponse>(
        "UPDATE users
         SET name = COALESCE($2, name), role = COALESCE($3, role)
         WHERE id = $1
         RETURNING id, email, name, role, created_at",
    )
    .bind(id)
    .bind(request.name)
    .bind(request.role)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;

    Ok(Json(row))
}

/// DELETE /api/v1/users/:id
pub async fn handle_delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    user.require_role(Role::Admin)?;

    if user.id == id {
        return Err(AppError::Validation(
            "Admins cannot delete their own account".to_string(),
        ));
    }

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("User {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

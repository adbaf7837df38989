use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::pagination::{Page, Pagination};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SkillRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SkillListQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SkillPayload {
    pub name: String,
}

/// GET /api/v1/skills?search=
pub async fn handle_list_skills(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(query): Query<SkillListQuery>,
) -> Result<Json<Page<SkillRow>>, AppError> {
    let search = query
        .search
        .as_deref()
        .map(|s| format!("%{}%", s.trim()));

    let total: i64 = sqlx::query_scalar(
        "SELECT count(*) FROM skills WHERE ($1::text IS NULL OR name ILIKE $1)",
    )
    .bind(&search)
    .fetch_one(&state.db)
    .await?;

    let items = sqlx::query_as::<_, SkillRow>(
        "SELECT * FROM skills
         WHERE ($1::text IS NULL OR name ILIKE $1)
         ORDER BY name
         LIMIT $2 OFFSET $3",
    )
    .bind(&search)
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(Page::new(items, &pagination, total)))
}

/// POST /api/v1/skills (admin)
pub async fn handle_create_skill(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<SkillPayload>,
) -> Result<(StatusCode, Json<SkillRow>), AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden);
    }
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Skill name is required".to_string()));
    }

    let row = sqlx::query_as::<_, SkillRow>(
        "INSERT INTO skills (id, name) VALUES ($1, $2) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_one(&state.db)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "This skill already exists"))?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// DELETE /api/v1/skills/:id (admin)
pub async fn handle_delete_skill(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden);
    }
    let result = sqlx::query("DELETE FROM skills WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Skill {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

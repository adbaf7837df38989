use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use sqlx::types::Json as SqlJson;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::category::{title_for_lang, CategoryRow, LocalizedTitle, Subcategory};
use crate::models::user::Role;
use crate::pagination::{Page, Pagination};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub titles: Vec<LocalizedTitle>,
    pub icon: Option<String>,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

impl CategoryPayload {
    fn validate(&self) -> Result<(), AppError> {
        if self.titles.is_empty() {
            return Err(AppError::Validation(
                "A category needs at least one localized title".to_string(),
            ));
        }
        if self.titles.iter().any(|t| t.value.trim().is_empty()) {
            return Err(AppError::Validation(
                "Localized titles cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryLangQuery {
    /// ISO 639-1 code the client wants titles resolved in.
    pub lang: Option<String>,
}

/// A category with its display title resolved for the requested language,
/// falling back to the first title when that language is missing.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    #[serde(flatten)]
    pub category: CategoryRow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

fn localize(category: CategoryRow, lang: Option<&str>) -> CategoryResponse {
    let title = lang
        .and_then(|l| title_for_lang(&category.titles, l))
        .map(str::to_string);
    CategoryResponse { category, title }
}

/// GET /api/v1/categories?lang=
pub async fn handle_list_categories(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(query): Query<CategoryLangQuery>,
) -> Result<Json<Page<CategoryResponse>>, AppError> {
    let total: i64 = sqlx::query_scalar("SELECT count(*) FROM categories")
        .fetch_one(&state.db)
        .await?;

    let items = sqlx::query_as::<_, CategoryRow>(
        "SELECT * FROM categories ORDER BY created_at LIMIT $1 OFFSET $2",
    )
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(&state.db)
    .await?;

    let items = items
        .into_iter()
        .map(|row| localize(row, query.lang.as_deref()))
        .collect();
    Ok(Json(Page::new(items, &pagination, total)))
}

/// GET /api/v1/categories/:id?lang=
pub async fn handle_get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<CategoryLangQuery>,
) -> Result<Json<CategoryResponse>, AppError> {
    let row = sqlx::query_as::<_, CategoryRow>("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {id} not found")))?;
    Ok(Json(localize(row, query.lang.as_deref())))
}

/// POST /api/v1/categories (admin)
pub async fn handle_create_category(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<CategoryRow>), AppError> {
    user.require_role(Role::Admin)?;
    payload.validate()?;

    let row = sqlx::query_as::<_, CategoryRow>(
        "INSERT INTO categories (id, titles, icon, subcategories)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(SqlJson(&payload.titles))
    .bind(&payload.icon)
    .bind(SqlJson(&payload.subcategories))
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/categories/:id (admin)
pub async fn handle_update_category(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<CategoryRow>, AppError> {
    user.require_role(Role::Admin)?;
    payload.validate()?;

    let row = sqlx::query_as::<_, CategoryRow>(
        "UPDATE categories SET titles = $2, icon = $3, subcategories = $4
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(SqlJson(&payload.titles))
    .bind(&payload.icon)
    .bind(SqlJson(&payload.subcategories))
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Category {id} not found")))?;

    Ok(Json(row))
}

/// DELETE /api/v1/categories/:id (admin)
pub async fn handle_delete_category(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    user.require_role(Role::Admin)?;

    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Category {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

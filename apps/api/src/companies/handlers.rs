use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use sqlx::types::Json as SqlJson;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::company::CompanyRow;
use crate::models::user::Role;
use crate::pagination::{Page, Pagination};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CompanyPayload {
    pub name: String,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub location: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub social_links: BTreeMap<String, String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub logo_url: Option<String>,
}

impl CompanyPayload {
    fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Company name is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CompanyListQuery {
    pub search: Option<String>,
}

/// GET /api/v1/companies
///
/// Readable by any authenticated role; candidates browse company profiles.
pub async fn handle_list_companies(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(query): Query<CompanyListQuery>,
) -> Result<Json<Page<CompanyRow>>, AppError> {
    let search = query.search.as_deref().map(|s| format!("%{s}%"));

    let total: i64 = sqlx::query_scalar(
        "SELECT count(*) FROM companies WHERE ($1::text IS NULL OR name ILIKE $1)",
    )
    .bind(&search)
    .fetch_one(&state.db)
    .await?;

    let items = sqlx::query_as::<_, CompanyRow>(
        "SELECT * FROM companies
         WHERE ($1::text IS NULL OR name ILIKE $1)
         ORDER BY created_at DESC
         LIMIT $2 OFFSET $3",
    )
    .bind(&search)
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(Page::new(items, &pagination, total)))
}

/// GET /api/v1/companies/:id
pub async fn handle_get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompanyRow>, AppError> {
    let row = fetch_company(&state, id).await?;
    Ok(Json(row))
}

/// POST /api/v1/companies
pub async fn handle_create_company(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CompanyPayload>,
) -> Result<(StatusCode, Json<CompanyRow>), AppError> {
    user.require_role(Role::Employer)?;
    payload.validate()?;

    let row = sqlx::query_as::<_, CompanyRow>(
        "INSERT INTO companies
            (id, owner_id, name, description, industry, size, location,
             contact_email, contact_phone, website, social_links, benefits, logo_url)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(payload.name.trim())
    .bind(&payload.description)
    .bind(&payload.industry)
    .bind(&payload.size)
    .bind(&payload.location)
    .bind(&payload.contact_email)
    .bind(&payload.contact_phone)
    .bind(&payload.website)
    .bind(SqlJson(&payload.social_links))
    .bind(&payload.benefits)
    .bind(&payload.logo_url)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/companies/:id
pub async fn handle_update_company(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompanyPayload>,
) -> Result<Json<CompanyRow>, AppError> {
    payload.validate()?;
    let existing = fetch_company(&state, id).await?;
    user.require_owner(existing.owner_id)?;

    let row = sqlx::query_as::<_, CompanyRow>(
        "UPDATE companies SET
            name = $2, description = $3, industry = $4, size = $5, location = $6,
            contact_email = $7, contact_phone = $8, website = $9,
            social_links = $10, benefits = $11, logo_url = $12, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(payload.name.trim())
    .bind(&payload.description)
    .bind(&payload.industry)
    .bind(&payload.size)
    .bind(&payload.location)
    .bind(&payload.contact_email)
    .bind(&payload.contact_phone)
    .bind(&payload.website)
    .bind(SqlJson(&payload.social_links))
    .bind(&payload.benefits)
    .bind(&payload.logo_url)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(row))
}

/// DELETE /api/v1/companies/:id
///
/// Cascades to the company's vacancies.
pub async fn handle_delete_company(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let existing = fetch_company(&state, id).await?;
    user.require_owner(existing.owner_id)?;

    sqlx::query("DELETE FROM companies WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_company(state: &AppState, id: Uuid) -> Result<CompanyRow, AppError> {
    sqlx::query_as::<_, CompanyRow>("SELECT * FROM companies WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Company {id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_requires_name() {
        let payload: CompanyPayload = serde_json::from_str(r#"{"name": "  "}"#).unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_payload_defaults() {
        let payload: CompanyPayload = serde_json::from_str(r#"{"name": "Acme"}"#).unwrap();
        assert!(payload.validate().is_ok());
        assert!(payload.benefits.is_empty());
        assert!(payload.social_links.is_empty());
    }
}

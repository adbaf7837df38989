use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::user::Role;
use crate::models::vacancy::{EmploymentType, VacancyRow, VacancyStatus, WorkType};
use crate::pagination::{Page, Pagination};
use crate::state::AppState;
use crate::vacancies::assist::{draft_vacancy, suggest_field, AssistField, AssistResult, VacancyDraft};

#[derive(Debug, Deserialize)]
pub struct VacancyPayload {
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub salary_currency: Option<String>,
    pub category_id: Option<Uuid>,
    pub subcategory: Option<String>,
    pub employment_type: EmploymentType,
    pub work_type: WorkType,
    pub location: Option<String>,
    pub status: Option<VacancyStatus>,
}

impl VacancyPayload {
    fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::Validation("Description is required".to_string()));
        }
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                return Err(AppError::Validation(
                    "salary_min cannot exceed salary_max".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct VacancyListQuery {
    pub status: Option<VacancyStatus>,
    pub category_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub search: Option<String>,
}

/// GET /api/v1/vacancies
///
/// Employees only ever see `active` postings; employers and admins may filter
/// by any status.
pub async fn handle_list_vacancies(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(pagination): Query<Pagination>,
    Query(query): Query<VacancyListQuery>,
) -> Result<Json<Page<VacancyRow>>, AppError> {
    let status = match user.role {
        Role::Employee => Some(VacancyStatus::Active),
        _ => query.status,
    };

    let mut count_qb = QueryBuilder::new("SELECT count(*) FROM vacancies WHERE true");
    let mut list_qb = QueryBuilder::new("SELECT * FROM vacancies WHERE true");
    for qb in [&mut count_qb, &mut list_qb] {
        if let Some(status) = status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(category_id) = query.category_id {
            qb.push(" AND category_id = ").push_bind(category_id);
        }
        if let Some(company_id) = query.company_id {
            qb.push(" AND company_id = ").push_bind(company_id);
        }
        if let Some(search) = &query.search {
            qb.push(" AND title ILIKE ").push_bind(format!("%{search}%"));
        }
    }

    let total: i64 = count_qb.build_query_scalar().fetch_one(&state.db).await?;

    list_qb
        .push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(pagination.limit())
        .push(" OFFSET ")
        .push_bind(pagination.offset());
    let items = list_qb
        .build_query_as::<VacancyRow>()
        .fetch_all(&state.db)
        .await?;

    Ok(Json(Page::new(items, &pagination, total)))
}

/// GET /api/v1/vacancies/:id
pub async fn handle_get_vacancy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<VacancyRow>, AppError> {
    let row = fetch_vacancy(&state, id).await?;
    if user.role == Role::Employee && row.status != VacancyStatus::Active {
        return Err(AppError::NotFound(format!("Vacancy {id} not found")));
    }
    Ok(Json(row))
}

/// POST /api/v1/vacancies
pub async fn handle_create_vacancy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<VacancyPayload>,
) -> Result<(StatusCode, Json<VacancyRow>), AppError> {
    user.require_role(Role::Employer)?;
    payload.validate()?;

    // The posting must hang off a company the caller owns.
    let owner_id: Option<Uuid> =
        sqlx::query_scalar("SELECT owner_id FROM companies WHERE id = $1")
            .bind(payload.company_id)
            .fetch_optional(&state.db)
            .await?;
    let owner_id = owner_id
        .ok_or_else(|| AppError::NotFound(format!("Company {} not found", payload.company_id)))?;
    user.require_owner(owner_id)?;

    let row = insert_vacancy(&state, &user, &payload).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/vacancies/:id
pub async fn handle_update_vacancy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VacancyPayload>,
) -> Result<Json<VacancyRow>, AppError> {
    payload.validate()?;
    let existing = fetch_vacancy(&state, id).await?;
    user.require_owner(existing.created_by)?;

    let row = sqlx::query_as::<_, VacancyRow>(
        "UPDATE vacancies SET
            title = $2, description = $3, requirements = $4, responsibilities = $5,
            salary_min = $6, salary_max = $7, salary_currency = $8,
            category_id = $9, subcategory = $10, employment_type = $11,
            work_type = $12, location = $13, status = $14, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(payload.title.trim())
    .bind(&payload.description)
    .bind(&payload.requirements)
    .bind(&payload.responsibilities)
    .bind(payload.salary_min)
    .bind(payload.salary_max)
    .bind(&payload.salary_currency)
    .bind(payload.category_id)
    .bind(&payload.subcategory)
    .bind(payload.employment_type)
    .bind(payload.work_type)
    .bind(&payload.location)
    .bind(payload.status.unwrap_or(existing.status))
    .fetch_one(&state.db)
    .await?;

    Ok(Json(row))
}

/// DELETE /api/v1/vacancies/:id
pub async fn handle_delete_vacancy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let existing = fetch_vacancy(&state, id).await?;
    user.require_owner(existing.created_by)?;

    sqlx::query("DELETE FROM vacancies WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct AssistRequest {
    pub description: String,
    pub field: AssistField,
}

/// POST /api/v1/vacancies/assist
///
/// Suggests one form field (title, requirements, responsibilities, or salary)
/// from the employer's free-text description.
pub async fn handle_assist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<AssistRequest>,
) -> Result<Json<AssistResult>, AppError> {
    user.require_role(Role::Employer)?;
    if request.description.trim().is_empty() {
        return Err(AppError::Validation(
            "description cannot be empty".to_string(),
        ));
    }

    let result = suggest_field(&state.llm, &request.description, request.field).await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub description: String,
}

/// POST /api/v1/vacancies/draft
///
/// Parses a whole free-text posting into a structured vacancy draft.
pub async fn handle_draft(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<DraftRequest>,
) -> Result<Json<VacancyDraft>, AppError> {
    user.require_role(Role::Employer)?;
    if request.description.trim().is_empty() {
        return Err(AppError::Validation(
            "description cannot be empty".to_string(),
        ));
    }

    let draft = draft_vacancy(&state.llm, &request.description).await?;
    Ok(Json(draft))
}

async fn insert_vacancy(
    state: &AppState,
    user: &AuthUser,
    payload: &VacancyPayload,
) -> Result<VacancyRow, AppError> {
    let row = sqlx::query_as::<_, VacancyRow>(
        "INSERT INTO vacancies
            (id, company_id, created_by, title, description, requirements,
             responsibilities, salary_min, salary_max, salary_currency,
             category_id, subcategory, employment_type, work_type, location, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(payload.company_id)
    .bind(user.id)
    .bind(payload.title.trim())
    .bind(&payload.description)
    .bind(&payload.requirements)
    .bind(&payload.responsibilities)
    .bind(payload.salary_min)
    .bind(payload.salary_max)
    .bind(&payload.salary_currency)
    .bind(payload.category_id)
    .bind(&payload.subcategory)
    .bind(payload.employment_type)
    .bind(payload.work_type)
    .bind(&payload.location)
    .bind(payload.status.unwrap_or(VacancyStatus::Draft))
    .fetch_one(&state.db)
    .await?;
    Ok(row)
}

pub(crate) async fn fetch_vacancy(state: &AppState, id: Uuid) -> Result<VacancyRow, AppError> {
    sqlx::query_as::<_, VacancyRow>("SELECT * FROM vacancies WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vacancy {id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(min: Option<i32>, max: Option<i32>) -> VacancyPayload {
        VacancyPayload {
            company_id: Uuid::new_v4(),
            title: "Engineer".to_string(),
            description: "Build things".to_string(),
            requirements: vec![],
            responsibilities: vec![],
            salary_min: min,
            salary_max: max,
            salary_currency: None,
            category_id: None,
            subcategory: None,
            employment_type: EmploymentType::FullTime,
            work_type: WorkType::Remote,
            location: None,
            status: None,
        }
    }

    #[test]
    fn test_salary_range_invariant() {
        assert!(payload(Some(50), Some(100)).validate().is_ok());
        assert!(payload(Some(100), Some(50)).validate().is_err());
        // One-sided ranges are fine
        assert!(payload(Some(100), None).validate().is_ok());
        assert!(payload(None, Some(50)).validate().is_ok());
    }

    #[test]
    fn test_title_and_description_required() {
        let mut p = payload(None, None);
        p.title = "  ".to_string();
        assert!(p.validate().is_err());

        let mut p = payload(None, None);
        p.description = String::new();
        assert!(p.validate().is_err());
    }
}

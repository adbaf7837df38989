use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::application::{ApplicationRow, ApplicationStatus};
use crate::models::user::Role;
use crate::models::vacancy::VacancyStatus;
use crate::pagination::{Page, Pagination};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    pub vacancy_id: Uuid,
    pub resume_id: Uuid,
    pub cover_note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationListQuery {
    pub vacancy_id: Option<Uuid>,
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ApplicationStatus,
}

/// POST /api/v1/applications
///
/// An employee applies with one of their resumes. The vacancy must be
/// `active`; the resume must exist and belong to the applicant.
pub async fn handle_create_application(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    user.require_role(Role::Employee)?;

    let vacancy_status: Option<VacancyStatus> =
        sqlx::query_scalar("SELECT status FROM vacancies WHERE id = $1")
            .bind(request.vacancy_id)
            .fetch_optional(&state.db)
            .await?;
    match vacancy_status {
        None => {
            return Err(AppError::NotFound(format!(
                "Vacancy {} not found",
                request.vacancy_id
            )))
        }
        Some(VacancyStatus::Active) => {}
        Some(_) => {
            return Err(AppError::Validation(
                "This vacancy is not accepting applications".to_string(),
            ))
        }
    }

    let resume_owner: Option<Uuid> =
        sqlx::query_scalar("SELECT owner_id FROM resumes WHERE id = $1")
            .bind(request.resume_id)
            .fetch_optional(&state.db)
            .await?;
    let resume_owner = resume_owner
        .ok_or_else(|| AppError::NotFound(format!("Resume {} not found", request.resume_id)))?;
    if resume_owner != user.id {
        return Err(AppError::Forbidden);
    }

    let row = sqlx::query_as::<_, ApplicationRow>(
        "INSERT INTO applications (id, vacancy_id, resume_id, applicant_id, cover_note)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(request.vacancy_id)
    .bind(request.resume_id)
    .bind(user.id)
    .bind(&request.cover_note)
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        AppError::conflict_on_unique(e, "This resume has already been submitted to this vacancy")
    })?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/applications
///
/// Employees see their own; employers see applications to their vacancies;
/// admins see everything.
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(pagination): Query<Pagination>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<Json<Page<ApplicationRow>>, AppError> {
    let (applicant_filter, employer_filter) = match user.role {
        Role::Employee => (Some(user.id), None),
        Role::Employer => (None, Some(user.id)),
        Role::Admin => (None, None),
    };

    let total: i64 = sqlx::query_scalar(
        "SELECT count(*) FROM applications a
         WHERE ($1::uuid IS NULL OR a.applicant_id = $1)
           AND ($2::uuid IS NULL OR EXISTS (
                SELECT 1 FROM vacancies v WHERE v.id = a.vacancy_id AND v.created_by = $2))
           AND ($3::uuid IS NULL OR a.vacancy_id = $3)
           AND ($4::application_status IS NULL OR a.status = $4)",
    )
    .bind(applicant_filter)
    .bind(employer_filter)
    .bind(query.vacancy_id)
    .bind(query.status)
    .fetch_one(&state.db)
    .await?;

    let items = sqlx::query_as::<_, ApplicationRow>(
        "SELECT a.* FROM applications a
         WHERE ($1::uuid IS NULL OR a.applicant_id = $1)
           AND ($2::uuid IS NULL OR EXISTS (
                SELECT 1 FROM vacancies v WHERE v.id = a.vacancy_id AND v.created_by = $2))
           AND ($3::uuid IS NULL OR a.vacancy_id = $3)
           AND ($4::application_status IS NULL OR a.status = $4)
         ORDER BY a.created_at DESC
         LIMIT $5 OFFSET $6",
    )
    .bind(applicant_filter)
    .bind(employer_filter)
    .bind(query.vacancy_id)
    .bind(query.status)
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(Page::new(items, &pagination, total)))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationRow>, AppError> {
    let row = fetch_application(&state, id).await?;
    authorize_application_access(&state, &user, &row).await?;
    Ok(Json(row))
}

/// PATCH /api/v1/applications/:id/status
///
/// The employer who owns the vacancy (or an admin) moves the application
/// through the pipeline.
pub async fn handle_update_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    let row = fetch_application(&state, id).await?;

    if !user.is_admin() {
        let vacancy_owner: Option<Uuid> =
            sqlx::query_scalar("SELECT created_by FROM vacancies WHERE id = $1")
                .bind(row.vacancy_id)
                .fetch_optional(&state.db)
                .await?;
        if vacancy_owner != Some(user.id) {
            return Err(AppError::Forbidden);
        }
    }

    let updated = sqlx::query_as::<_, ApplicationRow>(
        "UPDATE applications SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(request.status)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(updated))
}

/// DELETE /api/v1/applications/:id
///
/// The applicant may withdraw while the application is still `pending`;
/// admins may always delete.
pub async fn handle_delete_application(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let row = fetch_application(&state, id).await?;

    if !user.is_admin() {
        if row.applicant_id != user.id {
            return Err(AppError::Forbidden);
        }
        if row.status != ApplicationStatus::Pending {
            return Err(AppError::Validation(
                "Only pending applications can be withdrawn".to_string(),
            ));
        }
    }

    sqlx::query("DELETE FROM applications WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn fetch_application(state: &AppState, id: Uuid) -> Result<ApplicationRow, AppError> {
    sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

/// Applicant, owning employer, and admin may see an application.
pub async fn authorize_application_access(
    state: &AppState,
    user: &AuthUser,
    application: &ApplicationRow,
) -> Result<(), AppError> {
    if user.is_admin() || application.applicant_id == user.id {
        return Ok(());
    }
    let vacancy_owner: Option<Uuid> =
        sqlx::query_scalar("SELECT created_by FROM vacancies WHERE id = $1")
            .bind(application.vacancy_id)
            .fetch_optional(&state.db)
            .await?;
    if vacancy_owner == Some(user.id) {
        return Ok(());
    }
    Err(AppError::Forbidden)
}

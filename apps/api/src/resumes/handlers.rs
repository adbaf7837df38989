use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use bytes::Bytes;
use serde::Deserialize;
use sqlx::types::Json as SqlJson;
use tracing::warn;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::{
    EducationEntry, LanguageEntry, ProjectEntry, ResumeBasics, ResumeDocument, ResumeRow,
    SkillEntry, WorkEntry,
};
use crate::models::user::Role;
use crate::pagination::{Page, Pagination};
use crate::resumes::parser::{extract_pdf_text, parse_resume_text, resume_title};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResumePayload {
    pub title: String,
    pub basics: ResumeBasics,
    #[serde(default)]
    pub work: Vec<WorkEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
    #[serde(default)]
    pub languages: Vec<LanguageEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
}

impl ResumePayload {
    fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        if self.basics.full_name.trim().is_empty() {
            return Err(AppError::Validation("Full name is required".to_string()));
        }
        Ok(())
    }
}

/// GET /api/v1/resumes
///
/// Employees list their own resumes; admins list all.
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Page<ResumeRow>>, AppError> {
    let owner_filter = if user.is_admin() { None } else { Some(user.id) };

    let total: i64 = sqlx::query_scalar(
        "SELECT count(*) FROM resumes WHERE ($1::uuid IS NULL OR owner_id = $1)",
    )
    .bind(owner_filter)
    .fetch_one(&state.db)
    .await?;

    let items = sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes
         WHERE ($1::uuid IS NULL OR owner_id = $1)
         ORDER BY created_at DESC
         LIMIT $2 OFFSET $3",
    )
    .bind(owner_filter)
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(Page::new(items, &pagination, total)))
}

/// GET /api/v1/resumes/:id
///
/// Owner and admin always; an employer may read a resume that was submitted
/// to one of their vacancies.
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    let row = fetch_resume(&state, id).await?;
    authorize_resume_read(&state, &user, &row).await?;
    Ok(Json(row))
}

/// POST /api/v1/resumes — manual creation from structured sections.
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ResumePayload>,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    user.require_role(Role::Employee)?;
    payload.validate()?;

    let row = insert_resume(
        &state,
        user.id,
        payload.title.trim(),
        &ResumeDocument {
            basics: payload.basics,
            work: payload.work,
            education: payload.education,
            skills: payload.skills,
            languages: payload.languages,
            projects: payload.projects,
        },
        None,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// POST /api/v1/resumes/upload
///
/// Multipart PDF upload: extract text, parse with the LLM, archive the raw
/// file in S3, insert the parsed row.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    user.require_role(Role::Employee)?;

    let (filename, data) = read_pdf_field(&mut multipart).await?;
    let text = extract_pdf_text(&data)?;
    let document = parse_resume_text(&state.llm, &text).await?;

    let id = Uuid::new_v4();
    let source_key = format!("resumes/{id}.pdf");
    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&source_key)
        .content_type("application/pdf")
        .body(aws_sdk_s3::primitives::ByteStream::from(data))
        .send()
        .await
        .map_err(|e| AppError::S3(e.to_string()))?;

    let title = resume_title(&document, &filename);
    let row = match insert_resume_with_id(&state, id, user.id, &title, &document, Some(&source_key))
        .await
    {
        Ok(row) => row,
        // The object is already in S3; remove it so a failed insert does not
        // leave an orphan behind.
        Err(e) => {
            if let Err(delete_err) = state
                .s3
                .delete_object()
                .bucket(&state.config.s3_bucket)
                .key(&source_key)
                .send()
                .await
            {
                warn!("Could not remove orphaned upload {source_key}: {delete_err}");
            }
            return Err(e);
        }
    };

    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResumePayload>,
) -> Result<Json<ResumeRow>, AppError> {
    payload.validate()?;
    let existing = fetch_resume(&state, id).await?;
    user.require_owner(existing.owner_id)?;

    let row = sqlx::query_as::<_, ResumeRow>(
        "UPDATE resumes SET
            title = $2, basics = $3, work = $4, education = $5,
            skills = $6, languages = $7, projects = $8, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(payload.title.trim())
    .bind(SqlJson(&payload.basics))
    .bind(SqlJson(&payload.work))
    .bind(SqlJson(&payload.education))
    .bind(SqlJson(&payload.skills))
    .bind(SqlJson(&payload.languages))
    .bind(SqlJson(&payload.projects))
    .fetch_one(&state.db)
    .await?;

    Ok(Json(row))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let existing = fetch_resume(&state, id).await?;
    user.require_owner(existing.owner_id)?;

    sqlx::query("DELETE FROM resumes WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn read_pdf_field(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("resume.pdf").to_string();
        if !filename.to_lowercase().ends_with(".pdf") {
            return Err(AppError::Validation(
                "Only PDF uploads are supported".to_string(),
            ));
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        return Ok((filename, data));
    }
    Err(AppError::Validation(
        "Multipart field 'file' is required".to_string(),
    ))
}

async fn insert_resume(
    state: &AppState,
    owner_id: Uuid,
    title: &str,
    document: &ResumeDocument,
    source_key: Option<&str>,
) -> Result<ResumeRow, AppError> {
    insert_resume_with_id(state, Uuid::new_v4(), owner_id, title, document, source_key).await
}

async fn insert_resume_with_id(
    state: &AppState,
    id: Uuid,
    owner_id: Uuid,
    title: &str,
    document: &ResumeDocument,
    source_key: Option<&str>,
) -> Result<ResumeRow, AppError> {
    let row = sqlx::query_as::<_, ResumeRow>(
        "INSERT INTO resumes
            (id, owner_id, title, basics, work, education, skills, languages, projects, source_key)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING *",
    )
    .bind(id)
    .bind(owner_id)
    .bind(title)
    .bind(SqlJson(&document.basics))
    .bind(SqlJson(&document.work))
    .bind(SqlJson(&document.education))
    .bind(SqlJson(&document.skills))
    .bind(SqlJson(&document.languages))
    .bind(SqlJson(&document.projects))
    .bind(source_key)
    .fetch_one(&state.db)
    .await?;
    Ok(row)
}

pub(crate) async fn fetch_resume(state: &AppState, id: Uuid) -> Result<ResumeRow, AppError> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

/// Owner and admin read freely; an employer may read a resume only when it
/// backs an application to a vacancy they created.
async fn authorize_resume_read(
    state: &AppState,
    user: &AuthUser,
    resume: &ResumeRow,
) -> Result<(), AppError> {
    if user.id == resume.owner_id || user.is_admin() {
        return Ok(());
    }
    if user.role == Role::Employer {
        let visible: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM applications a
                JOIN vacancies v ON v.id = a.vacancy_id
                WHERE a.resume_id = $1 AND v.created_by = $2
            )",
        )
        .bind(resume.id)
        .bind(user.id)
        .fetch_one(&state.db)
        .await?;
        if visible {
            return Ok(());
        }
    }
    Err(AppError::Forbidden)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_requires_title_and_name() {
        let payload: ResumePayload = serde_json::from_str(
            r#"{"title": "", "basics": {"full_name": "Ada"}}"#,
        )
        .unwrap();
        assert!(payload.validate().is_err());

        let payload: ResumePayload = serde_json::from_str(
            r#"{"title": "CV", "basics": {"full_name": "  "}}"#,
        )
        .unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_payload_minimal_ok() {
        let payload: ResumePayload = serde_json::from_str(
            r#"{"title": "CV", "basics": {"full_name": "Ada"}}"#,
        )
        .unwrap();
        assert!(payload.validate().is_ok());
        assert!(payload.work.is_empty());
    }
}

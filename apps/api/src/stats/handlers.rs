use axum::{extract::State, Extension, Json};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::application::ApplicationStatus;
use crate::models::user::Role;
use crate::models::vacancy::VacancyStatus;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatsOverview {
    pub vacancies_by_status: BTreeMap<String, i64>,
    pub applications_by_status: BTreeMap<String, i64>,
    /// Global totals, admin only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<Totals>,
}

#[derive(Debug, Serialize)]
pub struct Totals {
    pub users: i64,
    pub companies: i64,
    pub resumes: i64,
}

/// GET /api/v1/stats/overview
///
/// Admins see platform-wide numbers; employers see the slice scoped to
/// their own vacancies. Employees have no dashboard.
pub async fn handle_stats_overview(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StatsOverview>, AppError> {
    let owner_filter = match user.role {
        Role::Admin => None,
        Role::Employer => Some(user.id),
        Role::Employee => return Err(AppError::Forbidden),
    };

    let vacancy_rows: Vec<(VacancyStatus, i64)> = sqlx::query_as(
        "SELECT status, count(*) FROM vacancies
         WHERE ($1::uuid IS NULL OR created_by = $1)
         GROUP BY status",
    )
    .bind(owner_filter)
    .fetch_all(&state.db)
    .await?;

    let application_rows: Vec<(ApplicationStatus, i64)> = sqlx::query_as(
        "SELECT a.status, count(*) FROM applications a
         WHERE ($1::uuid IS NULL OR EXISTS (
                SELECT 1 FROM vacancies v WHERE v.id = a.vacancy_id AND v.created_by = $1))
         GROUP BY a.status",
    )
    .bind(owner_filter)
    .fetch_all(&state.db)
    .await?;

    let totals = if user.is_admin() {
        let users: i64 = sqlx::query_scalar("SELECT count(*) FROM users")
            .fetch_one(&state.db)
            .await?;
        let companies: i64 = sqlx::query_scalar("SELECT count(*) FROM companies")
            .fetch_one(&state.db)
            .await?;
        let resumes: i64 = sqlx::query_scalar("SELECT count(*) FROM resumes")
            .fetch_one(&state.db)
            .await?;
        Some(Totals {
            users,
            companies,
            resumes,
        })
    } else {
        None
    };

    Ok(Json(StatsOverview {
        vacancies_by_status: status_map(vacancy_rows)?,
        applications_by_status: status_map(application_rows)?,
        totals,
    }))
}

/// Collapses GROUP BY rows into a name -> count map, using the enum's wire
/// name as the key.
fn status_map<S: Serialize>(rows: Vec<(S, i64)>) -> Result<BTreeMap<String, i64>, AppError> {
    let mut map = BTreeMap::new();
    for (status, count) in rows {
        let key = serde_json::to_value(&status)?
            .as_str()
            .unwrap_or_default()
            .to_string();
        map.insert(key, count);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_map_uses_wire_names() {
        let rows = vec![
            (VacancyStatus::Active, 3),
            (VacancyStatus::Draft, 1),
        ];
        let map = status_map(rows).unwrap();
        assert_eq!(map.get("active"), Some(&3));
        assert_eq!(map.get("draft"), Some(&1));
        assert!(map.get("closed").is_none());
    }

    #[test]
    fn test_totals_omitted_when_none() {
        let overview = StatsOverview {
            vacancies_by_status: BTreeMap::new(),
            applications_by_status: BTreeMap::new(),
            totals: None,
        };
        let value = serde_json::to_value(&overview).unwrap();
        assert!(value.get("totals").is_none());
    }
}

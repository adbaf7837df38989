use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "vacancy_status", rename_all = "snake_case")]
pub enum VacancyStatus {
    Draft,
    Active,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "employment_type", rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "work_type", rename_all = "snake_case")]
pub enum WorkType {
    OnSite,
    Remote,
    Hybrid,
}

/// A job posting.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VacancyRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub salary_currency: Option<String>,
    pub category_id: Option<Uuid>,
    pub subcategory: Option<String>,
    pub employment_type: EmploymentType,
    pub work_type: WorkType,
    pub location: Option<String>,
    pub status: VacancyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&VacancyStatus::Active).unwrap(),
            "\"active\""
        );
        let s: VacancyStatus = serde_json::from_str("\"closed\"").unwrap();
        assert_eq!(s, VacancyStatus::Closed);
    }

    #[test]
    fn test_employment_and_work_type_serde() {
        assert_eq!(
            serde_json::to_string(&EmploymentType::FullTime).unwrap(),
            "\"full_time\""
        );
        assert_eq!(
            serde_json::to_string(&WorkType::OnSite).unwrap(),
            "\"on_site\""
        );
        let w: WorkType = serde_json::from_str("\"hybrid\"").unwrap();
        assert_eq!(w, WorkType::Hybrid);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

/// A candidate's application: one resume submitted against one vacancy.
/// `evaluation` is filled by the screening evaluator, if it has run.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub vacancy_id: Uuid,
    pub resume_id: Uuid,
    pub applicant_id: Uuid,
    pub status: ApplicationStatus,
    pub cover_note: Option<String>,
    pub evaluation: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_round_trip() {
        for (variant, text) in [
            (ApplicationStatus::Pending, "\"pending\""),
            (ApplicationStatus::Reviewed, "\"reviewed\""),
            (ApplicationStatus::Accepted, "\"accepted\""),
            (ApplicationStatus::Rejected, "\"rejected\""),
        ] {
            assert_eq!(serde_json::to_string(&variant).unwrap(), text);
            let parsed: ApplicationStatus = serde_json::from_str(text).unwrap();
            assert_eq!(parsed, variant);
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Contact block and headline of a parsed resume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeBasics {
    pub full_name: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkEntry {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub language: String,
    #[serde(default)]
    pub fluency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

/// The full section model the LLM parser targets. Dates are kept as the
/// strings the model extracted; resumes are too irregular for strict dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeDocument {
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

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub basics: Json<ResumeBasics>,
    pub work: Json<Vec<WorkEntry>>,
    pub education: Json<Vec<EducationEntry>>,
    pub skills: Json<Vec<SkillEntry>>,
    pub languages: Json<Vec<LanguageEntry>>,
    pub projects: Json<Vec<ProjectEntry>>,
    /// S3 key of the uploaded source PDF, when the resume came from a file.
    pub source_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_deserializes_with_missing_sections() {
        let json = r#"{
            "basics": {"full_name": "Ada Lovelace", "email": "ada@example.com"}
        }"#;
        let doc: ResumeDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.basics.full_name, "Ada Lovelace");
        assert!(doc.work.is_empty());
        assert!(doc.skills.is_empty());
    }

    #[test]
    fn test_document_full_shape() {
        let json = r#"{
            "basics": {"full_name": "Ada Lovelace", "headline": "Engineer"},
            "work": [{"company": "Analytical Engines", "position": "Programmer",
                      "start_date": "1842", "highlights": ["Wrote the first program"]}],
            "education": [{"institution": "Home tutoring"}],
            "skills": [{"name": "Mathematics", "keywords": ["analysis"]}],
            "languages": [{"language": "English", "fluency": "native"}],
            "projects": [{"name": "Notes on the Analytical Engine"}]
        }"#;
        let doc: ResumeDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.work.len(), 1);
        assert_eq!(doc.work[0].highlights.len(), 1);
        assert_eq!(doc.languages[0].fluency.as_deref(), Some("native"));
    }
}

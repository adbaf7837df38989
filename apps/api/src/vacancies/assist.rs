//! Vacancy drafting assistance — single-field suggestions and whole-posting
//! drafts generated from an employer's free-text description.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::llm::LlmClient;
use crate::models::vacancy::{EmploymentType, WorkType};
use crate::vacancies::prompts::{
    ASSIST_PROMPT_TEMPLATE, ASSIST_SYSTEM, DRAFT_PROMPT_TEMPLATE, DRAFT_SYSTEM,
    REQUIREMENTS_INSTRUCTION, RESPONSIBILITIES_INSTRUCTION, SALARY_INSTRUCTION,
    TITLE_INSTRUCTION,
};

/// The form field a suggestion is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistField {
    Title,
    Requirements,
    Responsibilities,
    Salary,
}

impl AssistField {
    fn instruction(self) -> &'static str {
        match self {
            AssistField::Title => TITLE_INSTRUCTION,
            AssistField::Requirements => REQUIREMENTS_INSTRUCTION,
            AssistField::Responsibilities => RESPONSIBILITIES_INSTRUCTION,
            AssistField::Salary => SALARY_INSTRUCTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: i32,
    pub max: i32,
    pub currency: String,
}

/// The shape of a suggestion depends on the requested field: a string for
/// titles, a string array for requirements/responsibilities, a range for
/// salary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Suggestion {
    Text(String),
    List(Vec<String>),
    Salary(SalaryRange),
}

impl Suggestion {
    /// Checks that the model answered in the shape the field calls for.
    pub fn matches_field(&self, field: AssistField) -> bool {
        matches!(
            (self, field),
            (Suggestion::Text(_), AssistField::Title)
                | (Suggestion::List(_), AssistField::Requirements)
                | (Suggestion::List(_), AssistField::Responsibilities)
                | (Suggestion::Salary(_), AssistField::Salary)
        )
    }
}

#[derive(Debug, Deserialize)]
struct AssistLlmResponse {
    suggestion: Suggestion,
    detected_language: String,
}

#[derive(Debug, Serialize)]
pub struct AssistResult {
    pub field: AssistField,
    pub suggestion: Suggestion,
    /// Detected but informational only: logged and returned, drives nothing.
    pub detected_language: String,
}

/// Requests a suggestion for one form field from the LLM.
pub async fn suggest_field(
    llm: &LlmClient,
    description: &str,
    field: AssistField,
) -> Result<AssistResult, AppError> {
    let prompt = ASSIST_PROMPT_TEMPLATE
        .replace("{field_instruction}", field.instruction())
        .replace("{description}", description);

    let response: AssistLlmResponse = llm
        .call_json(&prompt, ASSIST_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Field suggestion failed: {e}")))?;

    if !response.suggestion.matches_field(field) {
        return Err(AppError::Llm(format!(
            "Model returned a suggestion of the wrong shape for field {field:?}"
        )));
    }

    debug!("Assist detected language: {}", response.detected_language);

    Ok(AssistResult {
        field,
        suggestion: response.suggestion,
        detected_language: response.detected_language,
    })
}

/// Structured draft of a whole vacancy, parsed from free text in one call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacancyDraft {
    pub title: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub salary_currency: Option<String>,
    pub employment_type: EmploymentType,
    pub work_type: WorkType,
    pub location: Option<String>,
    pub detected_language: String,
}

/// Parses a free-text posting into a `VacancyDraft`.
pub async fn draft_vacancy(llm: &LlmClient, description: &str) -> Result<VacancyDraft, AppError> {
    let prompt = DRAFT_PROMPT_TEMPLATE.replace("{description}", description);
    let draft: VacancyDraft = llm
        .call_json(&prompt, DRAFT_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Vacancy drafting failed: {e}")))?;

    debug!("Draft detected language: {}", draft.detected_language);
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assist_field_serde() {
        let f: AssistField = serde_json::from_str("\"requirements\"").unwrap();
        assert_eq!(f, AssistField::Requirements);
        assert_eq!(serde_json::to_string(&AssistField::Salary).unwrap(), "\"salary\"");
    }

    #[test]
    fn test_suggestion_untagged_text() {
        let s: Suggestion = serde_json::from_str("\"Senior Rust Engineer\"").unwrap();
        assert!(s.matches_field(AssistField::Title));
        assert!(!s.matches_field(AssistField::Salary));
    }

    #[test]
    fn test_suggestion_untagged_list() {
        let s: Suggestion = serde_json::from_str(r#"["5 years Rust", "SQL"]"#).unwrap();
        assert!(s.matches_field(AssistField::Requirements));
        assert!(s.matches_field(AssistField::Responsibilities));
        assert!(!s.matches_field(AssistField::Title));
    }

    #[test]
    fn test_suggestion_untagged_salary() {
        let s: Suggestion =
            serde_json::from_str(r#"{"min": 60000, "max": 90000, "currency": "EUR"}"#).unwrap();
        assert!(s.matches_field(AssistField::Salary));
        match s {
            Suggestion::Salary(range) => assert_eq!(range.currency, "EUR"),
            _ => panic!("expected salary"),
        }
    }

    #[test]
    fn test_assist_response_shape() {
        let json = r#"{"suggestion": "Backend Engineer", "detected_language": "en"}"#;
        let resp: AssistLlmResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.detected_language, "en");
        assert!(resp.suggestion.matches_field(AssistField::Title));
    }

    #[test]
    fn test_vacancy_draft_deserializes() {
        let json = r#"{
            "title": "Senior Backend Engineer",
            "requirements": ["5+ years"],
            "responsibilities": ["Operate services"],
            "salary_min": 60000,
            "salary_max": 90000,
            "salary_currency": "USD",
            "employment_type": "full_time",
            "work_type": "hybrid",
            "location": "Berlin",
            "detected_language": "de"
        }"#;
        let draft: VacancyDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.employment_type, EmploymentType::FullTime);
        assert_eq!(draft.work_type, WorkType::Hybrid);
        assert_eq!(draft.detected_language, "de");
    }

    #[test]
    fn test_vacancy_draft_nullable_salary() {
        let json = r#"{
            "title": "Intern",
            "salary_min": null,
            "salary_max": null,
            "salary_currency": null,
            "employment_type": "internship",
            "work_type": "on_site",
            "location": null,
            "detected_language": "en"
        }"#;
        let draft: VacancyDraft = serde_json::from_str(json).unwrap();
        assert!(draft.salary_min.is_none());
        assert!(draft.requirements.is_empty());
    }
}

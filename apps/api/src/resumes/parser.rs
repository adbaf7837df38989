//! Resume parsing — extracts text from an uploaded PDF and structures it
//! with the LLM.

use bytes::Bytes;

use crate::errors::AppError;
use crate::llm::LlmClient;
use crate::models::resume::ResumeDocument;
use crate::resumes::prompts::{RESUME_PARSE_PROMPT_TEMPLATE, RESUME_PARSE_SYSTEM};

/// Extracts plain text from PDF bytes.
/// Fails with 422 when the file yields no usable text (scanned images etc.).
pub fn extract_pdf_text(data: &Bytes) -> Result<String, AppError> {
    let text = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| AppError::Validation(format!("Could not read PDF: {e}")))?;

    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "The PDF contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}

/// Sends resume text to the LLM and deserializes the section model.
pub async fn parse_resume_text(
    llm: &LlmClient,
    resume_text: &str,
) -> Result<ResumeDocument, AppError> {
    let prompt = RESUME_PARSE_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);
    llm.call_json::<ResumeDocument>(&prompt, RESUME_PARSE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Resume parsing failed: {e}")))
}

/// Display label for an uploaded resume: the parsed name, or the filename.
pub fn resume_title(document: &ResumeDocument, filename: &str) -> String {
    let name = document.basics.full_name.trim();
    if name.is_empty() || name.eq_ignore_ascii_case("unknown") {
        filename.trim_end_matches(".pdf").to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ResumeBasics;

    fn doc_with_name(name: &str) -> ResumeDocument {
        ResumeDocument {
            basics: ResumeBasics {
                full_name: name.to_string(),
                ..Default::default()
            },
            work: vec![],
            education: vec![],
            skills: vec![],
            languages: vec![],
            projects: vec![],
        }
    }

    #[test]
    fn test_resume_title_prefers_parsed_name() {
        assert_eq!(
            resume_title(&doc_with_name("Ada Lovelace"), "cv_final.pdf"),
            "Ada Lovelace"
        );
    }

    #[test]
    fn test_resume_title_falls_back_to_filename() {
        assert_eq!(resume_title(&doc_with_name(""), "cv_final.pdf"), "cv_final");
        assert_eq!(
            resume_title(&doc_with_name("Unknown"), "resume.pdf"),
            "resume"
        );
    }

    #[test]
    fn test_extract_pdf_text_rejects_garbage() {
        let data = Bytes::from_static(b"not a pdf at all");
        assert!(matches!(
            extract_pdf_text(&data),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_prompt_interpolates_text() {
        let prompt = RESUME_PARSE_PROMPT_TEMPLATE.replace("{resume_text}", "MARKER");
        assert!(prompt.contains("MARKER"));
        assert!(!prompt.contains("{resume_text}"));
    }
}

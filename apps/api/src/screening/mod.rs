//! Candidate screening — pluggable, trait-based evaluator that scores a
//! candidate (resume + interview transcript) against a vacancy.
//!
//! Default: `LlmScreener` (semantic, via the completion API).
//! Alternative: `KeywordScreener` (pure-Rust, deterministic, offline) —
//! selected at startup via ENABLE_KEYWORD_SCREENING.
//!
//! `AppState` holds an `Arc<dyn Screener>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::chat::MessageRow;
use crate::models::resume::ResumeRow;
use crate::models::vacancy::VacancyRow;

pub mod keyword;
pub mod llm;
pub mod prompts;

/// Hiring recommendation attached to every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Advance,
    Reject,
    Review,
}

/// The fixed evaluation shape stored on the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// 0–100 after `normalized()`.
    pub score: f64,
    pub recommendation: Recommendation,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub summary: String,
    /// "llm" | "keyword" — which backend produced this.
    #[serde(default)]
    pub backend: String,
}

impl Evaluation {
    /// Clamps the score into 0–100. Model output is typed by serde but the
    /// numeric range still needs enforcing.
    pub fn normalized(mut self) -> Self {
        self.score = self.score.clamp(0.0, 100.0);
        self
    }

    /// Neutral object returned when the model's answer cannot be parsed,
    /// so a screening run never hard-fails the review flow.
    pub fn fallback(reason: &str) -> Self {
        Self {
            score: 0.0,
            recommendation: Recommendation::Review,
            strengths: vec![],
            concerns: vec!["Automatic evaluation was unavailable".to_string()],
            summary: format!("Evaluation could not be generated: {reason}"),
            backend: "fallback".to_string(),
        }
    }
}

/// Everything an evaluator may consider.
pub struct ScreeningContext<'a> {
    pub vacancy: &'a VacancyRow,
    pub resume: &'a ResumeRow,
    pub transcript: &'a [MessageRow],
}

/// The screening trait. Implement this to swap backends without touching
/// the chat handlers.
#[async_trait]
pub trait Screener: Send + Sync {
    async fn evaluate(&self, ctx: &ScreeningContext<'_>) -> Result<Evaluation, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_clamps_score() {
        let eval = Evaluation {
            score: 140.0,
            recommendation: Recommendation::Advance,
            strengths: vec![],
            concerns: vec![],
            summary: String::new(),
            backend: "llm".to_string(),
        };
        assert_eq!(eval.normalized().score, 100.0);

        let eval = Evaluation {
            score: -3.0,
            recommendation: Recommendation::Reject,
            strengths: vec![],
            concerns: vec![],
            summary: String::new(),
            backend: "llm".to_string(),
        };
        assert_eq!(eval.normalized().score, 0.0);
    }

    #[test]
    fn test_fallback_is_neutral() {
        let eval = Evaluation::fallback("timeout");
        assert_eq!(eval.score, 0.0);
        assert_eq!(eval.recommendation, Recommendation::Review);
        assert!(eval.summary.contains("timeout"));
    }

    #[test]
    fn test_evaluation_deserializes_model_shape() {
        let json = r#"{
            "score": 82,
            "recommendation": "advance",
            "strengths": ["Relevant Rust experience"],
            "concerns": ["No production Kubernetes"],
            "summary": "Strong match overall."
        }"#;
        let eval: Evaluation = serde_json::from_str(json).unwrap();
        assert_eq!(eval.recommendation, Recommendation::Advance);
        assert_eq!(eval.score, 82.0);
        // `backend` is filled by the caller, not the model
        assert!(eval.backend.is_empty());
    }

    #[test]
    fn test_recommendation_serde() {
        assert_eq!(
            serde_json::to_string(&Recommendation::Review).unwrap(),
            "\"review\""
        );
    }
}

//! Deterministic keyword screener — no LLM call, fully testable offline.
//!
//! Algorithm:
//! 1. Tokenize the vacancy title + requirements into a keyword set.
//! 2. Tokenize the candidate's skills, work highlights, and transcript
//!    answers into an evidence set.
//! 3. score = covered / total * 100; thresholds pick the recommendation.

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::errors::AppError;
use crate::models::chat::MessageRole;
use crate::screening::{Evaluation, Recommendation, Screener, ScreeningContext};

const ADVANCE_THRESHOLD: f64 = 70.0;
const REVIEW_THRESHOLD: f64 = 40.0;

pub struct KeywordScreener;

#[async_trait]
impl Screener for KeywordScreener {
    async fn evaluate(&self, ctx: &ScreeningContext<'_>) -> Result<Evaluation, AppError> {
        Ok(compute_keyword_evaluation(ctx))
    }
}

fn compute_keyword_evaluation(ctx: &ScreeningContext<'_>) -> Evaluation {
    let mut keywords = BTreeSet::new();
    tokenize_into(&ctx.vacancy.title, &mut keywords);
    for requirement in &ctx.vacancy.requirements {
        tokenize_into(requirement, &mut keywords);
    }

    let mut evidence = BTreeSet::new();
    for skill in ctx.resume.skills.iter() {
        tokenize_into(&skill.name, &mut evidence);
        for keyword in &skill.keywords {
            tokenize_into(keyword, &mut evidence);
        }
    }
    for entry in ctx.resume.work.iter() {
        tokenize_into(&entry.position, &mut evidence);
        for highlight in &entry.highlights {
            tokenize_into(highlight, &mut evidence);
        }
    }
    for message in ctx.transcript {
        if message.role == MessageRole::User {
            tokenize_into(&message.content, &mut evidence);
        }
    }

    if keywords.is_empty() {
        return Evaluation {
            score: 0.0,
            recommendation: Recommendation::Review,
            strengths: vec![],
            concerns: vec!["The vacancy lists no screenable requirements".to_string()],
            summary: "No requirement keywords to score against.".to_string(),
            backend: "keyword".to_string(),
        };
    }

    let covered: Vec<&String> = keywords.iter().filter(|k| evidence.contains(*k)).collect();
    let missing: Vec<&String> = keywords.iter().filter(|k| !evidence.contains(*k)).collect();
    let score = covered.len() as f64 / keywords.len() as f64 * 100.0;

    let recommendation = if score >= ADVANCE_THRESHOLD {
        Recommendation::Advance
    } else if score >= REVIEW_THRESHOLD {
        Recommendation::Review
    } else {
        Recommendation::Reject
    };

    Evaluation {
        score,
        recommendation,
        strengths: covered
            .iter()
            .map(|k| format!("Candidate evidence covers '{k}'"))
            .collect(),
        concerns: missing
            .iter()
            .map(|k| format!("No evidence for '{k}'"))
            .collect(),
        summary: format!(
            "Keyword coverage: {}/{} requirement terms.",
            covered.len(),
            keywords.len()
        ),
        backend: "keyword".to_string(),
    }
    .normalized()
}

/// Lowercased alphanumeric tokens of 3+ characters, minus filler words.
fn tokenize_into(text: &str, out: &mut BTreeSet<String>) {
    const STOPWORDS: &[&str] = &[
        "and", "the", "for", "with", "years", "year", "experience", "knowledge", "skills",
        "ability", "strong", "good", "plus", "must", "have", "required",
    ];
    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|t| t.len() >= 3 && !STOPWORDS.contains(&t.as_str()))
    {
        out.insert(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::MessageRow;
    use crate::screening::prompts::tests_support::{resume, vacancy};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_tokenize_drops_stopwords_and_short_tokens() {
        let mut out = BTreeSet::new();
        tokenize_into("5+ years of Rust and SQL experience", &mut out);
        assert!(out.contains("rust"));
        assert!(out.contains("sql"));
        assert!(!out.contains("years"));
        assert!(!out.contains("of"));
    }

    #[test]
    fn test_full_coverage_advances() {
        // Fixture vacancy requires Rust + SQL; the resume covers Rust, the
        // transcript covers SQL and the title words.
        let vacancy = vacancy();
        let resume = resume();
        let transcript = vec![MessageRow {
            id: Uuid::new_v4(),
            chat_id: Uuid::new_v4(),
            seq: 1,
            role: MessageRole::User,
            content: "I am a Rust engineer who writes SQL daily".to_string(),
            message_type: None,
            created_at: Utc::now(),
        }];
        let ctx = ScreeningContext {
            vacancy: &vacancy,
            resume: &resume,
            transcript: &transcript,
        };
        let eval = compute_keyword_evaluation(&ctx);
        assert_eq!(eval.score, 100.0);
        assert_eq!(eval.recommendation, Recommendation::Advance);
        assert_eq!(eval.backend, "keyword");
        assert!(eval.concerns.is_empty());
    }

    #[test]
    fn test_partial_coverage_reviews_or_rejects() {
        let mut vacancy = vacancy();
        vacancy.requirements = vec![
            "Kubernetes".to_string(),
            "Terraform".to_string(),
            "Rust".to_string(),
        ];
        vacancy.title = "Engineer".to_string();
        let resume = resume(); // covers rust + engineer via skills/position
        let ctx = ScreeningContext {
            vacancy: &vacancy,
            resume: &resume,
            transcript: &[],
        };
        let eval = compute_keyword_evaluation(&ctx);
        assert!(eval.score < ADVANCE_THRESHOLD);
        assert!(!eval.concerns.is_empty());
    }

    #[test]
    fn test_no_requirements_is_review() {
        let mut vacancy = vacancy();
        vacancy.title = String::new();
        vacancy.requirements = vec![];
        let resume = resume();
        let ctx = ScreeningContext {
            vacancy: &vacancy,
            resume: &resume,
            transcript: &[],
        };
        let eval = compute_keyword_evaluation(&ctx);
        assert_eq!(eval.recommendation, Recommendation::Review);
        assert_eq!(eval.score, 0.0);
    }

    #[test]
    fn test_deterministic() {
        let vacancy = vacancy();
        let resume = resume();
        let ctx = ScreeningContext {
            vacancy: &vacancy,
            resume: &resume,
            transcript: &[],
        };
        let a = compute_keyword_evaluation(&ctx);
        let b = compute_keyword_evaluation(&ctx);
        assert_eq!(a, b);
    }
}

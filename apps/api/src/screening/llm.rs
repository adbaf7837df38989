use async_trait::async_trait;
use tracing::warn;

use crate::errors::AppError;
use crate::llm::prompts::FACTUAL_INSTRUCTION;
use crate::llm::{LlmClient, LlmError};
use crate::models::chat::MessageRole;
use crate::screening::prompts::{
    resume_block, vacancy_block, EVALUATION_PROMPT_TEMPLATE, EVALUATION_SYSTEM,
};
use crate::screening::{Evaluation, Screener, ScreeningContext};

/// Default screening backend: one structured-output call per evaluation.
pub struct LlmScreener(pub LlmClient);

#[async_trait]
impl Screener for LlmScreener {
    async fn evaluate(&self, ctx: &ScreeningContext<'_>) -> Result<Evaluation, AppError> {
        let prompt = EVALUATION_PROMPT_TEMPLATE
            .replace("{vacancy_block}", &vacancy_block(ctx.vacancy))
            .replace("{resume_block}", &resume_block(ctx.resume))
            .replace("{transcript}", &render_transcript(ctx))
            .replace("{factual_instruction}", FACTUAL_INSTRUCTION);

        match self.0.call_json::<Evaluation>(&prompt, EVALUATION_SYSTEM).await {
            Ok(mut eval) => {
                eval.backend = "llm".to_string();
                Ok(eval.normalized())
            }
            // A malformed answer degrades to the neutral fallback instead of
            // failing the review flow.
            Err(LlmError::Parse(e)) => {
                warn!("Evaluation JSON did not match the expected shape: {e}");
                Ok(Evaluation::fallback("the model returned malformed JSON"))
            }
            Err(e) => Err(AppError::Llm(format!("Screening evaluation failed: {e}"))),
        }
    }
}

fn render_transcript(ctx: &ScreeningContext<'_>) -> String {
    if ctx.transcript.is_empty() {
        return "(no screening conversation took place)".to_string();
    }
    ctx.transcript
        .iter()
        .filter(|m| m.role != MessageRole::System)
        .map(|m| {
            let speaker = match m.role {
                MessageRole::Assistant => "Interviewer",
                _ => "Candidate",
            };
            format!("{speaker}: {}", m.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::MessageRow;
    use chrono::Utc;
    use uuid::Uuid;

    fn message(seq: i64, role: MessageRole, content: &str) -> MessageRow {
        MessageRow {
            id: Uuid::new_v4(),
            chat_id: Uuid::new_v4(),
            seq,
            role,
            content: content.to_string(),
            message_type: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_transcript_labels_speakers_and_drops_system() {
        let vacancy = crate::screening::prompts::tests_support::vacancy();
        let resume = crate::screening::prompts::tests_support::resume();
        let transcript = vec![
            message(1, MessageRole::System, "internal instructions"),
            message(2, MessageRole::Assistant, "Tell me about Rust."),
            message(3, MessageRole::User, "Five years of it."),
        ];
        let ctx = ScreeningContext {
            vacancy: &vacancy,
            resume: &resume,
            transcript: &transcript,
        };
        let rendered = render_transcript(&ctx);
        assert!(rendered.contains("Interviewer: Tell me about Rust."));
        assert!(rendered.contains("Candidate: Five years of it."));
        assert!(!rendered.contains("internal instructions"));
    }

    #[test]
    fn test_render_transcript_empty() {
        let vacancy = crate::screening::prompts::tests_support::vacancy();
        let resume = crate::screening::prompts::tests_support::resume();
        let ctx = ScreeningContext {
            vacancy: &vacancy,
            resume: &resume,
            transcript: &[],
        };
        assert!(render_transcript(&ctx).contains("no screening conversation"));
    }
}

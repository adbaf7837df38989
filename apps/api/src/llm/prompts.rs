// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it;
// this file holds the cross-cutting pieces they interpolate.

/// Instruction appended to prompts that interpolate user-supplied records.
pub const FACTUAL_INSTRUCTION: &str = "\
    CRITICAL: Base every statement only on the vacancy and candidate data \
    provided in the prompt. Do NOT infer, interpolate, or invent details. \
    If the data does not support a claim, omit it entirely.";

// All LLM prompt constants for vacancy drafting assistance.

/// System prompt for single-field suggestions — enforces JSON-only output.
pub const ASSIST_SYSTEM: &str = "You are an expert recruiter helping an employer \
    write a job posting. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Field-suggestion prompt template.
/// Replace `{field_instruction}` and `{description}` before sending.
pub const ASSIST_PROMPT_TEMPLATE: &str = r#"An employer wrote this free-text job description:

{description}

{field_instruction}

Also detect the language the description is written in (ISO 639-1 code).

Return a JSON object with this EXACT schema:
{
  "suggestion": <as instructed above>,
  "detected_language": "en"
}"#;

pub const TITLE_INSTRUCTION: &str = "Suggest a concise, specific job title for this \
    posting. `suggestion` must be a single string in the description's language.";

pub const REQUIREMENTS_INSTRUCTION: &str = "Extract or infer the candidate requirements \
    for this posting. `suggestion` must be a JSON array of short requirement strings \
    in the description's language. Do not invent requirements the description does \
    not support.";

pub const RESPONSIBILITIES_INSTRUCTION: &str = "Extract or infer the day-to-day \
    responsibilities for this posting. `suggestion` must be a JSON array of short \
    responsibility strings in the description's language. Do not invent \
    responsibilities the description does not support.";

pub const SALARY_INSTRUCTION: &str = "Suggest a realistic salary range for this role. \
    `suggestion` must be an object: {\"min\": 60000, \"max\": 90000, \"currency\": \"USD\"}. \
    Use any salary figures present in the description; otherwise estimate from the \
    role and location.";

/// System prompt for whole-posting drafting — enforces JSON-only output.
pub const DRAFT_SYSTEM: &str = "You are an expert recruiter turning a free-text job \
    posting into a structured vacancy. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Whole-posting draft template. Replace `{description}` before sending.
pub const DRAFT_PROMPT_TEMPLATE: &str = r#"Turn the following free-text job posting into a structured vacancy draft.

Return a JSON object with this EXACT schema (no extra fields):
{
  "title": "Senior Backend Engineer",
  "requirements": ["5+ years of backend experience"],
  "responsibilities": ["Design and operate services"],
  "salary_min": 60000,
  "salary_max": 90000,
  "salary_currency": "USD",
  "employment_type": "full_time",
  "work_type": "remote",
  "location": "Berlin",
  "detected_language": "en"
}

Rules:
- employment_type is one of: "full_time", "part_time", "contract", "internship"
- work_type is one of: "on_site", "remote", "hybrid"
- salary fields and location are null when the posting gives no basis for them
- detected_language is the ISO 639-1 code of the posting's language
- requirements and responsibilities stay in the posting's language

JOB POSTING:
{description}"#;

// LLM prompt constants for resume parsing.

/// System prompt for resume parsing — enforces JSON-only output.
pub const RESUME_PARSE_SYSTEM: &str = "You are an expert resume parser. \
    Extract structured candidate data from raw resume text. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT invent data that is not present in the resume text.";

/// Resume parsing prompt template. Replace `{resume_text}` before sending.
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"Parse the following resume text into structured sections.

Return a JSON object with this EXACT schema (no extra fields):
{
  "basics": {
    "full_name": "Ada Lovelace",
    "headline": "Backend Engineer",
    "email": "ada@example.com",
    "phone": "+44 20 0000 0000",
    "location": "London",
    "summary": "One-paragraph professional summary"
  },
  "work": [
    {
      "company": "Analytical Engines Ltd",
      "position": "Engineer",
      "start_date": "2019-03",
      "end_date": null,
      "highlights": ["Shipped the difference engine pipeline"]
    }
  ],
  "education": [
    {
      "institution": "University of London",
      "degree": "BSc",
      "field": "Mathematics",
      "start_date": "2014",
      "end_date": "2017"
    }
  ],
  "skills": [
    {"name": "Rust", "level": "advanced", "keywords": ["axum", "sqlx"]}
  ],
  "languages": [
    {"language": "English", "fluency": "native"}
  ],
  "projects": [
    {"name": "Notes", "description": "…", "url": null, "highlights": []}
  ]
}

Rules:
- Use null for fields the resume does not state; use [] for absent sections.
- Keep dates exactly as written in the resume (do not normalize formats).
- full_name is required; if the resume has no discernible name, use "Unknown".

RESUME TEXT:
{resume_text}"#;

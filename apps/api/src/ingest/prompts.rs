// Extraction prompts. The JSON schema itself is appended by
// `LlmProvider::generate_structured`.

/// Resume extraction prompt. Replace `{resume}` before sending.
pub const STRUCTURED_RESUME_PROMPT_TEMPLATE: &str = "\
You are a JSON extraction engine. Convert the resume text below into JSON \
matching the provided schema.
Rules:
- Do not add extra fields or narration.
- Preserve key names exactly.

Resume:
{resume}
";

/// Job extraction prompt. Replace `{job}` before sending.
pub const STRUCTURED_JOB_PROMPT_TEMPLATE: &str = "\
You are a JSON extraction engine. Convert the job posting below into JSON \
matching the provided schema exactly.
Rules:
- Do not add extra fields or prose.
- Use YYYY-MM-DD for all dates.
- URLs must be valid URIs.
- Keep the structure and keys unchanged.

Job posting:
{job}
";

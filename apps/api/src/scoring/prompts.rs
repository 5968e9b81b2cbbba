// Prompt templates for the score-improvement flow.
// Placeholders are filled with `str::replace`; JSON-only instructions and
// schemas are appended by `LlmProvider::generate_structured`.

/// Resume rewrite prompt. Replace: {current_score}, {target_language}, {job},
/// {job_keywords}, {resume}, {resume_keywords}.
pub const IMPROVEMENT_PROMPT_TEMPLATE: &str = "\
You are an experienced resume optimisation expert. Revise the resume below so \
that it aligns with the job description and its keywords, raising the cosine \
similarity between the resume and the job keywords.

Guidelines:
- Read the job description and keyword list carefully and weave the relevant \
skills and experience in naturally.
- Rewrite, expand or remove content where the role requires it.
- Keep a professional tone. Prefer quantified achievements and action verbs.
- The current cosine similarity score is {current_score}. Aim to improve it.
- Write the improved resume in {target_language}.
- Output only the improved resume in Markdown, with no commentary.

Job description:
{job}

Extracted job keywords:
{job_keywords}

Original resume:
{resume}

Extracted resume keywords:
{resume_keywords}
";

/// Before/after analysis prompt. Replace: {original_score}, {new_score},
/// {target_language}, {original_resume}, {improved_resume}, {job_description}.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = "\
You are a senior career advisor. Compare the original and improved resumes \
against the job description. The original match score was {original_score} \
and the new score is {new_score}.

Respond in {target_language} with a JSON object holding \"details\", \
\"commentary\" and \"improvements\":
- \"details\": one sentence summarising the main changes.
- \"commentary\": a paragraph on why the changes improve the match.
- \"improvements\": further suggestions, each an object with a \"suggestion\" field.

Original resume:
{original_resume}

Improved resume:
{improved_resume}

Job description:
{job_description}
";

/// Preview prompt. Replace: {resume}.
pub const PREVIEW_PROMPT_TEMPLATE: &str = "\
Using the improved resume below, produce structured data for a resume preview.

Improved resume:
{resume}
";

/// Scores go into prompts with two decimals.
pub fn format_score(score: f64) -> String {
    format!("{score:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score_two_decimals() {
        assert_eq!(format_score(0.123456), "0.12");
        assert_eq!(format_score(1.0), "1.00");
    }

    #[test]
    fn test_templates_carry_their_placeholders() {
        for placeholder in ["{current_score}", "{target_language}", "{job}", "{job_keywords}",
            "{resume}", "{resume_keywords}"]
        {
            assert!(IMPROVEMENT_PROMPT_TEMPLATE.contains(placeholder), "{placeholder}");
        }
        assert!(ANALYSIS_PROMPT_TEMPLATE.contains("{improved_resume}"));
        assert!(PREVIEW_PROMPT_TEMPLATE.contains("{resume}"));
    }
}

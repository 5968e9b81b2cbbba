use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use super::prompts::{format_score, ANALYSIS_PROMPT_TEMPLATE};
use crate::extraction::schema_of;
use crate::i18n::{messages, Locale};
use crate::llm_client::LlmProvider;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Improvement {
    pub suggestion: String,
}

/// Narrative comparison of the original and improved resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisReport {
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub commentary: String,
    #[serde(default)]
    pub improvements: Vec<Improvement>,
}

impl AnalysisReport {
    pub fn fallback(locale: Locale) -> Self {
        Self {
            details: messages::analysis_fallback_details(locale),
            commentary: String::new(),
            improvements: Vec::new(),
        }
    }

    /// Lenient read of the model's answer: missing keys default, non-object
    /// improvement entries are dropped.
    fn from_value(raw: &Value) -> Option<Self> {
        let map = raw.as_object()?;
        let text = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .trim()
                .to_string()
        };
        let improvements = map
            .get("improvements")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value::<Improvement>(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            details: text("details"),
            commentary: text("commentary"),
            improvements,
        })
    }
}

pub struct AnalysisInput<'a> {
    pub original_resume: &'a str,
    pub improved_resume: &'a str,
    pub job_description: &'a str,
    pub original_score: f64,
    pub new_score: f64,
}

/// Never fails: any provider or shape error yields the localized fallback.
pub async fn analyze(
    llm: &dyn LlmProvider,
    model: &str,
    locale: Locale,
    input: AnalysisInput<'_>,
) -> AnalysisReport {
    let prompt = ANALYSIS_PROMPT_TEMPLATE
        .replace("{original_score}", &format_score(input.original_score))
        .replace("{new_score}", &format_score(input.new_score))
        .replace("{target_language}", locale.target_language())
        .replace("{job_description}", input.job_description)
        .replace("{original_resume}", input.original_resume)
        .replace("{improved_resume}", input.improved_resume);

    match llm
        .generate_structured(&prompt, model, &schema_of::<AnalysisReport>())
        .await
    {
        Ok(raw) => AnalysisReport::from_value(&raw).unwrap_or_else(|| {
            error!("analysis output was not a JSON object");
            AnalysisReport::fallback(locale)
        }),
        Err(e) => {
            error!(error = %e, "failed to generate analysis details");
            AnalysisReport::fallback(locale)
        }
    }
}

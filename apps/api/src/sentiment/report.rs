//! Sentiment Report Generator: one direct model call, no retry, always
//! yields text.

use tracing::{info, warn};

use crate::llm_client::prompts::fill_template;
use crate::llm_client::{LlmError, TextModel};
use crate::sentiment::prompts::{REPORT_SECTIONS, SENTIMENT_PROMPT_TEMPLATE};
use crate::sentiment::table::Table;

pub fn build_sentiment_prompt(table: &Table) -> String {
    fill_template(
        SENTIMENT_PROMPT_TEMPLATE,
        &[("feedback_data", &table.render())],
    )
}

/// Report sections the text never mentions. The "(Top 3)" qualifier is not
/// required and matching ignores case.
pub fn missing_sections(report: &str) -> Vec<&'static str> {
    let report = report.to_lowercase();
    REPORT_SECTIONS
        .into_iter()
        .filter(|section| {
            let heading = section.split(" (").next().unwrap_or(*section);
            !report.contains(&heading.to_lowercase())
        })
        .collect()
}

/// Returns the model's markdown report, or an inline error message when the
/// call fails or comes back empty. Never fails.
pub async fn generate_sentiment_report(model: &dyn TextModel, table: &Table) -> String {
    let prompt = build_sentiment_prompt(table);
    info!(
        "Generating sentiment report over {} rows with {}",
        table.rows.len(),
        model.model_name()
    );

    let outcome = match model.generate(&prompt).await {
        Ok(response) => match response.text() {
            Some(text) => {
                let missing = missing_sections(text);
                if !missing.is_empty() {
                    warn!("Sentiment report is missing sections: {}", missing.join(", "));
                }
                Ok(text.to_string())
            }
            None => Err(LlmError::EmptyContent),
        },
        Err(e) => Err(e),
    };

    outcome.unwrap_or_else(|e| {
        warn!("Sentiment analysis failed: {e}");
        format!("An error occurred during analysis: {e}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{error_reply, text_reply, ScriptedModel};
    use crate::llm_client::ModelResponse;

    fn table() -> Table {
        Table {
            columns: vec!["Question".into(), "Answer".into()],
            rows: vec![
                vec!["Do you feel valued?".into(), "Rarely".into()],
                vec!["Would you recommend us?".into(), "Yes".into()],
            ],
        }
    }

    #[test]
    fn test_prompt_embeds_table_dump_and_sections() {
        let prompt = build_sentiment_prompt(&table());
        assert!(prompt.contains(&table().render()));
        for section in REPORT_SECTIONS {
            assert!(prompt.contains(section), "missing section {section}");
        }
        assert!(prompt.contains("Low, Medium, High"));
    }

    #[test]
    fn test_missing_sections() {
        let full = "## Executive Summary\n## Key Strengths\n## Critical Areas for Improvement\n\
                    ## attrition risk assessment\n## Actionable Recommendations";
        assert!(missing_sections(full).is_empty());
        assert_eq!(
            missing_sections("## Executive Summary\nAll good."),
            vec![
                "Key Strengths (Top 3)",
                "Critical Areas for Improvement (Top 3)",
                "Attrition Risk Assessment",
                "Actionable Recommendations",
            ]
        );
    }

    #[tokio::test]
    async fn test_returns_model_markdown() {
        let model = ScriptedModel::new(vec![text_reply("## Executive Summary\nMixed.")]);
        let report = generate_sentiment_report(&model, &table()).await;
        assert_eq!(report, "## Executive Summary\nMixed.");
    }

    #[tokio::test]
    async fn test_error_becomes_inline_message_without_retry() {
        let model = ScriptedModel::new(vec![error_reply("quota exceeded")]);
        let report = generate_sentiment_report(&model, &table()).await;
        assert_eq!(
            report,
            "An error occurred during analysis: API error (status 500): quota exceeded"
        );
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_refusal_becomes_inline_message() {
        let model = ScriptedModel::new(vec![Ok(ModelResponse::refused("SAFETY"))]);
        let report = generate_sentiment_report(&model, &table()).await;
        assert!(report.starts_with("An error occurred during analysis: "));
    }

    #[tokio::test]
    async fn test_empty_table_still_yields_text() {
        let model = ScriptedModel::new(vec![text_reply("No data to analyze.")]);
        let report = generate_sentiment_report(&model, &Table::default()).await;
        assert_eq!(report, "No data to analyze.");
        assert!(model.prompts()[0].contains("Empty table"));
    }
}

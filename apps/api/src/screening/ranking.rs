//! Cumulative Ranking Aggregator: one model call over every successful
//! screening, in arrival order.

use crate::llm_client::extractor::JsonExtractor;
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::screening::models::{CumulativeReport, ScreeningResult};
use crate::screening::prompts::RANKING_PROMPT_TEMPLATE;
use crate::screening::{Stage, StageError};

pub fn build_ranking_prompt(screenings: &[ScreeningResult]) -> Result<String, StageError> {
    let analyses_json = serde_json::to_string_pretty(screenings)
        .map_err(|e| StageError::Serialize(Stage::RankingAggregation, e))?;

    Ok(fill_template(
        RANKING_PROMPT_TEMPLATE,
        &[
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("analyses_json", &analyses_json),
        ],
    ))
}

pub async fn aggregate_ranking(
    screenings: &[ScreeningResult],
    extractor: &JsonExtractor,
) -> Result<CumulativeReport, StageError> {
    let prompt = build_ranking_prompt(screenings)?;
    extractor
        .extract(&prompt)
        .await
        .ok_or(StageError::Extraction(Stage::RankingAggregation))
}

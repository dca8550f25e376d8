// Resume screening pipeline.
// Stages: JD normalization, resume structuring, candidate screening,
// cumulative ranking. All model calls go through llm_client::extractor.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub mod handlers;
pub mod jd_normalizer;
pub mod lenient;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod ranking;
pub mod resume_structurer;
pub mod screener;

/// One prompt-build + model-call + parse unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    JdNormalization,
    ResumeStructuring,
    CandidateScreening,
    RankingAggregation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::JdNormalization => "job description normalization",
            Stage::ResumeStructuring => "resume structuring",
            Stage::CandidateScreening => "candidate screening",
            Stage::RankingAggregation => "ranking aggregation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum StageError {
    /// Refusal, or every extractor attempt failed.
    #[error("{0} failed: the model returned no usable JSON")]
    Extraction(Stage),

    #[error("failed to serialize {0} input: {1}")]
    Serialize(Stage, #[source] serde_json::Error),
}

//! Candidate Screener: scores one structured resume against the normalized JD.
//!
//! The model's verdict does not carry the candidate's name; the pipeline
//! back-fills it with `backfill_candidate_name` after a successful call.

use crate::llm_client::extractor::JsonExtractor;
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::screening::models::{Recommendation, ResumeProfile, ScreeningResult};
use crate::screening::prompts::SCREENING_PROMPT_TEMPLATE;
use crate::screening::{Stage, StageError};

pub fn build_screening_prompt(
    job_description_json: &str,
    profile: &ResumeProfile,
) -> Result<String, StageError> {
    let resume_json = serde_json::to_string_pretty(profile)
        .map_err(|e| StageError::Serialize(Stage::CandidateScreening, e))?;
    let labels = Recommendation::prompt_choices();

    Ok(fill_template(
        SCREENING_PROMPT_TEMPLATE,
        &[
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("job_description_json", job_description_json),
            ("resume_json", &resume_json),
            ("recommendation_labels", &labels),
        ],
    ))
}

pub async fn screen_candidate(
    job_description_json: &str,
    profile: &ResumeProfile,
    extractor: &JsonExtractor,
) -> Result<ScreeningResult, StageError> {
    let prompt = build_screening_prompt(job_description_json, profile)?;
    extractor
        .extract(&prompt)
        .await
        .ok_or(StageError::Extraction(Stage::CandidateScreening))
}

/// Sets `candidate_name` from the profile's extracted name, falling back to
/// the uploaded file's display name. Overwrites whatever the model put there.
pub fn backfill_candidate_name(
    mut result: ScreeningResult,
    profile: &ResumeProfile,
    file_name: &str,
) -> ScreeningResult {
    let name = profile.candidate_name().unwrap_or(file_name);
    result.candidate_name = Some(name.to_string());
    // an uncoercible model value would otherwise serialize twice
    result.extra.remove("candidate_name");
    result
}

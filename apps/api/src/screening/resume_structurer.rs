//! Resume Structurer: extracts a `ResumeProfile` from plain resume text.

use crate::llm_client::extractor::JsonExtractor;
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::screening::models::ResumeProfile;
use crate::screening::prompts::RESUME_STRUCTURE_PROMPT_TEMPLATE;
use crate::screening::{Stage, StageError};

pub fn build_structure_prompt(resume_text: &str) -> String {
    fill_template(
        RESUME_STRUCTURE_PROMPT_TEMPLATE,
        &[
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("resume_text", resume_text),
        ],
    )
}

/// One call per resume. Independent of every other resume, so callers may
/// run several at once.
pub async fn structure_resume(
    resume_text: &str,
    extractor: &JsonExtractor,
) -> Result<ResumeProfile, StageError> {
    let prompt = build_structure_prompt(resume_text);
    extractor
        .extract(&prompt)
        .await
        .ok_or(StageError::Extraction(Stage::ResumeStructuring))
}

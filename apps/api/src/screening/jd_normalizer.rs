//! JD Normalizer: turns a raw job description into structured JSON text.
//!
//! Input that already looks like JSON (first non-whitespace char is `{`) is
//! passed through byte-for-byte without a model call.

use serde::Serialize;
use tracing::info;

use crate::llm_client::extractor::JsonExtractor;
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::screening::models::JobDescription;
use crate::screening::prompts::JD_NORMALIZE_PROMPT_TEMPLATE;
use crate::screening::{Stage, StageError};

/// Normalized job description as consumed by the screener.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedJobDescription {
    /// JSON text embedded verbatim into screening prompts.
    pub json: String,
    /// Structured view, when `json` parses.
    pub parsed: Option<JobDescription>,
    /// True when the input was already JSON and no model call was made.
    pub passthrough: bool,
}

pub fn is_prestructured(raw_jd_text: &str) -> bool {
    raw_jd_text.trim_start().starts_with('{')
}

pub fn build_normalize_prompt(raw_jd_text: &str) -> String {
    fill_template(
        JD_NORMALIZE_PROMPT_TEMPLATE,
        &[
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("raw_jd_text", raw_jd_text),
        ],
    )
}

pub async fn normalize_job_description(
    raw_jd_text: &str,
    extractor: &JsonExtractor,
) -> Result<NormalizedJobDescription, StageError> {
    if is_prestructured(raw_jd_text) {
        info!("Job description is already JSON; skipping normalization");
        return Ok(NormalizedJobDescription {
            json: raw_jd_text.to_string(),
            parsed: serde_json::from_str(raw_jd_text).ok(),
            passthrough: true,
        });
    }

    let prompt = build_normalize_prompt(raw_jd_text);
    let parsed: JobDescription = extractor
        .extract(&prompt)
        .await
        .ok_or(StageError::Extraction(Stage::JdNormalization))?;

    let json = serde_json::to_string(&parsed)
        .map_err(|e| StageError::Serialize(Stage::JdNormalization, e))?;

    info!(
        "Job description normalized: title={:?}, required={}, responsibilities={}",
        parsed.job_title,
        parsed.required_qualifications.as_ref().map_or(0, Vec::len),
        parsed.responsibilities.as_ref().map_or(0, Vec::len)
    );

    Ok(NormalizedJobDescription {
        json,
        parsed: Some(parsed),
        passthrough: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{instant_extractor, text_reply, ScriptedModel};
    use std::sync::Arc;

    const RAW_JD: &str = r#"
        Senior Engineer — Data Platform
        Required: 5+ years Rust, distributed systems.
        Preferred: Kubernetes.
        You will own the ingest pipeline.
    "#;

    #[tokio::test]
    async fn test_json_prefixed_input_passes_through_without_model_call() {
        let model = Arc::new(ScriptedModel::always_failing());
        let extractor = instant_extractor(model.clone(), 5);

        for input in [
            r#"{"job_title": "Engineer"}"#,
            "  \n{\"job_title\": \"Engineer\", \"responsibilities\": []}\n",
            "{ not even valid json",
        ] {
            let normalized = normalize_job_description(input, &extractor).await.unwrap();
            assert_eq!(normalized.json, input);
            assert!(normalized.passthrough);
        }
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_passthrough_parses_when_valid() {
        let extractor = instant_extractor(Arc::new(ScriptedModel::always_failing()), 1);
        let normalized =
            normalize_job_description(r#"{"job_title": "Engineer"}"#, &extractor)
                .await
                .unwrap();
        assert_eq!(
            normalized.parsed.unwrap().job_title.as_deref(),
            Some("Engineer")
        );

        let broken = normalize_job_description("{ nope", &extractor).await.unwrap();
        assert!(broken.parsed.is_none());
    }

    #[tokio::test]
    async fn test_raw_text_is_normalized_via_model() {
        let model = Arc::new(ScriptedModel::new(vec![text_reply(
            r#"```json
            {"job_title": "Senior Engineer", "required_qualifications": ["5+ years Rust"],
             "preferred_qualifications": ["Kubernetes"], "responsibilities": ["Own ingest"]}
            ```"#,
        )]));
        let extractor = instant_extractor(model.clone(), 5);

        let normalized = normalize_job_description(RAW_JD, &extractor).await.unwrap();
        assert!(!normalized.passthrough);
        assert_eq!(model.call_count(), 1);
        assert!(model.prompts()[0].contains("5+ years Rust, distributed systems."));

        let reparsed: serde_json::Value = serde_json::from_str(&normalized.json).unwrap();
        assert_eq!(reparsed["job_title"], "Senior Engineer");
        assert_eq!(reparsed["preferred_qualifications"][0], "Kubernetes");
    }

    #[tokio::test]
    async fn test_normalized_json_omits_keys_the_model_left_out() {
        let model = Arc::new(ScriptedModel::new(vec![text_reply(
            r#"{"job_title": "Data Engineer", "responsibilities": ["Own ingest"], "team": "Platform"}"#,
        )]));
        let extractor = instant_extractor(model, 1);

        let normalized = normalize_job_description(RAW_JD, &extractor).await.unwrap();
        let reparsed: serde_json::Value = serde_json::from_str(&normalized.json).unwrap();
        assert_eq!(
            reparsed,
            serde_json::json!({
                "job_title": "Data Engineer",
                "responsibilities": ["Own ingest"],
                "team": "Platform"
            })
        );
    }

    #[tokio::test]
    async fn test_exhausted_model_is_extraction_failure() {
        let extractor = instant_extractor(Arc::new(ScriptedModel::always_failing()), 2);
        let err = normalize_job_description(RAW_JD, &extractor).await.unwrap_err();
        assert!(matches!(err, StageError::Extraction(Stage::JdNormalization)));
    }

    #[test]
    fn test_prompt_requests_the_four_keys() {
        let prompt = build_normalize_prompt("Backend role");
        for key in [
            "job_title",
            "required_qualifications",
            "preferred_qualifications",
            "responsibilities",
        ] {
            assert!(prompt.contains(key), "missing {key}");
        }
        assert!(prompt.contains("Backend role"));
        assert!(!prompt.contains("{json_only}"));
    }

    #[test]
    fn test_is_prestructured() {
        assert!(is_prestructured("{}"));
        assert!(is_prestructured("\t {\"a\": 1}"));
        assert!(!is_prestructured("Job: {remote}"));
        assert!(!is_prestructured(""));
    }
}

//! Resume Analysis: orchestrates the full screening pipeline.
//!
//! Flow: normalize JD (×1) → for each resume: structure → screen → back-fill
//! name → aggregate ranking (×1, over the successful subset only).
//!
//! Per-resume failures never abort the session; they are collected in
//! `PipelineOutcome::failed`. A failed JD normalization or ranking call, or
//! an empty successful set, ends the session without a report.

use std::pin::pin;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::llm_client::extractor::JsonExtractor;
use crate::screening::jd_normalizer::{normalize_job_description, NormalizedJobDescription};
use crate::screening::metrics::{compute_metrics, AnalysisMetrics};
use crate::screening::models::{CumulativeReport, ScreeningResult};
use crate::screening::ranking::aggregate_ranking;
use crate::screening::resume_structurer::structure_resume;
use crate::screening::screener::{backfill_candidate_name, screen_candidate};
use crate::screening::StageError;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// One uploaded resume. `text` is `None` when upstream text extraction failed.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedStage {
    TextExtraction,
    Structuring,
    Screening,
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeFailure {
    pub file_name: String,
    pub stage: FailedStage,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Resumes processed at once. 1 = strictly sequential.
    pub concurrency: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

/// Explicit split of every uploaded resume into succeeded or failed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineOutcome {
    pub total: usize,
    pub succeeded: Vec<ScreeningResult>,
    pub failed: Vec<ResumeFailure>,
}

/// Final output of a successful session.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub session_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub job_description: NormalizedJobDescription,
    pub report: CumulativeReport,
    pub screenings: Vec<ScreeningResult>,
    pub failures: Vec<ResumeFailure>,
    pub processed: usize,
    pub total: usize,
    pub metrics: AnalysisMetrics,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Could not format the job description: {0}")]
    JobDescription(#[source] StageError),

    #[error("No resumes could be processed successfully ({} of {} failed)", .outcome.failed.len(), .outcome.total)]
    NoResumesProcessed { outcome: PipelineOutcome },

    /// The ranking call failed although screenings succeeded. The session
    /// produces no report; `outcome` keeps the partial results for callers.
    #[error("Could not generate the cumulative report: {source}")]
    AggregationFailed {
        source: StageError,
        outcome: PipelineOutcome,
    },

    #[error("Analysis was cancelled")]
    Cancelled { outcome: Option<PipelineOutcome> },
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full resume analysis session.
pub async fn analyze_resumes(
    extractor: &JsonExtractor,
    raw_jd_text: &str,
    resumes: Vec<ResumeUpload>,
    options: &PipelineOptions,
    cancel: &CancellationToken,
) -> Result<AnalysisReport, AnalysisError> {
    if cancel.is_cancelled() {
        return Err(AnalysisError::Cancelled { outcome: None });
    }

    // Step 1: Normalize JD
    let job_description = normalize_job_description(raw_jd_text, extractor)
        .await
        .map_err(AnalysisError::JobDescription)?;

    // Step 2: Structure + screen every resume
    let outcome = screen_resumes(extractor, &job_description.json, resumes, options, cancel).await;

    if cancel.is_cancelled() {
        warn!("Analysis cancelled after {} of {} resumes", outcome.succeeded.len(), outcome.total);
        return Err(AnalysisError::Cancelled {
            outcome: Some(outcome),
        });
    }

    if outcome.succeeded.is_empty() {
        warn!("No resumes could be processed successfully ({} uploaded)", outcome.total);
        return Err(AnalysisError::NoResumesProcessed { outcome });
    }

    // Step 3: Cumulative ranking over the successful subset only
    info!("Aggregating ranking over {} screened candidates", outcome.succeeded.len());
    let report = match aggregate_ranking(&outcome.succeeded, extractor).await {
        Ok(report) => report,
        Err(source) => {
            warn!("Ranking aggregation failed; discarding {} screenings", outcome.succeeded.len());
            return Err(AnalysisError::AggregationFailed { source, outcome });
        }
    };

    if let Some(top) = report.ranked_by_score().first() {
        info!(
            "Top scored candidate: {} ({:?})",
            top.candidate_name.as_deref().unwrap_or("unknown"),
            top.match_score
        );
    }

    let metrics = compute_metrics(&report, &outcome.succeeded);
    let PipelineOutcome {
        total,
        succeeded,
        failed,
    } = outcome;

    Ok(AnalysisReport {
        session_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        job_description,
        report,
        processed: succeeded.len(),
        screenings: succeeded,
        failures: failed,
        total,
        metrics,
    })
}

/// Structures and screens every resume against `job_description_json`.
/// Resolves only after every resume has succeeded or failed. Result order
/// follows upload order regardless of concurrency.
pub async fn screen_resumes(
    extractor: &JsonExtractor,
    job_description_json: &str,
    resumes: Vec<ResumeUpload>,
    options: &PipelineOptions,
    cancel: &CancellationToken,
) -> PipelineOutcome {
    let total = resumes.len();
    let mut outcome = PipelineOutcome {
        total,
        ..Default::default()
    };

    let mut results = pin!(stream::iter(resumes)
        .map(|upload| process_resume(extractor, job_description_json, upload, cancel))
        .buffered(options.concurrency.max(1)));

    let mut processed = 0usize;
    while let Some(result) = results.next().await {
        processed += 1;
        match result {
            Ok(screening) => {
                info!(
                    "{processed} of {total} processed: {} screened (score {:?})",
                    screening.candidate_name.as_deref().unwrap_or("unknown"),
                    screening.match_score
                );
                outcome.succeeded.push(screening);
            }
            Err(failure) => {
                warn!(
                    "{processed} of {total} processed: {} dropped at {:?}: {}",
                    failure.file_name, failure.stage, failure.reason
                );
                outcome.failed.push(failure);
            }
        }
    }

    outcome
}

async fn process_resume(
    extractor: &JsonExtractor,
    job_description_json: &str,
    upload: ResumeUpload,
    cancel: &CancellationToken,
) -> Result<ScreeningResult, ResumeFailure> {
    let ResumeUpload { file_name, text } = upload;
    let fail = |stage: FailedStage, reason: String| ResumeFailure {
        file_name: file_name.clone(),
        stage,
        reason,
    };

    if cancel.is_cancelled() {
        return Err(fail(FailedStage::Cancelled, "cancelled before structuring".to_string()));
    }

    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return Err(fail(
            FailedStage::TextExtraction,
            "no text could be extracted from the document".to_string(),
        ));
    };

    let profile = structure_resume(&text, extractor)
        .await
        .map_err(|e| fail(FailedStage::Structuring, e.to_string()))?;

    if cancel.is_cancelled() {
        return Err(fail(FailedStage::Cancelled, "cancelled before screening".to_string()));
    }

    let screening = screen_candidate(job_description_json, &profile, extractor)
        .await
        .map_err(|e| fail(FailedStage::Screening, e.to_string()))?;

    Ok(backfill_candidate_name(screening, &profile, &file_name))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

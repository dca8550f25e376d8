use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::screening::pipeline::AnalysisError;

pub const MSG_MISSING_INPUT: &str =
    "Please provide both the job description and at least one resume.";
pub const MSG_JD_NOT_FORMATTED: &str = "Could not format the job description.";
pub const MSG_NO_RESUMES_PROCESSED: &str = "No resumes could be processed successfully.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    Unprocessable(String),

    #[error("Aggregation error: {0}")]
    Aggregation(String),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Validation(format!("Invalid multipart body: {e}"))
    }
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::JobDescription(source) => {
                tracing::warn!("Job description normalization failed: {source}");
                AppError::Unprocessable(MSG_JD_NOT_FORMATTED.to_string())
            }
            AnalysisError::NoResumesProcessed { outcome } => {
                let detail = outcome
                    .failed
                    .iter()
                    .map(|f| format!("{}: {}", f.file_name, f.reason))
                    .collect::<Vec<_>>()
                    .join("; ");
                AppError::Unprocessable(format!("{MSG_NO_RESUMES_PROCESSED} ({detail})"))
            }
            AnalysisError::AggregationFailed { source, outcome } => AppError::Aggregation(
                format!("{source} after screening {} candidates", outcome.succeeded.len()),
            ),
            AnalysisError::Cancelled { .. } => {
                AppError::Cancelled("The analysis was cancelled before it finished".to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unprocessable(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Aggregation(msg) => {
                tracing::error!("Ranking aggregation error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "Could not generate the cumulative report".to_string(),
                )
            }
            AppError::Cancelled(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "CANCELLED",
                msg.clone(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

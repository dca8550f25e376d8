use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::documents::pdf::{extract_text, is_pdf};
use crate::errors::{AppError, MSG_JD_NOT_FORMATTED, MSG_MISSING_INPUT};
use crate::screening::jd_normalizer::{normalize_job_description, NormalizedJobDescription};
use crate::screening::pipeline::{analyze_resumes, AnalysisReport, PipelineOptions, ResumeUpload};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct NormalizeRequest {
    #[serde(default)]
    pub jd_text: String,
}

#[derive(Serialize)]
pub struct NormalizeResponse {
    pub job_description: NormalizedJobDescription,
}

#[derive(Deserialize)]
pub struct ResumeText {
    pub file_name: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Deserialize)]
pub struct AnalyzeTextRequest {
    #[serde(default)]
    pub jd_text: String,
    #[serde(default)]
    pub resumes: Vec<ResumeText>,
}

/// POST /api/v1/jobs/normalize
pub async fn handle_normalize(
    State(state): State<AppState>,
    Json(req): Json<NormalizeRequest>,
) -> Result<Json<NormalizeResponse>, AppError> {
    if req.jd_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Please provide the job description.".to_string(),
        ));
    }

    let job_description = normalize_job_description(&req.jd_text, &state.extractor)
        .await
        .map_err(|e| {
            warn!("Job description normalization failed: {e}");
            AppError::Unprocessable(MSG_JD_NOT_FORMATTED.to_string())
        })?;

    Ok(Json(NormalizeResponse { job_description }))
}

/// POST /api/v1/resumes/analyze
/// Multipart: one `jd_text` field, one or more `resumes` PDF files.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let mut jd_text = String::new();
    let mut files: Vec<(String, Bytes)> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "jd_text" => jd_text = field.text().await?,
            "resumes" => {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                let content_type = field.content_type().map(str::to_string);
                if !is_pdf(&file_name, content_type.as_deref()) {
                    return Err(AppError::Validation(format!(
                        "Only PDF resumes are supported: {file_name}"
                    )));
                }
                let data = field.bytes().await?;
                files.push((file_name, data));
            }
            other => warn!("Ignoring unexpected multipart field '{other}'"),
        }
    }

    require_inputs(&jd_text, files.len())?;
    let resumes = extract_resumes(files).await?;
    run_analysis(&state, &jd_text, resumes).await
}

/// POST /api/v1/resumes/analyze/text
/// Same pipeline over resumes whose text was extracted by the caller.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    require_inputs(&req.jd_text, req.resumes.len())?;

    let resumes = req
        .resumes
        .into_iter()
        .map(|r| ResumeUpload {
            file_name: r.file_name,
            text: r.text,
        })
        .collect();

    run_analysis(&state, &req.jd_text, resumes).await
}

fn require_inputs(jd_text: &str, resume_count: usize) -> Result<(), AppError> {
    if jd_text.trim().is_empty() || resume_count == 0 {
        return Err(AppError::Validation(MSG_MISSING_INPUT.to_string()));
    }
    Ok(())
}

/// PDF parsing is CPU-bound; each document goes to the blocking pool.
async fn extract_resumes(files: Vec<(String, Bytes)>) -> Result<Vec<ResumeUpload>, AppError> {
    let mut resumes = Vec::with_capacity(files.len());
    for (file_name, data) in files {
        let text = tokio::task::spawn_blocking(move || extract_text(&data))
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        match &text {
            Some(t) => info!("Extracted {} chars from {file_name}", t.len()),
            None => warn!("Could not extract text from {file_name}"),
        }
        resumes.push(ResumeUpload { file_name, text });
    }
    Ok(resumes)
}

async fn run_analysis(
    state: &AppState,
    jd_text: &str,
    resumes: Vec<ResumeUpload>,
) -> Result<Json<AnalysisReport>, AppError> {
    let options = PipelineOptions {
        concurrency: state.config.resume_concurrency,
    };
    let cancel = state.shutdown.child_token();

    info!("Starting analysis of {} resumes", resumes.len());
    let report = analyze_resumes(&state.extractor, jd_text, resumes, &options, &cancel).await?;
    info!(
        "Analysis {} complete: {} of {} resumes screened",
        report.session_id, report.processed, report.total
    );
    Ok(Json(report))
}

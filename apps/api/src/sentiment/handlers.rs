use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::sentiment::report::generate_sentiment_report;
use crate::sentiment::table::{
    delimiter_for, is_spreadsheet, load_spreadsheet, load_table, Table, TableError,
};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TableRequest {
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

#[derive(Serialize)]
pub struct SentimentResponse {
    /// Markdown report, or an inline error message from the model call.
    pub report: String,
    pub rows: usize,
    pub columns: Vec<String>,
}

/// POST /api/v1/sentiment/analyze
/// Multipart: one `feedback` file (CSV, TSV, XLSX or XLS).
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SentimentResponse>, AppError> {
    let mut table = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("feedback") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("feedback.csv").to_string();
        let data = field.bytes().await?;
        let loaded = if is_spreadsheet(&file_name) {
            load_spreadsheet(&data)
        } else {
            load_table(&data, delimiter_for(&file_name))
        };
        table = Some(loaded.map_err(read_error)?);
    }

    let table = table.ok_or_else(|| {
        AppError::Validation("Please upload an employee feedback file.".to_string())
    })?;
    Ok(Json(analyze(&state, table).await))
}

/// POST /api/v1/sentiment/analyze/table
pub async fn handle_analyze_table(
    State(state): State<AppState>,
    Json(req): Json<TableRequest>,
) -> Result<Json<SentimentResponse>, AppError> {
    let table = Table::from_json(req.columns, req.rows).map_err(read_error)?;
    Ok(Json(analyze(&state, table).await))
}

fn read_error(e: TableError) -> AppError {
    AppError::Validation(format!("An error occurred while reading the file: {e}"))
}

async fn analyze(state: &AppState, table: Table) -> SentimentResponse {
    let report = generate_sentiment_report(state.model.as_ref(), &table).await;
    SentimentResponse {
        report,
        rows: table.rows.len(),
        columns: table.columns,
    }
}

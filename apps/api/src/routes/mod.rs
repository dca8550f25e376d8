pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers as screening;
use crate::sentiment::handlers as sentiment;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume screening
        .route("/api/v1/jobs/normalize", post(screening::handle_normalize))
        .route(
            "/api/v1/resumes/analyze",
            post(screening::handle_analyze_upload),
        )
        .route(
            "/api/v1/resumes/analyze/text",
            post(screening::handle_analyze_text),
        )
        // Employee sentiment
        .route(
            "/api/v1/sentiment/analyze",
            post(sentiment::handle_analyze_upload),
        )
        .route(
            "/api/v1/sentiment/analyze/table",
            post(sentiment::handle_analyze_table),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

//! Axum router configuration for all endpoints

use axum::{
    Router,
    routing::{get, post},
};

use crate::server::AppState;
use crate::server::handlers::{analysis, interviewers, interviews, outline, status};

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status::status))
        // Interviewers
        .route("/api/sync-interviewers", get(interviewers::sync_interviewers))
        .route(
            "/api/interviewers",
            get(interviewers::list_interviewers).post(interviewers::create_interviewer),
        )
        // Generation and analysis
        .route("/api/generate-outline", post(outline::generate_outline))
        .route(
            "/api/analyze-communication",
            post(analysis::analyze_communication),
        )
        // Interview lifecycle
        .route("/api/interviews", post(interviews::create_interview))
        .route("/api/interviews/{id}", get(interviews::get_interview))
        .route(
            "/api/interviews/{id}/publish",
            post(interviews::publish_interview),
        )
        .route("/api/interviews/{id}/close", post(interviews::close_interview))
        .route("/api/interviews/{id}/analyses", get(interviews::list_analyses))
        .route(
            "/api/interviews/{id}/synthesize",
            post(interviews::synthesize_interview),
        )
        .with_state(state)
}

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    active_sessions: usize,
    summarizer_configured: bool,
}

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        active_sessions: state.sessions.count().await,
        summarizer_configured: state.summarizer.is_some(),
    })
}

// HTTP routes
pub mod billing;
pub mod health;
pub mod report;
pub mod webhook;

pub use billing::*;
pub use health::*;
pub use report::*;
pub use webhook::*;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use report_engine::ReportError;

/// User-visible error envelope for every route.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn session_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "unknown session")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        let status = match &err {
            ReportError::Decode { .. }
            | ReportError::ExtractionEmpty
            | ReportError::Tabular(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ReportError::MissingCredential => StatusCode::SERVICE_UNAVAILABLE,
            ReportError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ReportError::Chart(_) | ReportError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

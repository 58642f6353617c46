//! Webhook receiver.
//!
//! Accepts booking events and relays them, unmodified, to the analytics
//! endpoint. A single HTTP relay; the failure of the downstream call is the
//! failure of this request.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::server::app::AppState;
use crate::server::routes::ApiError;

pub async fn booking_webhook_handler(
    State(state): State<AppState>,
    Json(event): Json<serde_json::Value>,
) -> Result<StatusCode, ApiError> {
    let analytics = state.analytics.as_ref().ok_or_else(|| {
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "analytics forwarding is not configured",
        )
    })?;

    analytics.forward_booking(&event).await.map_err(|e| {
        tracing::warn!(error = %e, "booking event relay failed");
        ApiError::new(StatusCode::BAD_GATEWAY, "could not forward booking event")
    })?;

    Ok(StatusCode::ACCEPTED)
}

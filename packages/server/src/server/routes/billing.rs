//! Billing and entitlement routes.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::app::AppState;
use crate::server::routes::ApiError;

#[derive(Deserialize)]
pub struct CheckoutRequest {
    pub email: String,
    pub plan: String,
}

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// Create a hosted checkout session for a subscription plan.
pub async fn checkout_handler(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let billing = state.billing.as_ref().ok_or_else(|| {
        ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "billing is not configured")
    })?;

    let url = billing
        .checkout_url(
            &request.email,
            &request.plan,
            &state.billing_success_url,
            &state.billing_cancel_url,
        )
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "checkout session creation failed");
            ApiError::new(StatusCode::BAD_GATEWAY, "could not create checkout session")
        })?;

    Ok(Json(CheckoutResponse { url }))
}

#[derive(Deserialize)]
pub struct EntitlementQuery {
    pub email: String,
    /// Optional named flag; when present the response carries its boolean.
    pub feature: Option<String>,
}

#[derive(Serialize)]
pub struct EntitlementResponse {
    pub plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<HashMap<String, bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Look up an account's plan and feature flags.
///
/// Unknown emails are not an error: they resolve to `plan: null` and
/// `enabled: false` so callers can treat absence as "no entitlement".
pub async fn entitlements_handler(
    State(state): State<AppState>,
    Query(query): Query<EntitlementQuery>,
) -> Json<EntitlementResponse> {
    let record = state.entitlements.lookup(&query.email);

    Json(EntitlementResponse {
        plan: record.map(|r| r.plan.clone()),
        features: record.map(|r| r.features.clone()),
        enabled: query
            .feature
            .as_deref()
            .map(|flag| state.entitlements.feature_enabled(&query.email, flag)),
    })
}

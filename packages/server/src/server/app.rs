//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use report_engine::{OpenAiSummarizer, Summarizer};

use crate::config::Config;
use crate::kernel::{AnalyticsForwarder, BillingClient, EntitlementStore, SessionStore};
use crate::server::routes::{
    booking_webhook_handler, checkout_handler, create_session_handler, entitlements_handler,
    export_handler, generate_report_handler, health_handler, upload_handler,
};

/// Uploads are capped well above the post-extraction truncation ceiling.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    /// `None` until an AI credential is configured; report generation then
    /// fails with a visible auth error instead of failing at startup.
    pub summarizer: Option<Arc<dyn Summarizer>>,
    pub billing: Option<Arc<BillingClient>>,
    pub entitlements: Arc<EntitlementStore>,
    pub analytics: Option<Arc<AnalyticsForwarder>>,
    pub billing_success_url: String,
    pub billing_cancel_url: String,
}

impl AppState {
    /// Wire up production collaborators from configuration.
    pub fn from_config(config: &Config) -> Self {
        let summarizer: Option<Arc<dyn Summarizer>> = config
            .openai_api_key
            .as_ref()
            .map(|key| {
                Arc::new(OpenAiSummarizer::new(key.clone(), config.openai_model.clone()))
                    as Arc<dyn Summarizer>
            });
        if summarizer.is_none() {
            tracing::warn!("OPENAI_API_KEY not set - report generation will be unavailable");
        }

        let billing = config
            .billing_secret_key
            .as_ref()
            .map(|key| Arc::new(BillingClient::new(key.clone())));

        let entitlements = match config.entitlements_path.as_deref() {
            Some(path) => match EntitlementStore::load(path) {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    tracing::warn!(error = %e, path, "could not load entitlements, all lookups will miss");
                    Arc::new(EntitlementStore::empty())
                }
            },
            None => Arc::new(EntitlementStore::empty()),
        };

        let analytics = config
            .analytics_url
            .as_ref()
            .map(|url| Arc::new(AnalyticsForwarder::new(url.clone())));

        Self {
            sessions: Arc::new(SessionStore::new()),
            summarizer,
            billing,
            entitlements,
            analytics,
            billing_success_url: config.billing_success_url.clone(),
            billing_cancel_url: config.billing_cancel_url.clone(),
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        // Report pipeline
        .route("/api/sessions", post(create_session_handler))
        .route("/api/sessions/:id/upload", post(upload_handler))
        .route("/api/sessions/:id/report", post(generate_report_handler))
        .route("/api/sessions/:id/export", get(export_handler))
        // Billing + entitlements
        .route("/api/billing/checkout", post(checkout_handler))
        .route("/api/entitlements", get(entitlements_handler))
        // Webhook relay
        .route("/webhooks/booking", post(booking_webhook_handler))
        // Health check
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

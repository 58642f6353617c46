//! Analytics forwarder.
//!
//! Relays booking webhook events to the configured analytics endpoint as a
//! single JSON POST. No queueing, no retry; failure surfaces to the webhook
//! caller.

use anyhow::{bail, Context, Result};

pub struct AnalyticsForwarder {
    http_client: reqwest::Client,
    endpoint: String,
}

impl AnalyticsForwarder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub async fn forward_booking(&self, event: &serde_json::Value) -> Result<()> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .timeout(std::time::Duration::from_secs(10))
            .json(event)
            .send()
            .await
            .context("analytics endpoint unreachable")?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "analytics endpoint rejected booking event");
            bail!("analytics endpoint returned {status}");
        }

        tracing::debug!(endpoint = %self.endpoint, "booking event forwarded");
        Ok(())
    }
}

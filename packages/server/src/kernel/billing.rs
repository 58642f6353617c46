//! Billing collaborator.
//!
//! Thin wrapper over the payment provider's hosted checkout. The core never
//! inspects the provider's internals beyond "a URL string or failure".

use anyhow::{bail, Context, Result};

/// Client for creating hosted checkout sessions.
pub struct BillingClient {
    http_client: reqwest::Client,
    secret_key: String,
    base_url: String,
}

impl BillingClient {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            secret_key: secret_key.into(),
            base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Point at a different provider endpoint (tests, proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Create a subscription checkout session and return its URL.
    pub async fn checkout_url(
        &self,
        email: &str,
        plan_id: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<String> {
        let params = [
            ("mode", "subscription"),
            ("customer_email", email),
            ("line_items[0][price]", plan_id),
            ("line_items[0][quantity]", "1"),
            ("success_url", success_url),
            ("cancel_url", cancel_url),
        ];

        let response = self
            .http_client
            .post(format!("{}/v1/checkout/sessions", self.base_url))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&params)
            .send()
            .await
            .context("checkout session request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, error = %error_text, "checkout session rejected");
            bail!("billing provider error: {status}");
        }

        let body: serde_json::Value = response
            .json()
            .await
            .context("could not parse checkout session response")?;

        body["url"]
            .as_str()
            .map(str::to_string)
            .context("no checkout URL in provider response")
    }
}

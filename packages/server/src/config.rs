use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Missing key surfaces as an auth error when a summary is requested,
    /// not at startup.
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub billing_secret_key: Option<String>,
    pub billing_success_url: String,
    pub billing_cancel_url: String,
    /// Analytics endpoint that booking webhooks are relayed to.
    pub analytics_url: Option<String>,
    /// Flat JSON file of per-account entitlements.
    pub entitlements_path: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            billing_secret_key: env::var("BILLING_SECRET_KEY").ok().filter(|k| !k.is_empty()),
            billing_success_url: env::var("BILLING_SUCCESS_URL")
                .unwrap_or_else(|_| "http://localhost:8080/billing/success".to_string()),
            billing_cancel_url: env::var("BILLING_CANCEL_URL")
                .unwrap_or_else(|_| "http://localhost:8080/billing/cancel".to_string()),
            analytics_url: env::var("ANALYTICS_URL").ok().filter(|u| !u.is_empty()),
            entitlements_path: env::var("ENTITLEMENTS_PATH").ok(),
        })
    }
}

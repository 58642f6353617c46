//! Summarization client.
//!
//! Sends computed KPIs plus report context to a hosted language model and
//! returns executive-summary prose. One synchronous (awaited) attempt, no
//! retries; failures are surfaced to the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::kpi::KpiBundle;

/// Fixed system instruction constraining summary style.
const SYSTEM_PROMPT: &str = "You are a business analyst writing for executives. \
Produce a concise, executive-ready summary in plain English, 150-220 words. \
Lead with the most important figure, explain what changed and why it matters, \
and avoid jargon, bullet lists, and hedging.";

/// Bound on the model's output length.
const MAX_OUTPUT_TOKENS: u32 = 400;

/// Report detail level, ordered from terse to thorough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Brief,
    Medium,
    Detailed,
}

impl DetailLevel {
    fn instruction(self) -> &'static str {
        match self {
            Self::Brief => "Keep it to the essentials only.",
            Self::Medium => "Balance headline figures with one level of supporting detail.",
            Self::Detailed => "Cover every computed metric and its recent movement.",
        }
    }
}

/// Free-form context accompanying the KPI bundle.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryContext {
    /// Brand or company name used in the report title.
    pub brand: String,
    /// Industry/tone label, e.g. "retail" or "SaaS".
    pub industry: String,
    /// Which report sections the user selected.
    pub sections: Vec<String>,
    pub detail: DetailLevel,
    /// Output variability knob, clamped to [0.0, 1.0].
    pub creativity: f32,
}

/// Produces executive-summary prose from a KPI bundle.
///
/// Implementations wrap a specific hosted model; tests use
/// [`crate::testing::MockSummarizer`].
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, kpis: &KpiBundle, ctx: &SummaryContext) -> Result<String>;
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// OpenAI-backed summarizer over the chat-completions REST API.
#[derive(Clone)]
pub struct OpenAiSummarizer {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiSummarizer {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: model.into(),
        }
    }

    /// Set a custom base URL (proxies, compatible providers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn build_user_prompt(kpis: &KpiBundle, ctx: &SummaryContext) -> String {
        let kpi_json = serde_json::to_string_pretty(kpis).unwrap_or_else(|_| "{}".to_string());
        format!(
            "Write the executive summary for a report by {brand} ({industry}).\n\
             Selected sections: {sections}.\n\
             {detail}\n\n\
             Computed KPIs:\n{kpi_json}",
            brand = ctx.brand,
            industry = ctx.industry,
            sections = ctx.sections.join(", "),
            detail = ctx.detail.instruction(),
        )
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, kpis: &KpiBundle, ctx: &SummaryContext) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(ReportError::MissingCredential);
        }

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: Self::build_user_prompt(kpis, ctx),
                },
            ],
            temperature: ctx.creativity.clamp(0.0, 1.0),
            max_tokens: MAX_OUTPUT_TOKENS,
        };

        let start = std::time::Instant::now();
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(std::time::Duration::from_secs(60))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "summarization request failed");
                ReportError::Upstream(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, error = %error_text, "summarization API error");
            return Err(ReportError::Upstream(format!(
                "{status}: {error_text}"
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ReportError::Upstream(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ReportError::Upstream("empty completion".to_string()))?;

        tracing::debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis(),
            summary_chars = content.len(),
            "executive summary generated"
        );

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> SummaryContext {
        SummaryContext {
            brand: "Acme".to_string(),
            industry: "retail".to_string(),
            sections: vec!["Executive Summary".to_string(), "KPIs".to_string()],
            detail: DetailLevel::Medium,
            creativity: 0.4,
        }
    }

    #[test]
    fn user_prompt_embeds_kpis_and_context() {
        let kpis = KpiBundle {
            total_revenue: Some(17700.0),
            ..Default::default()
        };
        let prompt = OpenAiSummarizer::build_user_prompt(&kpis, &context());

        assert!(prompt.contains("Acme"));
        assert!(prompt.contains("retail"));
        assert!(prompt.contains("Executive Summary, KPIs"));
        assert!(prompt.contains("17700"));
    }

    #[tokio::test]
    async fn empty_credential_is_an_auth_failure() {
        let summarizer = OpenAiSummarizer::new("", "gpt-4o");
        let err = summarizer
            .summarize(&KpiBundle::default(), &context())
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::MissingCredential));
    }

    #[test]
    fn detail_levels_are_ordered() {
        assert!(DetailLevel::Brief < DetailLevel::Medium);
        assert!(DetailLevel::Medium < DetailLevel::Detailed);
    }
}

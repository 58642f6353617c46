//! Testing utilities including mock implementations.
//!
//! Useful for exercising the pipeline without real LLM calls.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{ReportError, Result};
use crate::kpi::KpiBundle;
use crate::summarize::{SummaryContext, Summarizer};

/// Record of one call made to the mock summarizer.
#[derive(Debug, Clone)]
pub struct MockSummarizeCall {
    pub brand: String,
    pub creativity: f32,
    pub kpi_keys: Vec<&'static str>,
}

/// A mock summarizer returning canned prose and recording calls.
#[derive(Clone)]
pub struct MockSummarizer {
    response: String,
    calls: Arc<RwLock<Vec<MockSummarizeCall>>>,
}

impl MockSummarizer {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<MockSummarizeCall> {
        self.calls.read().expect("mock lock poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().expect("mock lock poisoned").len()
    }
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self::new("Revenue held steady this period across all tracked regions.")
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, kpis: &KpiBundle, ctx: &SummaryContext) -> Result<String> {
        let mut kpi_keys = Vec::new();
        if kpis.total_revenue.is_some() {
            kpi_keys.push("total_revenue");
        }
        if kpis.by_region.is_some() {
            kpi_keys.push("by_region");
        }
        if kpis.trend_30d.is_some() {
            kpi_keys.push("trend_30d");
        }

        self.calls
            .write()
            .expect("mock lock poisoned")
            .push(MockSummarizeCall {
                brand: ctx.brand.clone(),
                creativity: ctx.creativity,
                kpi_keys,
            });

        Ok(self.response.clone())
    }
}

/// A summarizer that always fails, for upstream-error paths.
pub struct FailingSummarizer;

#[async_trait]
impl Summarizer for FailingSummarizer {
    async fn summarize(&self, _kpis: &KpiBundle, _ctx: &SummaryContext) -> Result<String> {
        Err(ReportError::Upstream("mock upstream failure".to_string()))
    }
}

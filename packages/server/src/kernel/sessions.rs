//! In-memory session store.
//!
//! Every report lives inside one user session: the uploaded inputs, the
//! computed KPI bundle, the chosen configuration, and the latest summary.
//! Sessions are fully independent; nothing is shared across them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use report_engine::{BrandColor, Dataset, DetailLevel, KpiBundle};

/// User-supplied configuration for one report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub title: String,
    /// Subset of {Executive Summary, KPIs, Trends}
    #[serde(default = "default_sections")]
    pub sections: Vec<String>,
    /// Tone/industry label passed through to the summarizer
    #[serde(default = "default_industry")]
    pub industry: String,
    #[serde(default = "default_detail")]
    pub detail: DetailLevel,
    #[serde(default)]
    pub brand_color: BrandColor,
    /// Output variability for the summarizer, clamped to [0.0, 1.0]
    #[serde(default = "default_creativity")]
    pub creativity: f32,
}

fn default_sections() -> Vec<String> {
    vec![
        "Executive Summary".to_string(),
        "KPIs".to_string(),
        "Trends".to_string(),
    ]
}

fn default_industry() -> String {
    "general".to_string()
}

fn default_detail() -> DetailLevel {
    DetailLevel::Medium
}

fn default_creativity() -> f32 {
    0.3
}

/// Per-session intermediate results, passed explicitly between pipeline
/// stages rather than kept as ambient global state.
#[derive(Debug, Clone)]
pub struct ReportSession {
    pub created_at: DateTime<Utc>,
    pub extracted_text: Option<String>,
    pub dataset: Option<Dataset>,
    pub logo: Option<Vec<u8>>,
    pub config: Option<ReportConfig>,
    pub kpis: Option<KpiBundle>,
    pub summary: Option<String>,
    pub chart_png: Option<Vec<u8>>,
}

impl ReportSession {
    fn new() -> Self {
        Self {
            created_at: Utc::now(),
            extracted_text: None,
            dataset: None,
            logo: None,
            config: None,
            kpis: None,
            summary: None,
            chart_png: None,
        }
    }

    /// True once upload produced anything a report could be built from.
    pub fn has_inputs(&self) -> bool {
        self.dataset.is_some()
            || self
                .extracted_text
                .as_deref()
                .is_some_and(|t| !t.trim().is_empty())
    }
}

/// Uuid-keyed session map. One lock around the whole map is enough here:
/// each request touches a single session and holds the lock only for the
/// duration of a field update, never across an await on the AI call.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, ReportSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, ReportSession::new());
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<ReportSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Apply a mutation to one session. Returns `None` for unknown ids.
    pub async fn update<F, T>(&self, id: Uuid, f: F) -> Option<T>
    where
        F: FnOnce(&mut ReportSession) -> T,
    {
        self.sessions.write().await.get_mut(&id).map(f)
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

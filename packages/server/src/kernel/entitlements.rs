//! Entitlement lookup.
//!
//! Flat JSON file keyed by account email, each record carrying a plan id and
//! feature flags. Read-only; unknown emails resolve to `None`/`false`.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One account's subscription record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitlementRecord {
    pub plan: String,
    #[serde(default)]
    pub features: HashMap<String, bool>,
}

/// In-memory view of the entitlement file, loaded once at startup.
#[derive(Default)]
pub struct EntitlementStore {
    records: HashMap<String, EntitlementRecord>,
}

impl EntitlementStore {
    /// An empty store: every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("could not read entitlement file at {path}"))?;
        Self::from_json(&raw).with_context(|| format!("invalid entitlement file at {path}"))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: HashMap<String, EntitlementRecord> =
            serde_json::from_str(raw).context("entitlement file is not valid JSON")?;
        // Emails are matched case-insensitively
        let records = parsed
            .into_iter()
            .map(|(email, record)| (email.to_lowercase(), record))
            .collect();
        Ok(Self { records })
    }

    pub fn lookup(&self, email: &str) -> Option<&EntitlementRecord> {
        self.records.get(&email.to_lowercase())
    }

    pub fn plan_for(&self, email: &str) -> Option<&str> {
        self.lookup(email).map(|r| r.plan.as_str())
    }

    pub fn feature_enabled(&self, email: &str, feature: &str) -> bool {
        self.lookup(email)
            .and_then(|r| r.features.get(feature).copied())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "ana@example.com": {"plan": "pro", "features": {"export_docx": true, "beta": false}},
        "raj@example.com": {"plan": "starter"}
    }"#;

    #[test]
    fn lookup_is_case_insensitive() {
        let store = EntitlementStore::from_json(FIXTURE).unwrap();
        assert_eq!(store.plan_for("Ana@Example.com"), Some("pro"));
    }

    #[test]
    fn unknown_email_resolves_to_none_and_false() {
        let store = EntitlementStore::from_json(FIXTURE).unwrap();
        assert_eq!(store.plan_for("nobody@example.com"), None);
        assert!(!store.feature_enabled("nobody@example.com", "export_docx"));
    }

    #[test]
    fn feature_flags_default_to_false_when_absent() {
        let store = EntitlementStore::from_json(FIXTURE).unwrap();
        assert!(store.feature_enabled("ana@example.com", "export_docx"));
        assert!(!store.feature_enabled("ana@example.com", "beta"));
        assert!(!store.feature_enabled("raj@example.com", "export_docx"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(EntitlementStore::from_json("not json").is_err());
    }
}

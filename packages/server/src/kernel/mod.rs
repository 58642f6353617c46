//! Kernel module - server infrastructure and external collaborators.

pub mod analytics;
pub mod billing;
pub mod entitlements;
pub mod sessions;

pub use analytics::AnalyticsForwarder;
pub use billing::BillingClient;
pub use entitlements::{EntitlementRecord, EntitlementStore};
pub use sessions::{ReportConfig, ReportSession, SessionStore};

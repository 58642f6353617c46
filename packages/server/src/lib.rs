// Executive report generator - API core
//
// This crate provides the HTTP surface around the report pipeline crate:
// session-scoped orchestration (upload -> KPIs -> summary -> export) plus
// the billing, entitlement, and analytics collaborators.

pub mod config;
pub mod kernel;
pub mod server;

pub use config::Config;

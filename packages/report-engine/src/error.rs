//! Typed errors for the report pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match
//! on the failure kind and map it to a user-facing message.

use thiserror::Error;

/// Errors that can occur while building a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Uploaded file bytes could not be decoded as text / a readable document
    #[error("could not decode '{name}': {reason}")]
    Decode { name: String, reason: String },

    /// All inputs were processed and no usable text came out
    #[error("no usable text was extracted from the provided inputs")]
    ExtractionEmpty,

    /// Tabular source (CSV/XLSX) could not be parsed
    #[error("could not read tabular data: {0}")]
    Tabular(String),

    /// No AI credential is configured
    #[error("AI credential is not configured")]
    MissingCredential,

    /// The hosted language model call failed or timed out
    #[error("summarization request failed: {0}")]
    Upstream(String),

    /// Chart rasterization failed
    #[error("chart rendering failed: {0}")]
    Chart(String),

    /// Document composition failed (beyond a skippable image embed)
    #[error("document export failed: {0}")]
    Export(String),
}

/// Result type alias for report pipeline operations.
pub type Result<T> = std::result::Result<T, ReportError>;

//! Report pipeline library
//!
//! A linear pipeline from uploaded business documents to a branded report:
//!
//! upload -> text/tabular extraction -> KPI aggregation -> AI summarization
//! -> chart rendering -> PDF/DOCX export
//!
//! Each stage takes the prior stage's output as an explicit argument and
//! returns its own output; there is no hidden shared state. Everything here
//! is domain logic with typed errors - HTTP and session handling live in the
//! server crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use report_engine::{combine_inputs, compute_kpis, Dataset, UploadedFile};
//!
//! let files = vec![UploadedFile::new("sales.csv", bytes)];
//! let text = combine_inputs(&files, None)?;
//! let dataset = Dataset::from_csv(&text)?;
//! let kpis = compute_kpis(&dataset);
//! ```

pub mod chart;
pub mod dataset;
pub mod error;
pub mod export;
pub mod ingest;
pub mod kpi;
pub mod summarize;
pub mod testing;

pub use chart::{render_region_chart, ChartStyle};
pub use dataset::{Dataset, Record};
pub use error::{ReportError, Result};
pub use export::{BrandColor, DocumentComposer, DocumentInput, DocxComposer, ExportFormat, PdfComposer};
pub use ingest::{combine_inputs, extract_file, UploadedFile, MAX_COMBINED_CHARS};
pub use kpi::{compute_kpis, KpiBundle, TrendWindow};
pub use summarize::{DetailLevel, OpenAiSummarizer, SummaryContext, Summarizer};

//! # jadwal
//!
//! Extract tables from (primarily Arabic) PDF reports with two independent
//! detection strategies and merge the results into one hybrid list.
//!
//! ## Why two strategies?
//!
//! Financial and statistical reports mix fully ruled tables with tables that
//! only draw horizontal separators. A lattice detector nails the former and
//! misses the latter; a text-position detector handles the latter but
//! produces ragged, fragment-ridden rows. Running both and concatenating the
//! results covers the document at the cost of occasional duplicates, which
//! downstream consumers reconcile using page numbers and bounding boxes.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ resolve   path / URL / uploaded bytes → local file
//!  ├─ pages     selector ("all", "1-3,7") → page list, bounds-checked
//!  ├─ detect    ruled-line ──┐            (concurrent, independent)
//!  │            horizontal ──┤
//!  ├─ repair    normalize → re-fuse numerals → enforce width → drop
//!  │            footnotes   (horizontal-line candidates only)
//!  └─ merge     ruled tables first, then horizontal by page; tagged origin
//! ```
//!
//! The repair stage exists because the horizontal-line finder splits rows on
//! derived column edges: multi-digit Eastern Arabic values come back as
//! adjacent fragments, row widths disagree, and recurring disclaimer
//! sentences masquerade as data rows.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jadwal::{extract_tables, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::builder().pages("all").build()?;
//!     let output = extract_tables("report.pdf", &config).await?;
//!     for table in &output.tables {
//!         println!("page {} ({:?}): {} rows", table.page, table.origin, table.rows.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description                                        |
//! |----------|---------|----------------------------------------------------|
//! | `server` | via cli | Embeddable axum router ([`server`])                |
//! | `cli`    | on      | The `jadwal` binary (clap + anyhow + subscriber)   |
//!
//! Disable default features when using only the library:
//! ```toml
//! jadwal = { version = "0.1", default-features = false }
//! ```
//!
//! ## The engine
//!
//! Page geometry and text come from pdfium through the trait seams in
//! [`detect`]; swap in another PDF stack by implementing those traits and
//! setting the override slots on [`ExtractionConfig`]. The binary expects a
//! pdfium system library at runtime (or one placed next to the executable).

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod detect;
pub mod error;
pub mod extract;
pub mod input;
pub mod output;
pub mod pages;
pub mod pipeline;
#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    DetectionSettings, EdgeStrategy, ExtractionConfig, ExtractionConfigBuilder,
    DEFAULT_FOOTNOTE_MARKERS,
};
pub use error::{DetectionError, ExtractError};
pub use extract::{extract_tables, extract_tables_from_bytes, inspect, inspect_bytes};
pub use output::{
    BBox, DetectionFailure, DocumentSummary, ExtractionOutput, ExtractionStats, Origin, Table,
};
pub use pages::resolve_pages;
#[cfg(feature = "server")]
pub use server::{build_router, start_server, ApiState};

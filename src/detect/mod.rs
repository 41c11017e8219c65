//! Detection collaborators: the seams between the pipeline and the PDF
//! engine.
//!
//! The pipeline and merger never talk to a PDF library directly — they see
//! three small traits, one per collaborator role. The built-in
//! implementations in [`pdfium`] bind the system pdfium library; embedders
//! with their own PDF stack (and the test suite, which injects fixed-output
//! fakes) swap them through the override slots on
//! [`crate::config::ExtractionConfig`].
//!
//! Detection quality is a collaborator concern: nothing upstream of these
//! traits depends on *how* a table was found, only on the raw matrices that
//! come back.

pub mod pdfium;

use crate::config::DetectionSettings;
use crate::error::{DetectionError, ExtractError};
use crate::output::BBox;
use std::path::Path;

/// A finished table from the ruled-line detector.
///
/// The contract is a fully-formed, clean cell matrix plus the page it came
/// from; it is tagged with its origin and passed through, never fed to the
/// row pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct RuledTable {
    /// 1-based page number.
    pub page: usize,
    /// Rectangular cell matrix.
    pub rows: Vec<Vec<String>>,
}

/// A raw candidate table from the horizontal-line finder.
///
/// Rows may be ragged, cells may be `None`, contain newlines, or hold split
/// numeral fragments — repairing all of that is the row pipeline's job.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateTable {
    /// 1-based page number.
    pub page: usize,
    /// Row-major raw cells; `None` is a cell region with no text.
    pub rows: Vec<Vec<Option<String>>>,
    /// Bounding box of the detected region.
    pub bbox: BBox,
}

/// What one strategy produced for one request.
///
/// Per-page failures ride alongside the tables that did come out, so one bad
/// page never discards the rest of the strategy's work.
#[derive(Debug, Clone)]
pub struct StrategyReport<T> {
    pub tables: Vec<T>,
    pub failures: Vec<DetectionError>,
}

impl<T> Default for StrategyReport<T> {
    fn default() -> Self {
        Self {
            tables: Vec::new(),
            failures: Vec::new(),
        }
    }
}

/// Supplies page count and page text for a document.
///
/// Unlike the two detectors, reader failures are fatal: without a page count
/// the selector cannot be resolved, so there is no partial result to save.
pub trait DocumentReader: Send + Sync {
    /// Number of pages in the document.
    fn page_count(&self, pdf: &Path) -> Result<usize, ExtractError>;

    /// Text layer of one 1-based page.
    fn page_text(&self, pdf: &Path, page: usize) -> Result<String, ExtractError>;
}

/// Finds tables by following drawn grid lines (lattice detection).
pub trait RuledTableDetector: Send + Sync {
    /// Detect ruled tables on the given 1-based pages, in page order.
    ///
    /// A top-level `Err` means the strategy could not run at all; per-page
    /// problems are recorded in the report instead.
    fn detect(&self, pdf: &Path, pages: &[usize]) -> Result<StrategyReport<RuledTable>, DetectionError>;
}

/// Finds candidate tables from horizontal rules plus text positions.
pub trait LineTableFinder: Send + Sync {
    /// Find raw candidate tables on the given 1-based pages, in page order.
    ///
    /// A top-level `Err` means the strategy could not run at all; per-page
    /// problems are recorded in the report instead.
    fn find(
        &self,
        pdf: &Path,
        pages: &[usize],
        settings: &DetectionSettings,
    ) -> Result<StrategyReport<CandidateTable>, DetectionError>;
}

//! Configuration types for table extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across handlers, log them, and diff two runs
//! to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! Callers set only what they care about and rely on documented defaults for
//! the rest; adding a field never breaks a call site.

use crate::detect::{DocumentReader, LineTableFinder, RuledTableDetector};
use crate::error::ExtractError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Edge-derivation strategy for one axis of the horizontal-line finder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStrategy {
    /// Derive edges from drawn rules.
    Lines,
    /// Derive edges from text positions.
    Text,
}

/// Tuning parameters consumed when invoking the horizontal-line finder.
///
/// These are constants for this version of the service — the values the
/// report layout was calibrated against — and are recorded alongside every
/// resulting table so a stored result can always be traced back to the
/// parameters that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionSettings {
    /// How column edges are derived.
    pub vertical_strategy: EdgeStrategy,
    /// How row edges are derived.
    pub horizontal_strategy: EdgeStrategy,
    /// Tolerance in points when clustering nearby parallel rules.
    pub snap_tolerance: f32,
    /// Tolerance in points when assigning text to rows and splitting cells.
    pub text_tolerance: f32,
    /// Tolerance in points when matching rules against the table region.
    pub intersection_tolerance: f32,
    /// Minimum multi-cell rows for a candidate to count as a table.
    pub min_words_vertical: usize,
    /// Minimum text segments for a band to count as a row.
    pub min_words_horizontal: usize,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            vertical_strategy: EdgeStrategy::Text,
            horizontal_strategy: EdgeStrategy::Lines,
            snap_tolerance: 5.0,
            text_tolerance: 6.0,
            intersection_tolerance: 5.0,
            min_words_vertical: 2,
            min_words_horizontal: 1,
        }
    }
}

/// Default marker phrases identifying document-wide disclaimer rows in the
/// report layout this service was built for.
pub const DEFAULT_FOOTNOTE_MARKERS: [&str; 4] = ["إن معلومات", "توزيع", "توجد", "تعتمد"];

/// Configuration for a table-extraction request.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use jadwal::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .pages("2-5,9")
///     .download_timeout_secs(60)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Page selector expression. `"all"` or comma-separated page numbers and
    /// inclusive ranges (`"3"`, `"5-9"`, `"1-3,7"`). Default: `"1"`.
    pub pages: String,

    /// Tuning parameters for the horizontal-line finder.
    pub settings: DetectionSettings,

    /// Marker phrases that classify a row as a footnote. A row whose cells,
    /// joined with single spaces, contain any of these as a substring is
    /// removed. Default: [`DEFAULT_FOOTNOTE_MARKERS`]. Empty disables the
    /// filter.
    pub footnote_markers: Vec<String>,

    /// Pre-constructed page reader. `None` uses the built-in pdfium reader.
    ///
    /// The override slots exist for embedders with their own PDF stack and
    /// for tests, which inject fixed-output fakes and never touch pdfium.
    pub reader: Option<Arc<dyn DocumentReader>>,

    /// Pre-constructed ruled-line detector. `None` uses the built-in
    /// pdfium-backed lattice detector.
    pub ruled_detector: Option<Arc<dyn RuledTableDetector>>,

    /// Pre-constructed horizontal-line finder. `None` uses the built-in
    /// pdfium-backed finder.
    pub line_finder: Option<Arc<dyn LineTableFinder>>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            pages: "1".to_string(),
            settings: DetectionSettings::default(),
            footnote_markers: DEFAULT_FOOTNOTE_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            reader: None,
            ruled_detector: None,
            line_finder: None,
            download_timeout_secs: 120,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("pages", &self.pages)
            .field("settings", &self.settings)
            .field("footnote_markers", &self.footnote_markers)
            .field("reader", &self.reader.as_ref().map(|_| "<dyn DocumentReader>"))
            .field(
                "ruled_detector",
                &self.ruled_detector.as_ref().map(|_| "<dyn RuledTableDetector>"),
            )
            .field(
                "line_finder",
                &self.line_finder.as_ref().map(|_| "<dyn LineTableFinder>"),
            )
            .field("download_timeout_secs", &self.download_timeout_secs)
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn pages(mut self, selector: impl Into<String>) -> Self {
        self.config.pages = selector.into();
        self
    }

    pub fn settings(mut self, settings: DetectionSettings) -> Self {
        self.config.settings = settings;
        self
    }

    pub fn footnote_markers(mut self, markers: Vec<String>) -> Self {
        self.config.footnote_markers = markers;
        self
    }

    pub fn reader(mut self, reader: Arc<dyn DocumentReader>) -> Self {
        self.config.reader = Some(reader);
        self
    }

    pub fn ruled_detector(mut self, detector: Arc<dyn RuledTableDetector>) -> Self {
        self.config.ruled_detector = Some(detector);
        self
    }

    pub fn line_finder(mut self, finder: Arc<dyn LineTableFinder>) -> Self {
        self.config.line_finder = Some(finder);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.pages.trim().is_empty() {
            return Err(ExtractError::InvalidConfig(
                "page selector must not be empty".into(),
            ));
        }
        let s = &c.settings;
        if s.snap_tolerance < 0.0 || s.text_tolerance < 0.0 || s.intersection_tolerance < 0.0 {
            return Err(ExtractError::InvalidConfig(format!(
                "tolerances must be non-negative, got snap={} text={} intersection={}",
                s.snap_tolerance, s.text_tolerance, s.intersection_tolerance
            )));
        }
        if s.min_words_horizontal == 0 {
            return Err(ExtractError::InvalidConfig(
                "min_words_horizontal must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

//! Output types: extracted tables and per-request accounting.
//!
//! The two detection flavours share one sum-typed [`Table`] with an
//! [`Origin`] discriminant instead of parallel ad hoc shapes — downstream
//! code matches on the tag instead of sniffing which fields are present.
//! Wire names (`ruled_line` / `horizontal_lines`) are kept compatible with
//! the service this crate replaces.

use crate::config::DetectionSettings;
use crate::error::DetectionError;
use serde::{Deserialize, Serialize};

/// Which detection strategy produced a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// Found by following drawn grid lines (lattice detection).
    #[serde(rename = "ruled_line")]
    RuledLine,
    /// Found from horizontal rules plus text positions.
    #[serde(rename = "horizontal_lines")]
    HorizontalLine,
}

/// Bounding box in PDF points, `(x0, top, x1, bottom)` with a top-left
/// origin. Supplied by the horizontal-line detector; treated as opaque by
/// the pipeline and passed through for downstream reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub top: f32,
    pub x1: f32,
    pub bottom: f32,
}

/// One extracted table.
///
/// Past the column shape enforcer every row in `rows` has identical length.
/// Ruled-line tables carry no geometry or settings: that detector's contract
/// is a finished matrix plus a page number, nothing more.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// 1-based page number the table was found on.
    pub page: usize,
    /// Detection strategy that produced this table.
    #[serde(rename = "type")]
    pub origin: Origin,
    /// Row-major cell matrix.
    pub rows: Vec<Vec<String>>,
    /// Table bounding box (horizontal-line tables only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox>,
    /// Detection parameters in force when the table was found
    /// (horizontal-line tables only, recorded for traceability).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<DetectionSettings>,
}

/// A recorded, non-fatal detection failure.
///
/// One entry per (strategy, page) pair that errored; the rest of the request
/// is unaffected. `page` is `None` when the whole strategy could not run
/// (e.g. the detector failed to open the document).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionFailure {
    pub origin: Origin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    pub detail: String,
}

impl DetectionFailure {
    /// Record a [`DetectionError`] against the strategy that raised it.
    pub fn from_error(origin: Origin, err: &DetectionError) -> Self {
        match err {
            DetectionError::Unavailable { detail } => Self {
                origin,
                page: None,
                detail: detail.clone(),
            },
            DetectionError::Page { page, detail } => Self {
                origin,
                page: Some(*page),
                detail: detail.clone(),
            },
        }
    }
}

/// Timing and accounting for one extraction request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages in the document.
    pub total_pages: usize,
    /// Pages the selector resolved to (duplicates counted).
    pub pages_scanned: usize,
    /// Tables produced by the ruled-line strategy.
    pub ruled_tables: usize,
    /// Tables produced by the horizontal-line strategy.
    pub horizontal_tables: usize,
    /// Horizontal-line candidates discarded by the pipeline (fewer than two
    /// usable rows after normalization and footnote removal).
    pub dropped_tables: usize,
    /// Wall-clock duration of the whole request in milliseconds.
    pub total_duration_ms: u64,
    /// Wall-clock duration of the ruled-line strategy.
    pub ruled_duration_ms: u64,
    /// Wall-clock duration of the horizontal-line strategy (detection plus
    /// the row pipeline).
    pub horizontal_duration_ms: u64,
}

/// Result of one extraction request.
///
/// `tables` is the hybrid list: ruled-line tables first, in detector order,
/// then horizontal-line tables in page order. Tables found by both
/// strategies appear twice — reconciliation is left to the caller, which has
/// page numbers and bounding boxes to match on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    pub tables: Vec<Table>,
    /// Non-fatal per-strategy failures (empty on full success).
    pub failures: Vec<DetectionFailure>,
    pub stats: ExtractionStats,
}

/// Page count plus a text sample, for quick document triage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Pages in the document.
    pub pages: usize,
    /// First 500 characters of page 1's text layer.
    pub sample_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_wire_names() {
        assert_eq!(
            serde_json::to_string(&Origin::RuledLine).unwrap(),
            "\"ruled_line\""
        );
        assert_eq!(
            serde_json::to_string(&Origin::HorizontalLine).unwrap(),
            "\"horizontal_lines\""
        );
    }

    #[test]
    fn ruled_table_omits_geometry() {
        let t = Table {
            page: 3,
            origin: Origin::RuledLine,
            rows: vec![vec!["a".into(), "b".into()]],
            bbox: None,
            settings: None,
        };
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["page"], 3);
        assert_eq!(json["type"], "ruled_line");
        assert!(json.get("bbox").is_none());
        assert!(json.get("settings").is_none());
    }

    #[test]
    fn failure_from_page_error() {
        let err = DetectionError::Page {
            page: 7,
            detail: "boom".into(),
        };
        let f = DetectionFailure::from_error(Origin::HorizontalLine, &err);
        assert_eq!(f.page, Some(7));
        assert_eq!(f.detail, "boom");
    }

    #[test]
    fn failure_from_unavailable_has_no_page() {
        let err = DetectionError::Unavailable {
            detail: "no pdfium".into(),
        };
        let f = DetectionFailure::from_error(Origin::RuledLine, &err);
        assert_eq!(f.page, None);
    }
}

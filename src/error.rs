//! Error types for the jadwal library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ExtractError`] — **Fatal**: the extraction cannot proceed at all
//!   (malformed page selector, bad input file, pdfium unavailable). Returned
//!   as `Err(ExtractError)` from the top-level `extract_*` functions.
//!
//! * [`DetectionError`] — **Non-fatal**: one detection strategy failed for
//!   one document or page while the other strategy is unaffected. Recorded as
//!   [`crate::output::DetectionFailure`] entries in the output so callers can
//!   see partial success instead of losing every table to one bad page.
//!
//! A table reduced below two rows by the pipeline is neither: it is silently
//! excluded and counted in [`crate::output::ExtractionStats::dropped_tables`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the jadwal library.
///
/// Strategy-level failures use [`DetectionError`] and are stored in
/// [`crate::output::ExtractionOutput::failures`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Page selector errors ──────────────────────────────────────────────
    /// A selector token is neither an integer nor a `start-end` range.
    #[error("Invalid page selector token '{token}'\nExpected \"all\", a page number, or a range like \"5-9\".")]
    InvalidPageSelector { token: String },

    /// A `start-end` range with `start > end`. Rejected rather than treated
    /// as empty or reversed.
    #[error("Invalid page range {start}-{end}: start must not exceed end")]
    InvalidRange { start: usize, end: usize },

    /// A resolved page number falls outside the document. Raised before any
    /// detection work runs so no partial results are thrown away.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfBounds { page: usize, total: usize },

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install pdfium as a system library, or place libpdfium next to the binary.\n\
See https://github.com/paulocoutinhox/pdfium-lib/releases for builds."
    )]
    PdfiumBindingFailed(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal failure of one detection strategy.
///
/// Isolated to the (strategy, page) pair that produced it: the hybrid merger
/// records it and carries on with everything else. No retry is performed —
/// detection failures are assumed deterministic for a given input.
#[derive(Debug, Clone, Error)]
pub enum DetectionError {
    /// The detector could not run at all (binding failure, unreadable file).
    /// Affects every requested page of that strategy.
    #[error("detector unavailable: {detail}")]
    Unavailable { detail: String },

    /// The document opened but a single page failed.
    #[error("page {page}: {detail}")]
    Page { page: usize, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_range_display() {
        let e = ExtractError::InvalidRange { start: 3, end: 1 };
        let msg = e.to_string();
        assert!(msg.contains("3-1"), "got: {msg}");
    }

    #[test]
    fn page_out_of_bounds_display() {
        let e = ExtractError::PageOutOfBounds { page: 12, total: 9 };
        let msg = e.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("9 pages"));
    }

    #[test]
    fn invalid_selector_names_token() {
        let e = ExtractError::InvalidPageSelector {
            token: "abc".into(),
        };
        assert!(e.to_string().contains("'abc'"));
    }

    #[test]
    fn detection_error_page_display() {
        let e = DetectionError::Page {
            page: 4,
            detail: "no text layer".into(),
        };
        assert!(e.to_string().contains("page 4"));
        assert!(e.to_string().contains("no text layer"));
    }
}

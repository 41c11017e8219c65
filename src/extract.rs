//! Extraction entry points and the hybrid merger.
//!
//! ## The hybrid contract
//!
//! Two detection strategies run per request — ruled-line (lattice) and
//! horizontal-line — with no shared state and no data dependency, so they
//! run concurrently on blocking threads (pdfium is not async-safe, same
//! reason the engine work here lives in `spawn_blocking`). Their outputs
//! concatenate in a *fixed* order: every ruled-line table first, in detector
//! order, then every horizontal-line table in page order. Ordering is a
//! function of origin, never of which strategy finished first.
//!
//! A failure in one strategy is recorded and does not touch the other's
//! results. Tables the strategies both found appear twice — reconciliation
//! is deliberately left to the caller, which has page numbers and bounding
//! boxes to match on.

use crate::config::ExtractionConfig;
use crate::detect::pdfium::{PdfiumLineFinder, PdfiumReader, PdfiumRuledDetector};
use crate::detect::{DocumentReader, LineTableFinder, RuledTableDetector};
use crate::error::ExtractError;
use crate::output::{
    DetectionFailure, DocumentSummary, ExtractionOutput, ExtractionStats, Origin, Table,
};
use crate::{input, pages, pipeline};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extract tables from a PDF file or URL.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_str` — Local file path or HTTP/HTTPS URL to a PDF
/// * `config`    — Extraction configuration (page selector, tuning, overrides)
///
/// # Returns
/// `Ok(ExtractionOutput)` on success, even if one strategy failed — check
/// `output.failures` for anything that went wrong along the way.
///
/// # Errors
/// Returns `Err(ExtractError)` only for fatal errors: malformed page
/// selector, page out of bounds, unusable input file, engine unavailable.
pub async fn extract_tables(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting extraction: {}", input_str);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let pdf_path = resolved.path().to_path_buf();

    // ── Step 2: Resolve the page selector against the document ──────────
    let reader = reader_for(config);
    let total_pages = {
        let path = pdf_path.clone();
        let reader = Arc::clone(&reader);
        tokio::task::spawn_blocking(move || reader.page_count(&path))
            .await
            .map_err(|e| ExtractError::Internal(format!("page-count task panicked: {}", e)))??
    };
    // Bounds-checked here, before any detection work: an invalid selector
    // must not cost the caller a half-finished extraction.
    let page_list = pages::resolve_pages(&config.pages, total_pages)?;
    debug!(
        "Document has {} pages; selector '{}' resolved to {} pages",
        total_pages,
        config.pages,
        page_list.len()
    );

    // ── Step 3: Run both strategies concurrently ─────────────────────────
    let ruled_task = {
        let detector = ruled_detector_for(config);
        let path = pdf_path.clone();
        let pages = page_list.clone();
        tokio::task::spawn_blocking(move || {
            let start = Instant::now();
            let outcome = detector.detect(&path, &pages);
            (outcome, start.elapsed().as_millis() as u64)
        })
    };

    let horizontal_task = {
        let finder = line_finder_for(config);
        let path = pdf_path.clone();
        let pages = page_list.clone();
        let settings = config.settings;
        let markers = config.footnote_markers.clone();
        tokio::task::spawn_blocking(move || {
            let start = Instant::now();
            // The row pipeline runs inside the strategy task so each table is
            // transformed atomically within its strategy's timing window.
            let outcome = finder.find(&path, &pages, &settings).map(|report| {
                let mut tables = Vec::new();
                let mut dropped = 0usize;
                for candidate in report.tables {
                    match pipeline::clean_table(&candidate.rows, &markers) {
                        Some(rows) => tables.push(Table {
                            page: candidate.page,
                            origin: Origin::HorizontalLine,
                            rows,
                            bbox: Some(candidate.bbox),
                            settings: Some(settings),
                        }),
                        None => dropped += 1,
                    }
                }
                (tables, report.failures, dropped)
            });
            (outcome, start.elapsed().as_millis() as u64)
        })
    };

    let (ruled_joined, horizontal_joined) = tokio::join!(ruled_task, horizontal_task);
    let (ruled_outcome, ruled_duration_ms) = ruled_joined
        .map_err(|e| ExtractError::Internal(format!("ruled-line task panicked: {}", e)))?;
    let (horizontal_outcome, horizontal_duration_ms) = horizontal_joined
        .map_err(|e| ExtractError::Internal(format!("horizontal-line task panicked: {}", e)))?;

    // ── Step 4: Concatenate in origin order ──────────────────────────────
    let mut tables = Vec::new();
    let mut failures = Vec::new();
    let mut dropped_tables = 0usize;

    match ruled_outcome {
        Ok(report) => {
            for err in &report.failures {
                warn!("ruled-line strategy: {}", err);
                failures.push(DetectionFailure::from_error(Origin::RuledLine, err));
            }
            tables.extend(report.tables.into_iter().map(|t| Table {
                page: t.page,
                origin: Origin::RuledLine,
                rows: t.rows,
                bbox: None,
                settings: None,
            }));
        }
        Err(err) => {
            warn!("ruled-line strategy unavailable: {}", err);
            failures.push(DetectionFailure::from_error(Origin::RuledLine, &err));
        }
    }
    let ruled_tables = tables.len();

    match horizontal_outcome {
        Ok((mut horizontal_tables, strategy_failures, dropped)) => {
            for err in &strategy_failures {
                warn!("horizontal-line strategy: {}", err);
                failures.push(DetectionFailure::from_error(Origin::HorizontalLine, err));
            }
            dropped_tables = dropped;
            tables.append(&mut horizontal_tables);
        }
        Err(err) => {
            warn!("horizontal-line strategy unavailable: {}", err);
            failures.push(DetectionFailure::from_error(Origin::HorizontalLine, &err));
        }
    }
    let horizontal_tables = tables.len() - ruled_tables;

    let stats = ExtractionStats {
        total_pages,
        pages_scanned: page_list.len(),
        ruled_tables,
        horizontal_tables,
        dropped_tables,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        ruled_duration_ms,
        horizontal_duration_ms,
    };

    info!(
        "Extraction complete: {} tables ({} ruled, {} horizontal, {} dropped), {}ms",
        tables.len(),
        stats.ruled_tables,
        stats.horizontal_tables,
        stats.dropped_tables,
        stats.total_duration_ms
    );

    Ok(ExtractionOutput {
        tables,
        failures,
        stats,
    })
}

/// Extract tables from PDF bytes in memory.
///
/// The engine needs a file-system path, so the bytes land in a managed
/// [`tempfile`] that is cleaned up automatically on return or panic. This is
/// the entry point the HTTP upload handler uses.
pub async fn extract_tables_from_bytes(
    bytes: &[u8],
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let tmp = write_temp_pdf(bytes)?;
    let path = tmp.path().to_string_lossy().to_string();
    // `tmp` drops (and the file is deleted) when this function returns
    extract_tables(&path, config).await
}

/// Page count plus the first 500 characters of page 1 — enough to check a
/// document decoded sensibly before paying for a full extraction.
pub async fn inspect(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<DocumentSummary, ExtractError> {
    let resolved = input::resolve_input(input_str.as_ref(), config.download_timeout_secs).await?;
    let pdf_path = resolved.path().to_path_buf();
    let reader = reader_for(config);

    tokio::task::spawn_blocking(move || summarize(reader.as_ref(), &pdf_path))
        .await
        .map_err(|e| ExtractError::Internal(format!("inspect task panicked: {}", e)))?
}

/// Bytes-in variant of [`inspect`], used by the HTTP debug endpoint.
pub async fn inspect_bytes(
    bytes: &[u8],
    config: &ExtractionConfig,
) -> Result<DocumentSummary, ExtractError> {
    let tmp = write_temp_pdf(bytes)?;
    let path = tmp.path().to_string_lossy().to_string();
    inspect(&path, config).await
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn reader_for(config: &ExtractionConfig) -> Arc<dyn DocumentReader> {
    config
        .reader
        .clone()
        .unwrap_or_else(|| Arc::new(PdfiumReader))
}

fn ruled_detector_for(config: &ExtractionConfig) -> Arc<dyn RuledTableDetector> {
    config
        .ruled_detector
        .clone()
        .unwrap_or_else(|| Arc::new(PdfiumRuledDetector))
}

fn line_finder_for(config: &ExtractionConfig) -> Arc<dyn LineTableFinder> {
    config
        .line_finder
        .clone()
        .unwrap_or_else(|| Arc::new(PdfiumLineFinder))
}

fn write_temp_pdf(bytes: &[u8]) -> Result<tempfile::NamedTempFile, ExtractError> {
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| ExtractError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| ExtractError::Internal(format!("tempfile write: {e}")))?;
    Ok(tmp)
}

fn summarize(reader: &dyn DocumentReader, pdf_path: &Path) -> Result<DocumentSummary, ExtractError> {
    let pages = reader.page_count(pdf_path)?;
    let sample_text = if pages == 0 {
        String::new()
    } else {
        reader
            .page_text(pdf_path, 1)?
            .chars()
            .take(500)
            .collect()
    };
    Ok(DocumentSummary { pages, sample_text })
}

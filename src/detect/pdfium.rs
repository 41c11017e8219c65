//! Built-in detection collaborators backed by pdfium.
//!
//! ## Why bind per call?
//!
//! pdfium uses thread-local state internally and is not safe to share across
//! async contexts; the `thread_safe` crate feature serializes access behind a
//! mutex either way. Binding inside each call keeps these adapters stateless
//! (`Send + Sync` for free) at the cost of a cheap re-bind, and the callers
//! already run them on `spawn_blocking` threads.
//!
//! ## Detection scope
//!
//! These adapters are intentionally modest. The ruled-line detector reads
//! drawn grid lines from thin path-object bounds and fills the resulting grid
//! with text; the horizontal-line finder bands the page between horizontal
//! rules and splits each band into cells at text gaps, producing the ragged,
//! fragment-ridden matrices the row pipeline exists to repair. One candidate
//! region per page: the reports this service was calibrated on carry one
//! table per page. Anything smarter belongs behind the same traits, not here.

use crate::config::DetectionSettings;
use crate::detect::{
    CandidateTable, DocumentReader, LineTableFinder, RuledTable, RuledTableDetector,
    StrategyReport,
};
use crate::error::{DetectionError, ExtractError};
use crate::output::BBox;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::debug;

/// A drawn rule (or any path object) wider than this in its thin axis is not
/// treated as a table line.
const RULE_THICKNESS: f32 = 2.0;

/// Minimum extent in points for a thin path object to count as a rule rather
/// than a dot or tick mark.
const MIN_RULE_LENGTH: f32 = 8.0;

/// One text segment with its bounds, converted to a top-left origin.
#[derive(Debug, Clone, PartialEq)]
struct TextSpan {
    text: String,
    x0: f32,
    top: f32,
    x1: f32,
    bottom: f32,
}

impl TextSpan {
    fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }
}

/// A thin path object classified as a table rule, top-left origin.
#[derive(Debug, Clone, Copy)]
struct Rule {
    x0: f32,
    top: f32,
    x1: f32,
    bottom: f32,
}

// ── Shared pdfium plumbing ───────────────────────────────────────────────

fn bind_pdfium() -> Result<Pdfium, DetectionError> {
    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| DetectionError::Unavailable {
            detail: format!("pdfium binding failed: {:?}", e),
        })
}

fn open_document<'a>(pdfium: &'a Pdfium, pdf: &Path) -> Result<PdfDocument<'a>, DetectionError> {
    pdfium
        .load_pdf_from_file(pdf, None)
        .map_err(|e| DetectionError::Unavailable {
            detail: format!("failed to open '{}': {:?}", pdf.display(), e),
        })
}

fn get_page<'a>(
    document: &PdfDocument<'a>,
    page: usize,
) -> Result<PdfPage<'a>, DetectionError> {
    document
        .pages()
        .get((page - 1) as u16)
        .map_err(|e| DetectionError::Page {
            page,
            detail: format!("{:?}", e),
        })
}

/// Collect the page's non-empty text segments, flipped to a top-left origin.
fn page_spans(page: &PdfPage, page_num: usize) -> Result<Vec<TextSpan>, DetectionError> {
    let height = page.height().value;
    let text = page.text().map_err(|e| DetectionError::Page {
        page: page_num,
        detail: format!("no text layer: {:?}", e),
    })?;

    let mut spans = Vec::new();
    for segment in text.segments().iter() {
        let content = segment.text();
        if content.trim().is_empty() {
            continue;
        }
        let b = segment.bounds();
        spans.push(TextSpan {
            text: content,
            x0: b.left().value,
            top: height - b.top().value,
            x1: b.right().value,
            bottom: height - b.bottom().value,
        });
    }
    Ok(spans)
}

/// Classify the page's path objects into horizontal and vertical rules.
///
/// Works from bounding boxes only: a stroked line or a hairline-filled rect
/// both come out as a box that is thin in one axis and long in the other.
fn page_rules(page: &PdfPage) -> (Vec<Rule>, Vec<Rule>) {
    let height = page.height().value;
    let mut horizontal = Vec::new();
    let mut vertical = Vec::new();

    for object in page.objects().iter() {
        if object.as_path_object().is_none() {
            continue;
        }
        let Ok(b) = object.bounds() else {
            continue;
        };
        let rule = Rule {
            x0: b.left().value,
            top: height - b.top().value,
            x1: b.right().value,
            bottom: height - b.bottom().value,
        };
        let width = rule.x1 - rule.x0;
        let thickness = rule.bottom - rule.top;
        if thickness <= RULE_THICKNESS && width >= MIN_RULE_LENGTH {
            horizontal.push(rule);
        } else if width <= RULE_THICKNESS && thickness >= MIN_RULE_LENGTH {
            vertical.push(rule);
        }
    }
    (horizontal, vertical)
}

/// Cluster 1-D positions: values within `tolerance` of a cluster's start
/// collapse to the cluster mean. Returns the sorted means.
fn cluster_positions(mut values: Vec<f32>, tolerance: f32) -> Vec<f32> {
    if values.is_empty() {
        return values;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut means = Vec::new();
    let mut start = 0;
    for i in 1..=values.len() {
        if i == values.len() || values[i] - values[start] > tolerance {
            let sum: f32 = values[start..i].iter().sum();
            means.push(sum / (i - start) as f32);
            start = i;
        }
    }
    means
}

/// Split one row band's spans into cells at horizontal gaps wider than
/// `gap_tolerance`; spans closer than that join into one cell.
fn split_row_cells(spans: &mut [TextSpan], gap_tolerance: f32) -> Vec<String> {
    spans.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap());

    let mut cells: Vec<String> = Vec::new();
    let mut last_x1: Option<f32> = None;
    for span in spans.iter() {
        match (last_x1, cells.last_mut()) {
            (Some(prev), Some(cell)) if span.x0 - prev <= gap_tolerance => {
                cell.push(' ');
                cell.push_str(&span.text);
            }
            _ => cells.push(span.text.clone()),
        }
        last_x1 = Some(span.x1.max(last_x1.unwrap_or(f32::MIN)));
    }
    cells
}

// ── Page reader ──────────────────────────────────────────────────────────

/// [`DocumentReader`] over the system pdfium library.
///
/// Reader failures are fatal for the request, so this adapter maps pdfium
/// problems to [`ExtractError`] rather than recording them as strategy
/// failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfiumReader;

fn bind_pdfium_fatal() -> Result<Pdfium, ExtractError> {
    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| ExtractError::PdfiumBindingFailed(format!("{:?}", e)))
}

fn open_document_fatal<'a>(
    pdfium: &'a Pdfium,
    pdf: &Path,
) -> Result<PdfDocument<'a>, ExtractError> {
    pdfium
        .load_pdf_from_file(pdf, None)
        .map_err(|e| ExtractError::CorruptPdf {
            path: pdf.to_path_buf(),
            detail: format!("{:?}", e),
        })
}

impl DocumentReader for PdfiumReader {
    fn page_count(&self, pdf: &Path) -> Result<usize, ExtractError> {
        let pdfium = bind_pdfium_fatal()?;
        let document = open_document_fatal(&pdfium, pdf)?;
        Ok(document.pages().len() as usize)
    }

    fn page_text(&self, pdf: &Path, page: usize) -> Result<String, ExtractError> {
        let pdfium = bind_pdfium_fatal()?;
        let document = open_document_fatal(&pdfium, pdf)?;
        let page_handle = document
            .pages()
            .get((page - 1) as u16)
            .map_err(|_| ExtractError::PageOutOfBounds {
                page,
                total: document.pages().len() as usize,
            })?;
        let text = page_handle.text().map_err(|e| {
            ExtractError::Internal(format!("text extraction failed on page {page}: {:?}", e))
        })?;
        Ok(text.all())
    }
}

// ── Ruled-line detector ──────────────────────────────────────────────────

/// [`RuledTableDetector`] reading drawn grid lines via pdfium.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfiumRuledDetector;

impl RuledTableDetector for PdfiumRuledDetector {
    fn detect(
        &self,
        pdf: &Path,
        pages: &[usize],
    ) -> Result<StrategyReport<RuledTable>, DetectionError> {
        let pdfium = bind_pdfium()?;
        let document = open_document(&pdfium, pdf)?;

        let mut report = StrategyReport::default();
        for &page_num in pages {
            match ruled_tables_on_page(&document, page_num) {
                Ok(mut tables) => report.tables.append(&mut tables),
                Err(e) => report.failures.push(e),
            }
        }
        Ok(report)
    }
}

fn ruled_tables_on_page(
    document: &PdfDocument<'_>,
    page_num: usize,
) -> Result<Vec<RuledTable>, DetectionError> {
    let page = get_page(document, page_num)?;
    let (horizontal, vertical) = page_rules(&page);

    // A lattice needs a real grid: three edges per axis give a 2×2 cell
    // matrix, the smallest thing worth calling a table.
    let row_edges = cluster_positions(
        horizontal.iter().map(|r| (r.top + r.bottom) / 2.0).collect(),
        RULE_THICKNESS,
    );
    let col_edges = cluster_positions(
        vertical.iter().map(|r| (r.x0 + r.x1) / 2.0).collect(),
        RULE_THICKNESS,
    );
    if row_edges.len() < 3 || col_edges.len() < 3 {
        return Ok(Vec::new());
    }

    let rows = row_edges.len() - 1;
    let cols = col_edges.len() - 1;
    let mut matrix = vec![vec![String::new(); cols]; rows];

    let spans = page_spans(&page, page_num)?;
    for span in &spans {
        let cx = span.center_x();
        let cy = span.center_y();
        let Some(col) = grid_index(&col_edges, cx) else {
            continue;
        };
        let Some(row) = grid_index(&row_edges, cy) else {
            continue;
        };
        let cell = &mut matrix[row][col];
        if !cell.is_empty() {
            cell.push(' ');
        }
        cell.push_str(span.text.trim());
    }

    debug!(page = page_num, rows, cols, "ruled grid detected");
    Ok(vec![RuledTable {
        page: page_num,
        rows: matrix,
    }])
}

/// Index of the grid interval containing `value`, if any.
fn grid_index(edges: &[f32], value: f32) -> Option<usize> {
    if edges.len() < 2 {
        return None;
    }
    (0..edges.len() - 1).find(|&i| value >= edges[i] && value < edges[i + 1])
}

// ── Horizontal-line finder ───────────────────────────────────────────────

/// [`LineTableFinder`] banding the page between horizontal rules and
/// splitting bands into cells at text gaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfiumLineFinder;

impl LineTableFinder for PdfiumLineFinder {
    fn find(
        &self,
        pdf: &Path,
        pages: &[usize],
        settings: &DetectionSettings,
    ) -> Result<StrategyReport<CandidateTable>, DetectionError> {
        let pdfium = bind_pdfium()?;
        let document = open_document(&pdfium, pdf)?;

        let mut report = StrategyReport::default();
        for &page_num in pages {
            match candidates_on_page(&document, page_num, settings) {
                Ok(mut tables) => report.tables.append(&mut tables),
                Err(e) => report.failures.push(e),
            }
        }
        Ok(report)
    }
}

fn candidates_on_page(
    document: &PdfDocument<'_>,
    page_num: usize,
    settings: &DetectionSettings,
) -> Result<Vec<CandidateTable>, DetectionError> {
    let page = get_page(document, page_num)?;
    let (horizontal, _vertical) = page_rules(&page);

    let band_edges = cluster_positions(
        horizontal.iter().map(|r| (r.top + r.bottom) / 2.0).collect(),
        settings.snap_tolerance,
    );
    if band_edges.len() < 2 {
        return Ok(Vec::new());
    }

    // Region spanned by the rules, widened by the intersection tolerance so
    // text that starts fractionally outside a rule's extent still counts.
    let region_x0 = horizontal
        .iter()
        .map(|r| r.x0)
        .fold(f32::INFINITY, f32::min)
        - settings.intersection_tolerance;
    let region_x1 = horizontal
        .iter()
        .map(|r| r.x1)
        .fold(f32::NEG_INFINITY, f32::max)
        + settings.intersection_tolerance;

    let spans = page_spans(&page, page_num)?;

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    let mut multi_cell_rows = 0usize;
    for window in band_edges.windows(2) {
        let (band_top, band_bottom) = (window[0], window[1]);
        let mut band_spans: Vec<TextSpan> = spans
            .iter()
            .filter(|s| {
                let cy = s.center_y();
                cy >= band_top
                    && cy < band_bottom
                    && s.center_x() >= region_x0
                    && s.center_x() <= region_x1
            })
            .cloned()
            .collect();

        if band_spans.len() < settings.min_words_horizontal {
            continue;
        }

        let cells = split_row_cells(&mut band_spans, settings.text_tolerance);
        if cells.len() > 1 {
            multi_cell_rows += 1;
        }
        rows.push(cells.into_iter().map(Some).collect());
    }

    if rows.len() < 2 || multi_cell_rows < settings.min_words_vertical {
        return Ok(Vec::new());
    }

    let bbox = BBox {
        x0: region_x0 + settings.intersection_tolerance,
        top: band_edges[0],
        x1: region_x1 - settings.intersection_tolerance,
        bottom: band_edges[band_edges.len() - 1],
    };

    debug!(
        page = page_num,
        rows = rows.len(),
        "horizontal-line candidate found"
    );
    Ok(vec![CandidateTable {
        page: page_num,
        rows,
        bbox,
    }])
}

//! Integration tests for the hybrid extraction flow.
//!
//! These drive the public API end-to-end with fake detector collaborators
//! injected through the config override slots, so the suite runs anywhere —
//! no pdfium library and no sample PDFs required. The fakes return fixed
//! matrices and, where a test needs it, sleep or record whether they were
//! invoked.

use jadwal::detect::{
    CandidateTable, DocumentReader, LineTableFinder, RuledTable, RuledTableDetector,
    StrategyReport,
};
use jadwal::{
    extract_tables_from_bytes, inspect_bytes, BBox, DetectionError, DetectionSettings,
    ExtractError, ExtractionConfig, Origin,
};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Minimal bytes that pass the `%PDF` magic check; the fakes never parse them.
const FAKE_PDF: &[u8] = b"%PDF-1.4\n% synthetic fixture, never parsed\n";

// ── Fake collaborators ───────────────────────────────────────────────────

struct FakeReader {
    pages: usize,
    text: String,
}

impl DocumentReader for FakeReader {
    fn page_count(&self, _pdf: &Path) -> Result<usize, ExtractError> {
        Ok(self.pages)
    }

    fn page_text(&self, _pdf: &Path, _page: usize) -> Result<String, ExtractError> {
        Ok(self.text.clone())
    }
}

struct FakeRuled {
    tables: Vec<RuledTable>,
    failures: Vec<DetectionError>,
    /// Simulated work, to prove ordering is origin-based not completion-based.
    delay: Duration,
    called: Arc<AtomicBool>,
}

impl FakeRuled {
    fn with_tables(tables: Vec<RuledTable>) -> Self {
        Self {
            tables,
            failures: Vec::new(),
            delay: Duration::ZERO,
            called: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl RuledTableDetector for FakeRuled {
    fn detect(
        &self,
        _pdf: &Path,
        _pages: &[usize],
    ) -> Result<StrategyReport<RuledTable>, DetectionError> {
        self.called.store(true, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        Ok(StrategyReport {
            tables: self.tables.clone(),
            failures: self.failures.clone(),
        })
    }
}

/// A ruled detector whose whole strategy errors out.
struct BrokenRuled;

impl RuledTableDetector for BrokenRuled {
    fn detect(
        &self,
        _pdf: &Path,
        _pages: &[usize],
    ) -> Result<StrategyReport<RuledTable>, DetectionError> {
        Err(DetectionError::Unavailable {
            detail: "lattice backend exploded".into(),
        })
    }
}

struct FakeFinder {
    candidates: Vec<CandidateTable>,
    failures: Vec<DetectionError>,
    called: Arc<AtomicBool>,
}

impl FakeFinder {
    fn with_candidates(candidates: Vec<CandidateTable>) -> Self {
        Self {
            candidates,
            failures: Vec::new(),
            called: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl LineTableFinder for FakeFinder {
    fn find(
        &self,
        _pdf: &Path,
        _pages: &[usize],
        _settings: &DetectionSettings,
    ) -> Result<StrategyReport<CandidateTable>, DetectionError> {
        self.called.store(true, Ordering::SeqCst);
        Ok(StrategyReport {
            tables: self.candidates.clone(),
            failures: self.failures.clone(),
        })
    }
}

// ── Fixture helpers ──────────────────────────────────────────────────────

fn ruled(page: usize, label: &str) -> RuledTable {
    RuledTable {
        page,
        rows: vec![
            vec![label.to_string(), "ras".to_string()],
            vec!["x".to_string(), "y".to_string()],
        ],
    }
}

fn candidate(page: usize, rows: &[&[&str]]) -> CandidateTable {
    CandidateTable {
        page,
        rows: rows
            .iter()
            .map(|r| r.iter().map(|c| Some(c.to_string())).collect())
            .collect(),
        bbox: BBox {
            x0: 10.0,
            top: 100.0,
            x1: 400.0,
            bottom: 300.0,
        },
    }
}

fn config_with(
    reader: FakeReader,
    ruled: impl RuledTableDetector + 'static,
    finder: FakeFinder,
) -> ExtractionConfig {
    ExtractionConfig::builder()
        .reader(Arc::new(reader))
        .ruled_detector(Arc::new(ruled))
        .line_finder(Arc::new(finder))
        .build()
        .unwrap()
}

fn ten_page_reader() -> FakeReader {
    FakeReader {
        pages: 10,
        text: "نص تجريبي".repeat(100),
    }
}

// ── End-to-end pipeline behaviour ────────────────────────────────────────

#[tokio::test]
async fn fragmented_numerals_reconstructed_end_to_end() {
    let finder = FakeFinder::with_candidates(vec![candidate(
        1,
        &[
            &["البند", "القيمة", ""],
            &["المجموع", "١٢٣", "٤٥٦"],
        ],
    )]);
    let config = config_with(ten_page_reader(), FakeRuled::with_tables(vec![]), finder);

    let output = extract_tables_from_bytes(FAKE_PDF, &config).await.unwrap();
    assert_eq!(output.tables.len(), 1);

    let table = &output.tables[0];
    assert_eq!(table.origin, Origin::HorizontalLine);
    // Adjacent fragments fused into one cell; the non-numeral neighbour
    // stayed separate; rows were padded to the voted width of 3.
    assert_eq!(table.rows[1][0], "المجموع");
    assert_eq!(table.rows[1][1], "١٢٣٤٥٦");
    assert!(table.rows.iter().all(|r| r.len() == 3));
    // Horizontal-line tables carry their geometry and detection parameters.
    assert!(table.bbox.is_some());
    assert_eq!(table.settings, Some(config.settings));
}

#[tokio::test]
async fn footnote_only_candidate_is_dropped_and_counted() {
    let finder = FakeFinder::with_candidates(vec![candidate(
        2,
        &[
            &["العنوان", "القيمة"],
            &["توزيع الحصص حسب المناطق", ""],
        ],
    )]);
    let config = config_with(ten_page_reader(), FakeRuled::with_tables(vec![]), finder);

    let output = extract_tables_from_bytes(FAKE_PDF, &config).await.unwrap();
    assert!(output.tables.is_empty());
    assert_eq!(output.stats.dropped_tables, 1);
    assert!(output.failures.is_empty(), "a dropped table is not a failure");
}

#[tokio::test]
async fn ruled_tables_pass_through_untouched() {
    // A ruled matrix containing a footnote marker and split-looking numerals
    // must come out exactly as the detector produced it.
    let rows = vec![
        vec!["توزيع".to_string(), "١٢٣".to_string(), "٤٥٦".to_string()],
        vec!["a".to_string(), "b".to_string(), "c".to_string()],
    ];
    let detector = FakeRuled::with_tables(vec![RuledTable { page: 1, rows: rows.clone() }]);
    let config = config_with(
        ten_page_reader(),
        detector,
        FakeFinder::with_candidates(vec![]),
    );

    let output = extract_tables_from_bytes(FAKE_PDF, &config).await.unwrap();
    assert_eq!(output.tables.len(), 1);
    assert_eq!(output.tables[0].rows, rows);
    assert_eq!(output.tables[0].origin, Origin::RuledLine);
    assert!(output.tables[0].bbox.is_none());
    assert!(output.tables[0].settings.is_none());
}

// ── Hybrid merge ordering ────────────────────────────────────────────────

#[tokio::test]
async fn merge_order_is_origin_not_completion() {
    // The ruled detector finishes last by a wide margin; its tables must
    // still come first.
    let detector = FakeRuled {
        tables: vec![ruled(1, "A"), ruled(2, "B")],
        failures: Vec::new(),
        delay: Duration::from_millis(200),
        called: Arc::new(AtomicBool::new(false)),
    };
    let finder = FakeFinder::with_candidates(vec![
        candidate(1, &[&["C", "c"], &["c1", "c2"]]),
        candidate(2, &[&["D", "d"], &["d1", "d2"]]),
    ]);
    let config = config_with(ten_page_reader(), detector, finder);

    let output = extract_tables_from_bytes(FAKE_PDF, &config).await.unwrap();
    let labels: Vec<&str> = output
        .tables
        .iter()
        .map(|t| t.rows[0][0].as_str())
        .collect();
    assert_eq!(labels, vec!["A", "B", "C", "D"]);

    let origins: Vec<Origin> = output.tables.iter().map(|t| t.origin).collect();
    assert_eq!(
        origins,
        vec![
            Origin::RuledLine,
            Origin::RuledLine,
            Origin::HorizontalLine,
            Origin::HorizontalLine
        ]
    );
}

#[tokio::test]
async fn overlapping_detections_are_not_deduplicated() {
    // Both strategies find "the same" table on page 3; both entries survive.
    let detector = FakeRuled::with_tables(vec![ruled(3, "dup")]);
    let finder =
        FakeFinder::with_candidates(vec![candidate(3, &[&["dup", "x"], &["1", "2"]])]);
    let config = config_with(ten_page_reader(), detector, finder);

    let output = extract_tables_from_bytes(FAKE_PDF, &config).await.unwrap();
    assert_eq!(output.tables.len(), 2);
    assert_eq!(output.tables[0].page, 3);
    assert_eq!(output.tables[1].page, 3);
}

// ── Failure isolation ────────────────────────────────────────────────────

#[tokio::test]
async fn broken_ruled_strategy_does_not_poison_horizontal() {
    let finder = FakeFinder::with_candidates(vec![candidate(
        1,
        &[&["h", "v"], &["x", "y"]],
    )]);
    let config = config_with(ten_page_reader(), BrokenRuled, finder);

    let output = extract_tables_from_bytes(FAKE_PDF, &config).await.unwrap();
    assert_eq!(output.tables.len(), 1);
    assert_eq!(output.tables[0].origin, Origin::HorizontalLine);

    assert_eq!(output.failures.len(), 1);
    let failure = &output.failures[0];
    assert_eq!(failure.origin, Origin::RuledLine);
    assert_eq!(failure.page, None);
    assert!(failure.detail.contains("lattice backend exploded"));
}

#[tokio::test]
async fn per_page_failure_is_recorded_alongside_results() {
    let finder = FakeFinder {
        candidates: vec![candidate(1, &[&["ok", "table"], &["1", "2"]])],
        failures: vec![DetectionError::Page {
            page: 4,
            detail: "glyphs without widths".into(),
        }],
        called: Arc::new(AtomicBool::new(false)),
    };
    let config = config_with(ten_page_reader(), FakeRuled::with_tables(vec![]), finder);

    let output = extract_tables_from_bytes(FAKE_PDF, &config).await.unwrap();
    assert_eq!(output.tables.len(), 1);
    assert_eq!(output.failures.len(), 1);
    assert_eq!(output.failures[0].page, Some(4));
    assert_eq!(output.failures[0].origin, Origin::HorizontalLine);
}

// ── Selector validation happens before any detection ─────────────────────

#[tokio::test]
async fn invalid_selector_fails_before_detectors_run() {
    let detector = FakeRuled::with_tables(vec![]);
    let finder = FakeFinder::with_candidates(vec![]);
    let ruled_called = Arc::clone(&detector.called);
    let finder_called = Arc::clone(&finder.called);

    let mut config = config_with(ten_page_reader(), detector, finder);
    config.pages = "2,banana".into();

    let err = extract_tables_from_bytes(FAKE_PDF, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::InvalidPageSelector { .. }));
    assert!(!ruled_called.load(Ordering::SeqCst));
    assert!(!finder_called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn out_of_bounds_page_fails_fast() {
    let detector = FakeRuled::with_tables(vec![]);
    let ruled_called = Arc::clone(&detector.called);

    let mut config = config_with(
        FakeReader {
            pages: 3,
            text: String::new(),
        },
        detector,
        FakeFinder::with_candidates(vec![]),
    );
    config.pages = "2-5".into();

    let err = extract_tables_from_bytes(FAKE_PDF, &config)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ExtractError::PageOutOfBounds { page: 4, total: 3 }
    ));
    assert!(!ruled_called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn reversed_range_rejected() {
    let mut config = config_with(
        ten_page_reader(),
        FakeRuled::with_tables(vec![]),
        FakeFinder::with_candidates(vec![]),
    );
    config.pages = "3-1".into();

    let err = extract_tables_from_bytes(FAKE_PDF, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::InvalidRange { start: 3, end: 1 }));
}

// ── Input validation and inspection ──────────────────────────────────────

#[tokio::test]
async fn non_pdf_bytes_rejected() {
    let config = config_with(
        ten_page_reader(),
        FakeRuled::with_tables(vec![]),
        FakeFinder::with_candidates(vec![]),
    );
    let err = extract_tables_from_bytes(b"PK\x03\x04zipfile", &config)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::NotAPdf { .. }));
}

#[tokio::test]
async fn inspect_reports_pages_and_truncated_sample() {
    let config = config_with(
        FakeReader {
            pages: 7,
            text: "م".repeat(2000),
        },
        FakeRuled::with_tables(vec![]),
        FakeFinder::with_candidates(vec![]),
    );

    let summary = inspect_bytes(FAKE_PDF, &config).await.unwrap();
    assert_eq!(summary.pages, 7);
    assert_eq!(summary.sample_text.chars().count(), 500);
}

// ── Stats and wire format ────────────────────────────────────────────────

#[tokio::test]
async fn stats_account_for_both_strategies() {
    let detector = FakeRuled::with_tables(vec![ruled(1, "A")]);
    let finder = FakeFinder::with_candidates(vec![
        candidate(1, &[&["B", "b"], &["1", "2"]]),
        // Below the two-row minimum once its footnote row is stripped.
        candidate(2, &[&["رأس", "x"], &["توجد فروقات", ""]]),
    ]);
    let mut config = config_with(ten_page_reader(), detector, finder);
    config.pages = "1-2".into();

    let output = extract_tables_from_bytes(FAKE_PDF, &config).await.unwrap();
    assert_eq!(output.stats.total_pages, 10);
    assert_eq!(output.stats.pages_scanned, 2);
    assert_eq!(output.stats.ruled_tables, 1);
    assert_eq!(output.stats.horizontal_tables, 1);
    assert_eq!(output.stats.dropped_tables, 1);
}

#[tokio::test]
async fn output_serializes_with_wire_names() {
    let detector = FakeRuled::with_tables(vec![ruled(5, "A")]);
    let finder = FakeFinder::with_candidates(vec![candidate(5, &[&["B", "b"], &["1", "2"]])]);
    let config = config_with(ten_page_reader(), detector, finder);

    let output = extract_tables_from_bytes(FAKE_PDF, &config).await.unwrap();
    let json = serde_json::to_value(&output).unwrap();

    assert_eq!(json["tables"][0]["type"], "ruled_line");
    assert_eq!(json["tables"][0]["page"], 5);
    assert!(json["tables"][0].get("bbox").is_none());
    assert_eq!(json["tables"][1]["type"], "horizontal_lines");
    assert_eq!(json["tables"][1]["settings"]["snap_tolerance"], 5.0);
    assert_eq!(json["tables"][1]["bbox"]["x0"], 10.0);
}

//! Cell normalization: collapse raw extractor output to canonical form.
//!
//! Raw cells arrive with embedded newlines (multi-line cells are split on
//! detected rules), padding whitespace, and occasional `None` values where a
//! cell region contained no text. Normalization is a total function — any
//! input, including empty and `None`, yields a well-formed cell — so later
//! stages never see a newline or a doubled space.

/// Normalize one raw cell: newlines become spaces, leading/trailing
/// whitespace is trimmed, and internal whitespace runs collapse to exactly
/// one space.
///
/// Idempotent: `normalize_cell(normalize_cell(s)) == normalize_cell(s)`.
pub fn normalize_cell(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize an optional raw cell; `None` is "no value" and yields `""`.
pub fn normalize_opt_cell(raw: Option<&str>) -> String {
    raw.map(normalize_cell).unwrap_or_default()
}

/// Normalize every cell of a raw row.
pub fn normalize_row(row: &[Option<String>]) -> Vec<String> {
    row.iter()
        .map(|cell| normalize_opt_cell(cell.as_deref()))
        .collect()
}

/// True if every cell in the row is empty after normalization.
pub fn is_empty_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.is_empty())
}

//! Numeral reconstruction: re-fuse numbers split across adjacent cells.
//!
//! The horizontal-line finder splits rows along derived column edges, and a
//! multi-digit Eastern Arabic value frequently straddles one of those edges —
//! `١٢٣٬٤٥٦` comes back as the two cells `١٢٣٬` and `٤٥٦`. This stage
//! re-concatenates such runs.
//!
//! The repair must stay conservative: merging a numeral with an unrelated
//! neighbour would silently corrupt the table, which is worse than leaving a
//! fragment unrepaired. So only *adjacent* cells that are *entirely* numeral
//! content fuse; any other character disqualifies a cell, and a non-fragment
//! cell between two fragments keeps them apart.

use once_cell::sync::Lazy;
use regex::Regex;

/// Eastern Arabic digits `٠`–`٩` (U+0660–U+0669) and the Arabic thousands
/// separator `٬` (U+066C), nothing else, at least one character.
///
/// Hardcoded for the numeral script of the reports this service processes.
static NUMERAL_FRAGMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[٠-٩٬]+$").unwrap());

/// True if the cell, after trimming, is entirely a numeral fragment.
///
/// A cell containing any non-numeral character is not a fragment, even if it
/// also contains digits; empty cells are not fragments.
pub fn is_numeral_fragment(cell: &str) -> bool {
    NUMERAL_FRAGMENT_RE.is_match(cell.trim())
}

/// Rebuild fragmented numerals in a row without merging unrelated columns.
///
/// Scans left to right with an accumulation buffer: consecutive fragment
/// cells concatenate into the buffer; the buffer flushes as a single output
/// cell the moment a non-fragment cell appears, and again at row end. The
/// output is never longer than the input.
pub fn reconstruct_numerals(row: Vec<String>) -> Vec<String> {
    let mut rebuilt = Vec::with_capacity(row.len());
    let mut buffer = String::new();

    for cell in row {
        if is_numeral_fragment(&cell) {
            buffer.push_str(cell.trim());
        } else {
            if !buffer.is_empty() {
                rebuilt.push(std::mem::take(&mut buffer));
            }
            rebuilt.push(cell);
        }
    }

    if !buffer.is_empty() {
        rebuilt.push(buffer);
    }

    rebuilt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn classifies_fragments() {
        assert!(is_numeral_fragment("١٢٣"));
        assert!(is_numeral_fragment("٬٤٥٦"));
        assert!(is_numeral_fragment(" ٧ "));
    }

    #[test]
    fn rejects_non_fragments() {
        assert!(!is_numeral_fragment(""));
        assert!(!is_numeral_fragment("   "));
        assert!(!is_numeral_fragment("المجموع"));
        // Mixed content is not a fragment even though it contains digits.
        assert!(!is_numeral_fragment("١٢٣x"));
        assert!(!is_numeral_fragment("١٢ ٣٤"));
        // Western digits are a different script.
        assert!(!is_numeral_fragment("123"));
    }

    #[test]
    fn adjacent_fragments_fuse() {
        assert_eq!(
            reconstruct_numerals(row(&["١٢٣", "٤٥٦", "المجموع"])),
            row(&["١٢٣٤٥٦", "المجموع"])
        );
    }

    #[test]
    fn thousands_separator_fuses() {
        assert_eq!(
            reconstruct_numerals(row(&["١٢٣٬", "٤٥٦"])),
            row(&["١٢٣٬٤٥٦"])
        );
    }

    #[test]
    fn non_fragment_keeps_runs_apart() {
        assert_eq!(
            reconstruct_numerals(row(&["١٢", "البند", "٣٤"])),
            row(&["١٢", "البند", "٣٤"])
        );
    }

    #[test]
    fn trailing_run_flushes_at_row_end() {
        assert_eq!(
            reconstruct_numerals(row(&["البند", "١٢", "٣٤"])),
            row(&["البند", "١٢٣٤"])
        );
    }

    #[test]
    fn empty_cells_pass_through() {
        // An empty cell is not a fragment: it flushes the buffer and is
        // emitted as-is, preserving column positions.
        assert_eq!(
            reconstruct_numerals(row(&["١٢", "", "٣٤"])),
            row(&["١٢", "", "٣٤"])
        );
    }

    #[test]
    fn never_grows_the_row() {
        let cases: Vec<Vec<String>> = vec![
            row(&[]),
            row(&["١", "٢", "٣"]),
            row(&["a", "b"]),
            row(&["١٢", "x", "٣٤", "٥٦"]),
            row(&["", "", ""]),
        ];
        for case in cases {
            let len = case.len();
            assert!(reconstruct_numerals(case).len() <= len);
        }
    }

    #[test]
    fn all_fragment_row_collapses_to_one_cell() {
        assert_eq!(reconstruct_numerals(row(&["١", "٢", "٣"])), row(&["١٢٣"]));
    }
}

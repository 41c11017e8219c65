//! Column shape enforcement: majority-vote the table's true width.
//!
//! After numeral reconstruction, row lengths disagree — a row whose number
//! was split into fragments came back shorter, a row with spurious cells
//! longer. The table's "true" column count is taken to be the most frequent
//! row length, and every row is padded or truncated to it.
//!
//! This is a lossy repair by design: a genuinely ragged table loses data at
//! truncated rows. The heuristic lives behind this module's two functions so
//! a more principled column-alignment algorithm can replace it without
//! touching the rest of the pipeline.

/// The most frequent row length; ties go to the length whose first
/// occurrence comes earliest. `None` for an empty table.
pub fn dominant_width(rows: &[Vec<String>]) -> Option<usize> {
    // (length, count) in order of first appearance, so the tie-break is a
    // stable first-seen vote rather than whatever the hash order gives.
    let mut counts: Vec<(usize, usize)> = Vec::new();
    for row in rows {
        match counts.iter_mut().find(|(len, _)| *len == row.len()) {
            Some((_, count)) => *count += 1,
            None => counts.push((row.len(), 1)),
        }
    }

    let mut best: Option<(usize, usize)> = None;
    for &(len, count) in &counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((len, count));
        }
    }
    best.map(|(len, _)| len)
}

/// Pad every shorter row with empty cells and truncate every longer row so
/// all rows have exactly `width` columns.
pub fn enforce_width(rows: Vec<Vec<String>>, width: usize) -> Vec<Vec<String>> {
    rows.into_iter()
        .map(|mut row| {
            row.resize(width, String::new());
            row
        })
        .collect()
}

//! Footnote filtering: drop disclaimer rows masquerading as data.
//!
//! The reports this service processes repeat a handful of document-wide
//! disclaimer sentences below many tables, and the finder picks them up as
//! table rows. A row is classified as a footnote if its cells, joined with
//! single spaces, contain any configured marker phrase as a substring.
//!
//! Substring containment is deliberate: the sentences vary in wording around
//! a stable core, so a full-row match would miss most of them. The cost is
//! an occasional false positive when ordinary data happens to contain a
//! marker — an accepted trade against leaking disclaimers into every table.

/// True if the row contains any marker phrase.
pub fn is_footnote_row(row: &[String], markers: &[String]) -> bool {
    let text = row.join(" ");
    markers.iter().any(|marker| text.contains(marker.as_str()))
}

/// Remove footnote rows, preserving the order of the rest.
pub fn strip_footnotes(rows: Vec<Vec<String>>, markers: &[String]) -> Vec<Vec<String>> {
    rows.into_iter()
        .filter(|row| !is_footnote_row(row, markers))
        .collect()
}

//! Page range resolution: turn a selector expression into page numbers.
//!
//! The selector grammar is deliberately small: the sentinel `"all"` (the
//! alias `"1-end"` is kept for callers of the service this crate replaces),
//! or a comma-separated list of 1-based page numbers and inclusive
//! `start-end` ranges. Expansion preserves the left-to-right order of the
//! parts and performs no deduplication — `"2,1-3"` resolves to `[2, 1, 2, 3]`
//! and a page that appears twice is extracted twice. That quirk is part of
//! the contract, not corrected here.
//!
//! Bounds are validated here, before any detection work runs: a selector
//! naming a page outside the document fails the whole request immediately
//! rather than after some pages have already been processed.

use crate::error::ExtractError;

/// Sentinel selecting every page in the document.
pub const ALL_PAGES: &str = "all";

/// Legacy spelling of [`ALL_PAGES`] accepted for compatibility.
const ALL_PAGES_LEGACY: &str = "1-end";

/// Resolve a selector expression against a document of `total_pages` pages.
///
/// # Errors
/// * [`ExtractError::InvalidPageSelector`] — a token is neither an integer
///   nor a well-formed range.
/// * [`ExtractError::InvalidRange`] — a range with `start > end`.
/// * [`ExtractError::PageOutOfBounds`] — a resolved page is 0 or exceeds
///   `total_pages`.
pub fn resolve_pages(selector: &str, total_pages: usize) -> Result<Vec<usize>, ExtractError> {
    let selector = selector.trim();

    if selector.eq_ignore_ascii_case(ALL_PAGES) || selector == ALL_PAGES_LEGACY {
        return Ok((1..=total_pages).collect());
    }

    let mut pages = Vec::new();
    for part in selector.split(',') {
        let part = part.trim();
        match part.split_once('-') {
            Some((start, end)) => {
                let start = parse_page(start, part)?;
                let end = parse_page(end, part)?;
                if start > end {
                    return Err(ExtractError::InvalidRange { start, end });
                }
                pages.extend(start..=end);
            }
            None => pages.push(parse_page(part, part)?),
        }
    }

    for &page in &pages {
        if page == 0 || page > total_pages {
            return Err(ExtractError::PageOutOfBounds {
                page,
                total: total_pages,
            });
        }
    }

    Ok(pages)
}

fn parse_page(text: &str, token: &str) -> Result<usize, ExtractError> {
    text.trim()
        .parse::<usize>()
        .map_err(|_| ExtractError::InvalidPageSelector {
            token: token.to_string(),
        })
}

//! Outline inference: title detection and heading extraction from
//! font-size heuristics.
//!
//! No semantic markup is available in the source documents; structure is
//! recovered from low-level layout primitives and filtered against a
//! boilerplate denylist.

mod classify;
mod grouper;
mod noise;

pub use classify::FontLevelMap;
pub use grouper::{GroupedLine, LineGrouper};
pub use noise::{collapse_whitespace, has_letter, is_noise};

use std::collections::HashSet;

use log::debug;

use crate::error::Result;
use crate::model::{Outline, OutlineEntry};
use crate::parser::{LayoutLine, PageSource};

use classify::size_key;

/// Options for outline inference.
#[derive(Debug, Clone)]
pub struct OutlineOptions {
    /// Maximum heading text length in characters; longer lines are dropped
    pub max_heading_len: usize,
}

impl OutlineOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum heading length.
    pub fn with_max_heading_len(mut self, len: usize) -> Self {
        self.max_heading_len = len;
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            max_heading_len: 140,
        }
    }
}

/// Infer an outline from per-page layout lines.
///
/// Pages must be supplied in page order; indices are 0-based.
pub fn infer_outline(pages: &[Vec<LayoutLine>], options: &OutlineOptions) -> Outline {
    let mut grouper = LineGrouper::new();
    for (page, layout) in pages.iter().enumerate() {
        grouper.add_page(page, layout);
    }
    let (sizes, lines) = grouper.finish();

    let font_map = FontLevelMap::from_sizes(&sizes);
    let max_size = sizes
        .iter()
        .copied()
        .fold(None::<f32>, |acc, s| match acc {
            Some(m) if m >= s => Some(m),
            _ => Some(s),
        });

    let title = match max_size {
        Some(max) => detect_title(&lines, max),
        None => String::new(),
    };
    let outline = build_outline(&lines, &font_map, options);
    debug!(
        "outline inference: {} grouped lines, {} heading entries",
        lines.len(),
        outline.len()
    );

    Outline { title, outline }
}

/// Infer an outline directly from a page source.
pub fn outline_from_source<S: PageSource + ?Sized>(
    source: &S,
    options: &OutlineOptions,
) -> Result<Outline> {
    let mut pages = Vec::with_capacity(source.page_count());
    for i in 0..source.page_count() {
        pages.push(source.page_layout(i)?);
    }
    Ok(infer_outline(&pages, options))
}

/// Collect every page-one line at the maximum font size, filtered through
/// the noise filter, joined with a double space.
///
/// Returns an empty string when no qualifying line exists. Title detection
/// is independent of heading classification; the max size will also map to
/// H1 wherever it appears in the outline.
pub fn detect_title(lines: &[GroupedLine], max_size: f32) -> String {
    let max_key = size_key(max_size);
    let parts: Vec<&str> = lines
        .iter()
        .filter(|l| l.page == 0 && size_key(l.size) == max_key)
        .map(|l| l.text.trim())
        .filter(|t| has_letter(t) && !is_noise(t))
        .collect();
    parts.join("  ")
}

/// Build the ordered heading list.
///
/// Every filter is a hard one: a line is dropped if it lacks a letter,
/// matches the noise denylist, has no classifier entry for its size, or
/// exceeds the length cap. `(text, page)` duplicates keep the first
/// occurrence; the same heading on a different page is a distinct entry.
pub fn build_outline(
    lines: &[GroupedLine],
    font_map: &FontLevelMap,
    options: &OutlineOptions,
) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    let mut seen: HashSet<(String, usize)> = HashSet::new();

    for line in lines {
        let text = line.text.trim();
        if !has_letter(text) || is_noise(text) {
            continue;
        }

        let Some(level) = font_map.level_for(line.size) else {
            continue;
        };

        if text.chars().count() > options.max_heading_len {
            continue;
        }

        let key = (text.to_string(), line.page);
        if !seen.insert(key) {
            continue;
        }

        entries.push(OutlineEntry::new(
            level,
            collapse_whitespace(text),
            line.page as u32 + 1,
        ));
    }

    // Stable lexical tiebreak within a page, not reading order
    entries.sort_by(|a, b| a.page.cmp(&b.page).then_with(|| a.text.cmp(&b.text)));
    entries
}

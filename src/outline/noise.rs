//! Boilerplate line suppression.
//!
//! Headers, footers and standards boilerplate are the dominant source of
//! false-positive headings; a small denylist is sufficient here versus a
//! layout-based repeated-header detector.

use once_cell::sync::Lazy;
use regex::Regex;

static NOISE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(copyright|©|page \d+ of \d+|version\s*\d|istqb|all rights reserved)")
        .expect("noise pattern is valid")
});

/// Check whether a line matches the boilerplate denylist.
pub fn is_noise(text: &str) -> bool {
    NOISE_RE.is_match(text)
}

/// Check whether the text contains at least one alphabetic character.
pub fn has_letter(text: &str) -> bool {
    text.chars().any(|c| c.is_alphabetic())
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

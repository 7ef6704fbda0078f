//! Page access abstraction.
//!
//! Provides a trait-based interface for PDF page access, isolating the
//! concrete PDF library (lopdf) from outline inference and indexing. Tests
//! and embedders can supply their own implementation.

use crate::error::Result;

/// A text span with font size and position, as laid out on a page.
#[derive(Debug, Clone)]
pub struct LayoutSpan {
    /// The text content
    pub text: String,

    /// Font size in points
    pub font_size: f32,

    /// Bounding box (x0, y0, x1, y1)
    pub bbox: [f32; 4],
}

impl LayoutSpan {
    /// Create a new span.
    pub fn new(text: impl Into<String>, font_size: f32, bbox: [f32; 4]) -> Self {
        Self {
            text: text.into(),
            font_size,
            bbox,
        }
    }
}

/// A visual line: spans sharing a baseline, ordered left to right.
#[derive(Debug, Clone, Default)]
pub struct LayoutLine {
    /// The spans in this line
    pub spans: Vec<LayoutSpan>,
}

impl LayoutLine {
    /// Create a line from spans.
    pub fn new(spans: Vec<LayoutSpan>) -> Self {
        Self { spans }
    }
}

/// Abstract interface for per-page PDF content.
///
/// Implementations must be usable from multiple threads: ingest fans page
/// extraction out across a thread pool.
pub trait PageSource: Sync {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Plain text of a page (0-indexed).
    ///
    /// A page that yields no extractable text returns an empty string;
    /// that is not an error.
    fn page_text(&self, index: usize) -> Result<String>;

    /// Structured layout of a page (0-indexed): lines of spans with font
    /// size and bounding box, for outline inference.
    fn page_layout(&self, index: usize) -> Result<Vec<LayoutLine>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_new() {
        let span = LayoutSpan::new("Title", 24.0, [72.0, 700.0, 200.0, 724.0]);
        assert_eq!(span.text, "Title");
        assert_eq!(span.font_size, 24.0);
        assert_eq!(span.bbox[1], 700.0);
    }
}

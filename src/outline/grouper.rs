//! Line grouping: merge layout spans into logical lines and accumulate
//! the document-wide font-size histogram.

use std::collections::HashMap;

use crate::outline::classify::round_size;
use crate::outline::noise::collapse_whitespace;
use crate::parser::LayoutLine;

/// A merged logical line with its rounded font size.
#[derive(Debug, Clone)]
pub struct GroupedLine {
    /// Merged, whitespace-collapsed text
    pub text: String,

    /// Font size of the first contributing span, rounded to one decimal
    pub size: f32,

    /// Source page (0-indexed)
    pub page: usize,

    /// Bounding box of the first contributing span; position bookkeeping only
    pub bbox: [f32; 4],
}

/// Accumulates grouped lines and font sizes across pages.
///
/// Layout lines sharing the same rounded font size and vertical position on
/// a page are merged into one logical line, texts concatenated in encounter
/// order. The merged line keeps the first line's font size and bbox.
#[derive(Debug, Default)]
pub struct LineGrouper {
    font_sizes: Vec<f32>,
    lines: Vec<GroupedLine>,
}

impl LineGrouper {
    /// Create an empty grouper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one page of layout lines. A page with no extractable spans
    /// contributes nothing; that is not an error.
    pub fn add_page(&mut self, page: usize, layout: &[LayoutLine]) {
        // Buckets keyed by (size, y) in tenths, in encounter order
        let mut order: Vec<(i32, i32)> = Vec::new();
        let mut buckets: HashMap<(i32, i32), GroupedBucket> = HashMap::new();

        for line in layout {
            let Some(first) = line.spans.first() else {
                continue;
            };

            let text = collapse_whitespace(
                &line
                    .spans
                    .iter()
                    .map(|s| s.text.trim())
                    .collect::<Vec<_>>()
                    .join(" "),
            );
            if text.is_empty() {
                continue;
            }

            let size = round_size(first.font_size);
            let key = (tenths(size), tenths(first.bbox[1]));
            self.font_sizes.push(size);

            match buckets.get_mut(&key) {
                Some(bucket) => bucket.texts.push(text),
                None => {
                    order.push(key);
                    buckets.insert(
                        key,
                        GroupedBucket {
                            texts: vec![text],
                            size,
                            bbox: first.bbox,
                        },
                    );
                }
            }
        }

        for key in order {
            let bucket = &buckets[&key];
            let merged = collapse_whitespace(&bucket.texts.join(" "));
            if !merged.is_empty() {
                self.lines.push(GroupedLine {
                    text: merged,
                    size: bucket.size,
                    page,
                    bbox: bucket.bbox,
                });
            }
        }
    }

    /// Consume the grouper, yielding the font-size histogram and the
    /// grouped lines in page order.
    pub fn finish(self) -> (Vec<f32>, Vec<GroupedLine>) {
        (self.font_sizes, self.lines)
    }
}

#[derive(Debug)]
struct GroupedBucket {
    texts: Vec<String>,
    size: f32,
    bbox: [f32; 4],
}

fn tenths(value: f32) -> i32 {
    (value * 10.0).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LayoutSpan;

    fn line(text: &str, size: f32, y: f32) -> LayoutLine {
        LayoutLine::new(vec![LayoutSpan::new(text, size, [72.0, y, 200.0, y + size])])
    }

    #[test]
    fn test_merges_same_size_and_y() {
        let mut grouper = LineGrouper::new();
        grouper.add_page(0, &[line("Hello", 12.0, 700.0), line("World", 12.0, 700.0)]);
        let (sizes, lines) = grouper.finish();

        assert_eq!(sizes, vec![12.0, 12.0]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Hello World");
        assert_eq!(lines[0].size, 12.0);
    }

    #[test]
    fn test_different_size_not_merged() {
        let mut grouper = LineGrouper::new();
        grouper.add_page(0, &[line("Big", 24.0, 700.0), line("Small", 12.0, 700.0)]);
        let (_, lines) = grouper.finish();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Big");
        assert_eq!(lines[1].text, "Small");
    }

    #[test]
    fn test_merged_line_keeps_first_span_size() {
        // Two spans within one layout line; size comes from the first
        let composite = LayoutLine::new(vec![
            LayoutSpan::new("Intro", 14.0, [72.0, 700.0, 120.0, 714.0]),
            LayoutSpan::new("duction", 13.5, [120.0, 700.0, 180.0, 714.0]),
        ]);
        let mut grouper = LineGrouper::new();
        grouper.add_page(0, &[composite]);
        let (sizes, lines) = grouper.finish();

        assert_eq!(sizes, vec![14.0]);
        assert_eq!(lines[0].text, "Intro duction");
        assert_eq!(lines[0].size, 14.0);
    }

    #[test]
    fn test_whitespace_only_line_skipped() {
        let mut grouper = LineGrouper::new();
        grouper.add_page(0, &[line("   ", 12.0, 700.0), line("Real", 12.0, 650.0)]);
        let (sizes, lines) = grouper.finish();

        assert_eq!(sizes.len(), 1);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Real");
    }

    #[test]
    fn test_empty_page_contributes_nothing() {
        let mut grouper = LineGrouper::new();
        grouper.add_page(0, &[]);
        grouper.add_page(1, &[line("Heading", 18.0, 700.0)]);
        let (sizes, lines) = grouper.finish();

        assert_eq!(sizes.len(), 1);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].page, 1);
    }

    #[test]
    fn test_rounding_to_one_decimal() {
        let mut grouper = LineGrouper::new();
        grouper.add_page(0, &[line("A", 11.96, 700.0), line("B", 12.04, 700.0)]);
        let (sizes, lines) = grouper.finish();

        // Both round to 12.0 and share the y bucket
        assert_eq!(sizes, vec![12.0, 12.0]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "A B");
    }
}

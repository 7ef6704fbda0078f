//! Paragraph segmentation: split raw page text into indexable chunks.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Paragraph;

/// A run of two or more consecutive line breaks separates paragraphs.
static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{2,}").expect("paragraph break pattern is valid"));

/// Split per-page raw text into paragraphs.
///
/// Chunks are trimmed, empty chunks discarded, and ids assigned 0-based,
/// strictly increasing across all pages in page order. Paragraph pages are
/// 1-indexed.
pub fn segment_pages(pages_text: &[String], doc_id: &str) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();
    let mut next_id = 0usize;

    for (page_index, text) in pages_text.iter().enumerate() {
        for chunk in PARAGRAPH_BREAK.split(text) {
            let trimmed = chunk.trim();
            if trimmed.is_empty() {
                continue;
            }
            paragraphs.push(Paragraph::new(
                next_id,
                trimmed,
                page_index as u32 + 1,
                doc_id,
            ));
            next_id += 1;
        }
    }

    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_blank_lines() {
        let pages = vec!["First paragraph.\n\nSecond paragraph.".to_string()];
        let paragraphs = segment_pages(&pages, "doc");

        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].text, "First paragraph.");
        assert_eq!(paragraphs[1].text, "Second paragraph.");
    }

    #[test]
    fn test_three_newlines_single_separator() {
        let pages = vec!["a\n\n\nb".to_string()];
        let paragraphs = segment_pages(&pages, "doc");

        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].text, "a");
        assert_eq!(paragraphs[1].text, "b");
    }

    #[test]
    fn test_single_newline_not_a_separator() {
        let pages = vec!["line one\nline two".to_string()];
        let paragraphs = segment_pages(&pages, "doc");

        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].text, "line one\nline two");
    }

    #[test]
    fn test_ids_monotonic_across_pages() {
        let pages = vec![
            "a\n\nb".to_string(),
            String::new(),
            "c\n\nd\n\ne".to_string(),
        ];
        let paragraphs = segment_pages(&pages, "doc");

        let ids: Vec<usize> = paragraphs.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);

        assert_eq!(paragraphs[0].meta.page, 1);
        assert_eq!(paragraphs[2].meta.page, 3);
        assert!(paragraphs.iter().all(|p| p.meta.doc_id == "doc"));
    }

    #[test]
    fn test_empty_and_whitespace_chunks_discarded() {
        let pages = vec!["  \n\n\t\n\nreal text\n\n  ".to_string()];
        let paragraphs = segment_pages(&pages, "doc");

        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].text, "real text");
    }

    #[test]
    fn test_no_pages() {
        assert!(segment_pages(&[], "doc").is_empty());
    }
}

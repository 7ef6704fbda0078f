//! Paragraph types: the atomic unit indexed for search.

use serde::{Deserialize, Serialize};

/// Source location of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphMeta {
    /// Page number (1-indexed)
    pub page: u32,

    /// Owning document id
    pub doc_id: String,
}

/// A contiguous blank-line-delimited chunk of page text.
///
/// Ids are assigned once at ingest time, 0-based and strictly increasing
/// across all pages of a document in page order. Immutable afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    /// Document-wide paragraph id (0-based)
    pub id: usize,

    /// Trimmed paragraph text
    pub text: String,

    /// Source location
    pub meta: ParagraphMeta,
}

impl Paragraph {
    /// Create a new paragraph.
    pub fn new(id: usize, text: impl Into<String>, page: u32, doc_id: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            meta: ParagraphMeta {
                page,
                doc_id: doc_id.into(),
            },
        }
    }

    /// Check if the paragraph has no visible text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_new() {
        let p = Paragraph::new(0, "Hello world", 3, "doc-1");
        assert_eq!(p.id, 0);
        assert_eq!(p.meta.page, 3);
        assert_eq!(p.meta.doc_id, "doc-1");
        assert!(!p.is_empty());
    }
}

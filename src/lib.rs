//! # pdflens
//!
//! PDF outline inference and in-memory lexical search.
//!
//! pdflens recovers a logical document structure (title plus H1-H3
//! headings) from low-level page layout using font-size heuristics, builds
//! a per-document TF-IDF index over blank-line-delimited paragraphs, and
//! answers similarity queries against it — including ranked cross-document
//! search over everything held in the process-wide registry.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdflens::Engine;
//!
//! fn main() -> pdflens::Result<()> {
//!     let engine = Engine::new();
//!
//!     let outcome = engine.ingest_file("report-2023", "report.pdf")?;
//!     println!("{} ({} pages)", outcome.title, outcome.page_count);
//!
//!     for hit in engine.search("report-2023", "revenue growth", 5)? {
//!         println!("p{} [{:.3}] {}", hit.meta.page, hit.score, hit.text);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Design
//!
//! - **Outline inference**: layout spans are merged into logical lines,
//!   the three largest distinct font sizes map to H1-H3, and a boilerplate
//!   denylist suppresses copyright/pagination noise.
//! - **Lexical search**: unigram TF-IDF with English stopwords; cosine
//!   similarity over L2-normalized sparse vectors.
//! - **Registry**: memory-resident per session, one atomic publish per
//!   ingest; no persistence across restarts.

pub mod engine;
pub mod error;
pub mod index;
pub mod model;
pub mod outline;
pub mod parser;
pub mod segment;
pub mod store;

// Re-export commonly used types
pub use engine::{CrossDocHit, Engine, EngineStats, IngestOptions, SearchOptions};
pub use error::{Error, Result};
pub use index::{keyphrases, summarize, SearchHit, SearchIndex};
pub use model::{
    DocumentMetadata, DocumentSummary, HeadingLevel, IngestOutcome, Outline, OutlineEntry,
    Paragraph, ParagraphMeta,
};
pub use outline::OutlineOptions;
pub use parser::{LayoutLine, LayoutSpan, LopdfSource, PageSource};

use std::path::Path;

/// Infer the outline of a PDF file without building an index.
///
/// # Example
///
/// ```no_run
/// let outline = pdflens::outline_file("document.pdf").unwrap();
/// println!("{}: {} headings", outline.title, outline.len());
/// ```
pub fn outline_file<P: AsRef<Path>>(path: P) -> Result<Outline> {
    let source = LopdfSource::open(path)?;
    outline::outline_from_source(&source, &OutlineOptions::default())
}

/// Infer the outline of a PDF held in memory.
pub fn outline_bytes(data: &[u8]) -> Result<Outline> {
    let source = LopdfSource::from_bytes(data)?;
    outline::outline_from_source(&source, &OutlineOptions::default())
}

/// Extract plain text from a PDF file, one string per page, capped at
/// `max_pages` when given.
pub fn extract_text<P: AsRef<Path>>(path: P, max_pages: Option<usize>) -> Result<Vec<String>> {
    let source = LopdfSource::open(path)?;
    let limit = max_pages
        .unwrap_or(usize::MAX)
        .min(source.page_count());
    (0..limit).map(|i| source.page_text(i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_bytes_rejects_garbage() {
        assert!(matches!(
            outline_bytes(b"definitely not a pdf"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_engine_default_is_empty() {
        let engine = Engine::new();
        assert_eq!(engine.stats().documents, 0);
        assert!(engine.list().is_empty());
    }
}

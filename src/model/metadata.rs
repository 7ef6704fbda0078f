//! Document-level metadata kept alongside each search index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::OutlineEntry;

/// Per-document metadata, published together with the search index
/// when an ingest completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Detected title, falling back to the source file stem when
    /// title detection produced an empty string
    pub title: String,

    /// Inferred heading entries
    pub outline: Vec<OutlineEntry>,

    /// Number of pages in the source PDF
    pub page_count: usize,

    /// When the ingest completed
    pub processed_at: DateTime<Utc>,

    /// Original file name of the upload
    pub filename: String,
}

/// What an ingest returns to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOutcome {
    /// Document id the result was published under
    pub doc_id: String,

    /// Detected (or fallback) title
    pub title: String,

    /// Inferred heading entries
    pub outline: Vec<OutlineEntry>,

    /// Number of pages in the source PDF
    pub page_count: usize,
}

/// One row of a document listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Document id
    pub id: String,

    /// Title from the metadata record
    pub title: String,

    /// Number of pages
    pub page_count: usize,

    /// When the ingest completed
    pub processed_at: DateTime<Utc>,

    /// Original file name
    pub filename: String,
}

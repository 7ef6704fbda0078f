//! The engine facade: ingest, search, cross-document search, deletion.
//!
//! Each ingest is an independent unit of work touching only its own
//! document id; the final publish into the store is the only shared-state
//! write. Concurrent ingests for different ids never conflict.

use std::path::Path;

use chrono::Utc;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::index::{SearchHit, SearchIndex};
use crate::model::{DocumentMetadata, DocumentSummary, IngestOutcome, OutlineEntry};
use crate::outline::{infer_outline, OutlineOptions};
use crate::parser::{LopdfSource, PageSource};
use crate::segment::segment_pages;
use crate::store::{DocumentRecord, DocumentStore};

/// Options controlling ingest.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Extract pages on the rayon pool instead of sequentially
    pub parallel: bool,

    /// Outline inference options
    pub outline: OutlineOptions,
}

impl IngestOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable parallel page extraction.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set outline options.
    pub fn with_outline(mut self, outline: OutlineOptions) -> Self {
        self.outline = outline;
        self
    }
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            outline: OutlineOptions::default(),
        }
    }
}

/// Options controlling search composition.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Per-document hit cap applied before the global cut in
    /// cross-document search. The default of 3 reproduces the known
    /// small-document bias.
    pub per_document_cap: usize,
}

impl SearchOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-document cross-search cap.
    pub fn with_per_document_cap(mut self, cap: usize) -> Self {
        self.per_document_cap = cap;
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            per_document_cap: 3,
        }
    }
}

/// A search hit tagged with its source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossDocHit {
    /// Paragraph id within the source document
    pub id: usize,

    /// Paragraph text
    pub text: String,

    /// Cosine similarity against the query
    pub score: f32,

    /// Source document id
    pub doc_id: String,

    /// Source document title
    pub doc_title: String,

    /// Source page (1-indexed)
    pub page: u32,
}

/// Registry counters for health reporting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineStats {
    /// Published documents
    pub documents: usize,

    /// Loaded search indexes (one per document)
    pub indexes: usize,
}

/// Document intelligence engine: owns the registry and runs the
/// ingest pipeline.
#[derive(Debug, Default)]
pub struct Engine {
    store: DocumentStore,
    ingest_options: IngestOptions,
    search_options: SearchOptions,
}

impl Engine {
    /// Create an engine with default options and an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with explicit options.
    pub fn with_options(ingest: IngestOptions, search: SearchOptions) -> Self {
        Self {
            store: DocumentStore::new(),
            ingest_options: ingest,
            search_options: search,
        }
    }

    /// Ingest a PDF file and publish it under `doc_id`.
    pub fn ingest_file<P: AsRef<Path>>(&self, doc_id: &str, path: P) -> Result<IngestOutcome> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let source = LopdfSource::open(path)?;
        self.ingest_source(doc_id, &source, &filename)
    }

    /// Ingest a PDF from memory and publish it under `doc_id`.
    pub fn ingest_bytes(&self, doc_id: &str, data: &[u8], filename: &str) -> Result<IngestOutcome> {
        let source = LopdfSource::from_bytes(data)?;
        self.ingest_source(doc_id, &source, filename)
    }

    /// Run the full pipeline over any page source and publish the result.
    ///
    /// Zero-page and zero-text documents succeed with an empty outline,
    /// empty title and an index that returns no hits. On error nothing is
    /// published and other documents are untouched.
    pub fn ingest_source<S: PageSource + ?Sized>(
        &self,
        doc_id: &str,
        source: &S,
        filename: &str,
    ) -> Result<IngestOutcome> {
        let page_count = source.page_count();
        let pages = self.extract_pages(source, page_count)?;

        let (texts, layouts): (Vec<String>, Vec<Vec<crate::parser::LayoutLine>>) =
            pages.into_iter().unzip();

        let outline = infer_outline(&layouts, &self.ingest_options.outline);
        let paragraphs = segment_pages(&texts, doc_id);
        debug!(
            "ingest {}: {} pages, {} paragraphs, {} headings",
            doc_id,
            page_count,
            paragraphs.len(),
            outline.len()
        );

        let index = SearchIndex::build(paragraphs);

        let title = if outline.title.is_empty() {
            file_stem(filename)
        } else {
            outline.title.clone()
        };

        let metadata = DocumentMetadata {
            title: title.clone(),
            outline: outline.outline.clone(),
            page_count,
            processed_at: Utc::now(),
            filename: filename.to_string(),
        };

        // Single atomic publish; readers see the whole record or nothing
        self.store.publish(doc_id, DocumentRecord { index, metadata });
        info!("published document {} ({:?}, {} pages)", doc_id, title, page_count);

        Ok(IngestOutcome {
            doc_id: doc_id.to_string(),
            title,
            outline: outline.outline,
            page_count,
        })
    }

    fn extract_pages<S: PageSource + ?Sized>(
        &self,
        source: &S,
        page_count: usize,
    ) -> Result<Vec<(String, Vec<crate::parser::LayoutLine>)>> {
        let extract = |i: usize| -> Result<(String, Vec<crate::parser::LayoutLine>)> {
            Ok((source.page_text(i)?, source.page_layout(i)?))
        };

        if self.ingest_options.parallel {
            (0..page_count).into_par_iter().map(extract).collect()
        } else {
            (0..page_count).map(extract).collect()
        }
    }

    /// Search within a published document.
    pub fn search(&self, doc_id: &str, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        let record = self
            .store
            .get(doc_id)
            .ok_or_else(|| Error::NotFound(doc_id.to_string()))?;
        Ok(record.index.search(query, top_k))
    }

    /// Search across every published document.
    ///
    /// Each document contributes at most `min(per_document_cap, top_k)`
    /// hits before the global score sort and cut. An empty corpus yields
    /// an empty list; this never fails.
    pub fn cross_search(&self, query: &str, top_k: usize) -> Vec<CrossDocHit> {
        let per_doc = self.search_options.per_document_cap.min(top_k);

        let mut results: Vec<CrossDocHit> = Vec::new();
        for (doc_id, record) in self.store.snapshot() {
            for hit in record.index.search(query, per_doc) {
                results.push(CrossDocHit {
                    id: hit.id,
                    text: hit.text,
                    score: hit.score,
                    doc_id: doc_id.clone(),
                    doc_title: record.metadata.title.clone(),
                    page: hit.meta.page,
                });
            }
        }

        // Stable sort: ties keep document-id then paragraph order
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);
        results
    }

    /// Heading entries of a published document.
    pub fn outline(&self, doc_id: &str) -> Result<Vec<OutlineEntry>> {
        Ok(self.metadata(doc_id)?.outline)
    }

    /// Metadata of a published document.
    pub fn metadata(&self, doc_id: &str) -> Result<DocumentMetadata> {
        self.store
            .get(doc_id)
            .map(|record| record.metadata.clone())
            .ok_or_else(|| Error::NotFound(doc_id.to_string()))
    }

    /// Remove a document and its index. Idempotent; unknown ids are a no-op.
    pub fn delete(&self, doc_id: &str) {
        if self.store.remove(doc_id) {
            info!("deleted document {}", doc_id);
        }
    }

    /// Summaries of all published documents, sorted by id.
    pub fn list(&self) -> Vec<DocumentSummary> {
        self.store
            .snapshot()
            .into_iter()
            .map(|(id, record)| DocumentSummary {
                id,
                title: record.metadata.title.clone(),
                page_count: record.metadata.page_count,
                processed_at: record.metadata.processed_at,
                filename: record.metadata.filename.clone(),
            })
            .collect()
    }

    /// Registry counters.
    pub fn stats(&self) -> EngineStats {
        let documents = self.store.len();
        EngineStats {
            documents,
            indexes: documents,
        }
    }
}

fn file_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{LayoutLine, LayoutSpan};

    /// In-memory page source used across engine tests.
    struct FakeSource {
        pages: Vec<(String, Vec<LayoutLine>)>,
    }

    impl PageSource for FakeSource {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn page_text(&self, index: usize) -> Result<String> {
            Ok(self.pages[index].0.clone())
        }

        fn page_layout(&self, index: usize) -> Result<Vec<LayoutLine>> {
            Ok(self.pages[index].1.clone())
        }
    }

    fn line(text: &str, size: f32, y: f32) -> LayoutLine {
        LayoutLine::new(vec![LayoutSpan::new(text, size, [72.0, y, 300.0, y + size])])
    }

    fn sample_source() -> FakeSource {
        FakeSource {
            pages: vec![
                (
                    "cats are great pets\n\ndogs are loyal companions".to_string(),
                    vec![
                        line("Pet Care Manual", 24.0, 720.0),
                        line("Introduction", 18.0, 650.0),
                    ],
                ),
                (
                    "quantum mechanics is complex".to_string(),
                    vec![line("Physics Digression", 18.0, 720.0)],
                ),
            ],
        }
    }

    #[test]
    fn test_ingest_publishes_outline_and_index() {
        let engine = Engine::new();
        let outcome = engine
            .ingest_source("doc-1", &sample_source(), "manual.pdf")
            .unwrap();

        assert_eq!(outcome.title, "Pet Care Manual");
        assert_eq!(outcome.page_count, 2);
        assert_eq!(outcome.outline.len(), 3);

        let hits = engine.search("doc-1", "loyal dog", 2).unwrap();
        assert_eq!(hits[0].text, "dogs are loyal companions");
        assert_eq!(hits[0].meta.page, 1);
    }

    #[test]
    fn test_ingest_empty_document_succeeds() {
        let engine = Engine::new();
        let outcome = engine
            .ingest_source("empty", &FakeSource { pages: Vec::new() }, "empty.pdf")
            .unwrap();

        // Title falls back to the file stem
        assert_eq!(outcome.title, "empty");
        assert!(outcome.outline.is_empty());
        assert_eq!(outcome.page_count, 0);
        assert!(engine.search("empty", "anything", 5).unwrap().is_empty());
    }

    #[test]
    fn test_search_unknown_doc_is_not_found() {
        let engine = Engine::new();
        let err = engine.search("ghost", "query", 5).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_delete_is_idempotent_and_clean() {
        let engine = Engine::new();
        engine
            .ingest_source("doc-1", &sample_source(), "manual.pdf")
            .unwrap();

        engine.delete("doc-1");
        engine.delete("doc-1");
        engine.delete("never-existed");

        assert!(matches!(
            engine.search("doc-1", "cats", 1),
            Err(Error::NotFound(_))
        ));
        assert_eq!(engine.stats().documents, 0);
    }

    #[test]
    fn test_cross_search_caps_and_sorts() {
        let engine = Engine::new();
        engine
            .ingest_source("pets", &sample_source(), "pets.pdf")
            .unwrap();
        engine
            .ingest_source(
                "physics",
                &FakeSource {
                    pages: vec![(
                        "quantum field theory\n\nclassical mechanics basics\n\n\
                         loyal dogs appear here too\n\nfourth paragraph of filler"
                            .to_string(),
                        Vec::new(),
                    )],
                },
                "physics.pdf",
            )
            .unwrap();

        let results = engine.cross_search("loyal dog", 4);
        assert!(results.len() <= 4);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        // Per-document cap of 3 holds before the global cut
        for doc in ["pets", "physics"] {
            assert!(results.iter().filter(|r| r.doc_id == doc).count() <= 3);
        }
        assert!(results[0].text.contains("loyal"));
    }

    #[test]
    fn test_cross_search_empty_corpus() {
        let engine = Engine::new();
        assert!(engine.cross_search("anything", 5).is_empty());
    }

    #[test]
    fn test_list_and_stats() {
        let engine = Engine::new();
        engine
            .ingest_source("b-doc", &sample_source(), "b.pdf")
            .unwrap();
        engine
            .ingest_source("a-doc", &sample_source(), "a.pdf")
            .unwrap();

        let listed = engine.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "a-doc");
        assert_eq!(listed[1].id, "b-doc");

        let stats = engine.stats();
        assert_eq!(stats.documents, 2);
        assert_eq!(stats.indexes, 2);
    }

    #[test]
    fn test_reingest_replaces_record() {
        let engine = Engine::new();
        engine
            .ingest_source("doc", &sample_source(), "v1.pdf")
            .unwrap();
        engine
            .ingest_source("doc", &FakeSource { pages: Vec::new() }, "v2.pdf")
            .unwrap();

        let meta = engine.metadata("doc").unwrap();
        assert_eq!(meta.filename, "v2.pdf");
        assert_eq!(meta.page_count, 0);
        assert_eq!(engine.stats().documents, 1);
    }
}

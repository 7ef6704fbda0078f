//! Lexical indexing and similarity search.

mod digest;
mod tfidf;

pub use digest::{keyphrases, summarize};
pub use tfidf::{SparseVector, TfidfVectorizer};

use serde::{Deserialize, Serialize};

use crate::model::{Paragraph, ParagraphMeta};

/// A scored paragraph returned from a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Paragraph id within its document
    pub id: usize,

    /// Paragraph text
    pub text: String,

    /// Cosine similarity against the query, in [0, 1]
    pub score: f32,

    /// Source location
    pub meta: ParagraphMeta,
}

/// Per-document lexical index: fitted vectorizer, term matrix rows and the
/// paragraphs they hydrate from.
///
/// Built once at ingest and immutable afterward.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    vectorizer: TfidfVectorizer,
    rows: Vec<SparseVector>,
    paragraphs: Vec<Paragraph>,
}

impl SearchIndex {
    /// Fit a TF-IDF space over a document's paragraphs.
    ///
    /// A document with zero paragraphs produces an index with an empty
    /// vocabulary that returns no results for any query.
    pub fn build(paragraphs: Vec<Paragraph>) -> Self {
        let texts: Vec<&str> = paragraphs.iter().map(|p| p.text.as_str()).collect();
        let vectorizer = TfidfVectorizer::fit(&texts);
        let rows = texts.iter().map(|t| vectorizer.transform(t)).collect();
        Self {
            vectorizer,
            rows,
            paragraphs,
        }
    }

    /// Rank paragraphs against a query by cosine similarity.
    ///
    /// Returns at most `top_k` hits in descending score order; ties keep
    /// original paragraph order. Out-of-vocabulary query terms contribute
    /// zero weight. An empty index returns an empty list.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<SearchHit> {
        if self.paragraphs.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let query_vec = self.vectorizer.transform(query);
        let mut scored: Vec<(usize, f32)> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| (i, query_vec.dot(row)))
            .collect();

        // Stable sort: equal scores stay in paragraph order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        scored
            .into_iter()
            .map(|(i, score)| {
                let p = &self.paragraphs[i];
                SearchHit {
                    id: p.id,
                    text: p.text.clone(),
                    score,
                    meta: p.meta.clone(),
                }
            })
            .collect()
    }

    /// Number of indexed paragraphs.
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Check if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// The indexed paragraphs, in id order.
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }
}

//! TF-IDF vector space over paragraph texts.
//!
//! Mirrors the common reference formulation: lowercase tokens of two or
//! more word characters, English stopwords removed, smoothed idf
//! `ln((1 + n) / (1 + df)) + 1`, raw term counts, L2-normalized rows.
//! Cosine similarity between normalized vectors is then a plain sparse
//! dot product in [0, 1].

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

/// English stopwords excluded from the vocabulary.
pub(crate) static STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "cannot", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "if", "in", "into", "is", "it", "its", "itself",
    "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on",
    "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same",
    "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

fn is_stopword(token: &str) -> bool {
    STOPWORDS.binary_search(&token).is_ok()
}

/// Lowercased tokens of two or more word characters, stopwords removed.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|t| !is_stopword(t))
        .collect()
}

/// An L2-normalized sparse term-weight vector, entries sorted by term id.
#[derive(Debug, Clone, Default)]
pub struct SparseVector {
    entries: Vec<(usize, f32)>,
}

impl SparseVector {
    fn from_weights(mut entries: Vec<(usize, f32)>) -> Self {
        entries.sort_unstable_by_key(|(term, _)| *term);
        let norm = entries
            .iter()
            .map(|(_, w)| w * w)
            .sum::<f32>()
            .sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }
        Self { entries }
    }

    /// Check whether the vector carries no weight.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of weights (pre-normalization sums are not retained).
    pub fn weight_sum(&self) -> f32 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    /// Dot product of two normalized vectors: cosine similarity.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let mut sum = 0.0;
        let (mut i, mut j) = (0, 0);
        while i < self.entries.len() && j < other.entries.len() {
            let (a_term, a_w) = self.entries[i];
            let (b_term, b_w) = other.entries[j];
            match a_term.cmp(&b_term) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum.clamp(0.0, 1.0)
    }
}

/// A fitted TF-IDF model: vocabulary plus per-term idf weights.
///
/// Queries are transformed through the same fitted vocabulary;
/// out-of-vocabulary terms contribute zero weight, never a refit.
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Fit the vectorizer over a corpus of texts.
    ///
    /// An empty corpus (or one with no usable tokens) yields an empty
    /// vocabulary; every transform then produces an empty vector.
    pub fn fit<S: AsRef<str>>(texts: &[S]) -> Self {
        let mut df: BTreeMap<String, usize> = BTreeMap::new();
        for text in texts {
            let mut tokens = tokenize(text.as_ref());
            tokens.sort_unstable();
            tokens.dedup();
            for token in tokens {
                *df.entry(token).or_insert(0) += 1;
            }
        }

        let n = texts.len() as f32;
        let mut vocabulary = HashMap::with_capacity(df.len());
        let mut idf = Vec::with_capacity(df.len());
        for (term_id, (term, count)) in df.into_iter().enumerate() {
            vocabulary.insert(term, term_id);
            idf.push(((1.0 + n) / (1.0 + count as f32)).ln() + 1.0);
        }

        Self { vocabulary, idf }
    }

    /// Transform a text into the fitted vector space.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for token in tokenize(text) {
            if let Some(&term_id) = self.vocabulary.get(&token) {
                *counts.entry(term_id).or_insert(0.0) += 1.0;
            }
        }

        let entries = counts
            .into_iter()
            .map(|(term_id, tf)| (term_id, tf * self.idf[term_id]))
            .collect();
        SparseVector::from_weights(entries)
    }

    /// Number of terms in the fitted vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}

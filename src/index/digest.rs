//! Lightweight text digests: keyphrases and extractive summaries.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::tfidf::TfidfVectorizer;

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z]{4,}\b").expect("word pattern is valid"));

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("sentence pattern is valid"));

static NON_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s.,!?;:]").expect("non-text pattern is valid"));

/// Collapse whitespace and strip characters outside plain prose.
fn preprocess(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    NON_TEXT.replace_all(&collapsed, "").into_owned()
}

/// The most frequent content words of four or more letters.
///
/// Ties resolve to first occurrence, so output is deterministic.
pub fn keyphrases(text: &str, top_k: usize) -> Vec<String> {
    let cleaned = preprocess(text).to_lowercase();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for m in WORD_RE.find_iter(&cleaned) {
        let word = m.as_str();
        if super::tfidf::STOPWORDS.binary_search(&word).is_ok() {
            continue;
        }
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            first_seen.push(word);
        }
        *count += 1;
    }

    let mut ranked: Vec<(usize, &str)> = first_seen
        .iter()
        .enumerate()
        .map(|(order, &word)| (order, word))
        .collect();
    ranked.sort_by(|a, b| counts[b.1].cmp(&counts[a.1]).then(a.0.cmp(&b.0)));

    ranked
        .into_iter()
        .take(top_k)
        .map(|(_, word)| word.to_string())
        .collect()
}

/// Extractive summary: the `max_sents` highest TF-IDF-weight sentences,
/// emitted in original order.
pub fn summarize(text: &str, max_sents: usize) -> String {
    let cleaned = preprocess(text);
    let sentences = split_sentences(&cleaned);
    let sentences: Vec<&str> = sentences
        .into_iter()
        .filter(|s| s.split_whitespace().count() >= 3)
        .collect();

    if sentences.is_empty() || max_sents == 0 {
        return String::new();
    }
    if sentences.len() <= max_sents {
        return sentences.join(" ");
    }

    let vectorizer = TfidfVectorizer::fit(&sentences);
    let mut scored: Vec<(usize, f32)> = sentences
        .iter()
        .enumerate()
        .map(|(i, s)| (i, vectorizer.transform(s).weight_sum()))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(max_sents);

    let mut picked: Vec<usize> = scored.into_iter().map(|(i, _)| i).collect();
    picked.sort_unstable();
    picked
        .into_iter()
        .map(|i| sentences[i])
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split prose into sentences at terminal punctuation followed by space.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END.find_iter(text) {
        // Keep the punctuation, drop the trailing whitespace
        let end = m.start() + 1;
        let sentence = text[start..end].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = m.end();
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyphrases_by_frequency() {
        let text = "Testing testing quality. Quality matters; testing reveals quality gaps.";
        let phrases = keyphrases(text, 2);
        assert_eq!(phrases, vec!["testing", "quality"]);
    }

    #[test]
    fn test_keyphrases_skips_short_words_and_stopwords() {
        let phrases = keyphrases("the cat and the dog were there", 5);
        // "cat"/"dog" too short, "there"/"were"/"the"/"and" stopwords
        assert!(phrases.is_empty());
    }

    #[test]
    fn test_summarize_short_text_passthrough() {
        let text = "One short sentence here. Another short one follows.";
        let summary = summarize(text, 3);
        assert_eq!(summary, "One short sentence here. Another short one follows.");
    }

    #[test]
    fn test_summarize_respects_limit_and_order() {
        let text = "Alpha systems process documents quickly. Beta modules verify output carefully. \
                    Gamma stages archive results permanently. Delta agents report status hourly.";
        let summary = summarize(text, 2);

        let count = summary.matches('.').count();
        assert_eq!(count, 2);
        // Selected sentences appear in original order
        if summary.contains("Alpha") && summary.contains("Beta") {
            assert!(summary.find("Alpha").unwrap() < summary.find("Beta").unwrap());
        }
    }

    #[test]
    fn test_summarize_empty_input() {
        assert_eq!(summarize("", 3), "");
        assert_eq!(summarize("word", 3), "");
    }

    #[test]
    fn test_split_sentences() {
        let parts = split_sentences("First one. Second one! Third?");
        assert_eq!(parts, vec!["First one.", "Second one!", "Third?"]);
    }
}

//! Keyword and phrase extraction.
//!
//! Two ranking modes:
//!
//! - **TF-IDF** against the batch of documents currently being indexed:
//!   term frequency normalized by document length, inverse document
//!   frequency over the in-run corpus. Used by the pipeline, where every
//!   document body is available.
//! - **Frequency heuristic** over stemmed tokens, weighted by word length.
//!   Used when there is no corpus to compare against (single-document
//!   analysis, `cdx enhance`).
//!
//! Both are pure functions over the loaded vocabulary; ties rank in first
//! occurrence order because the final sort is stable.

use std::collections::{HashMap, HashSet};

use crate::models::Keyword;
use crate::stem::stem;
use crate::text::tokenize;
use crate::vocab::Vocabulary;

/// Keywords returned by TF-IDF extraction.
pub const TFIDF_KEYWORD_LIMIT: usize = 15;
/// Default keywords returned by the frequency heuristic.
pub const DEFAULT_KEYWORD_LIMIT: usize = 20;
/// Phrases returned by n-gram extraction.
pub const PHRASE_LIMIT: usize = 10;

/// Count tokens in first-occurrence order. The order vector drives stable
/// tie-breaking later.
fn count_in_order(tokens: &[String]) -> (Vec<String>, HashMap<String, usize>) {
    let mut order = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in tokens {
        match counts.get_mut(token) {
            Some(n) => *n += 1,
            None => {
                order.push(token.clone());
                counts.insert(token.clone(), 1);
            }
        }
    }
    (order, counts)
}

/// Extract the top keywords by TF-IDF score against the given corpus.
///
/// IDF is `ln(corpus_len / docs_containing_term)`, defined as zero when no
/// corpus document contains the term, which also guards the empty-corpus
/// case. Empty text yields an empty list.
pub fn extract_keywords_tfidf(text: &str, corpus: &[String], vocab: &Vocabulary) -> Vec<String> {
    let tokens = tokenize(text, vocab.stop_words());
    if tokens.is_empty() {
        return Vec::new();
    }

    let (order, counts) = count_in_order(&tokens);
    let doc_len = tokens.len() as f64;

    let corpus_token_sets: Vec<HashSet<String>> = corpus
        .iter()
        .map(|doc| tokenize(doc, vocab.stop_words()).into_iter().collect())
        .collect();

    let mut scored: Vec<(String, f64)> = order
        .into_iter()
        .map(|term| {
            let tf = counts[&term] as f64 / doc_len;
            let docs_with_term = corpus_token_sets
                .iter()
                .filter(|set| set.contains(&term))
                .count();
            let idf = if docs_with_term == 0 {
                0.0
            } else {
                (corpus.len() as f64 / docs_with_term as f64).ln()
            };
            (term, tf * idf)
        })
        .collect();

    // Stable sort keeps first-occurrence order among equal scores.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored
        .into_iter()
        .take(TFIDF_KEYWORD_LIMIT)
        .map(|(term, _)| term)
        .collect()
}

/// Extract keywords by the frequency heuristic: occurrence count of each
/// stemmed token weighted by `ln(len + 1)`, favoring longer, repeated
/// words. Each keyword carries a representative literal term recovered
/// from the stemmed index when the vocabulary knows one.
pub fn extract_keywords(text: &str, limit: usize, vocab: &Vocabulary) -> Vec<Keyword> {
    let tokens = tokenize(text, vocab.stop_words());
    let stemmed: Vec<String> = tokens.iter().map(|t| stem(t)).collect();
    let (order, counts) = count_in_order(&stemmed);

    let mut scored: Vec<Keyword> = order
        .into_iter()
        .map(|term| {
            let score = counts[&term] as f64 * ((term.len() as f64) + 1.0).ln();
            let original = vocab
                .representative(&term)
                .unwrap_or(term.as_str())
                .to_string();
            Keyword {
                term,
                original,
                score,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(limit);
    scored
}

/// Extract repeated contiguous phrases: slide an `n`-token window over the
/// token sequence, keep phrases occurring more than once, and return the
/// most frequent.
pub fn extract_phrases(text: &str, n: usize, vocab: &Vocabulary) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    let tokens = tokenize(text, vocab.stop_words());
    if tokens.len() < n {
        return Vec::new();
    }

    let phrases: Vec<String> = tokens.windows(n).map(|w| w.join(" ")).collect();
    let (order, counts) = count_in_order(&phrases);

    let mut repeated: Vec<(String, usize)> = order
        .into_iter()
        .filter_map(|phrase| {
            let count = counts[&phrase];
            (count > 1).then_some((phrase, count))
        })
        .collect();

    repeated.sort_by(|a, b| b.1.cmp(&a.1));
    repeated
        .into_iter()
        .take(PHRASE_LIMIT)
        .map(|(phrase, _)| phrase)
        .collect()
}

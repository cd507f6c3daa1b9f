//! Document classification against the controlled taxonomy.
//!
//! Matching is set-intersection over normalized tokens: the document's
//! literal and stemmed tokens on one side, each label's literal and stemmed
//! vocabulary terms on the other. Confidence divisors differ per category —
//! topic vocabularies are deliberately smaller and more specific than
//! subject vocabularies, so fewer matches reach full confidence.

use std::collections::HashSet;

use crate::models::{Classification, DocMeta};
use crate::stem::stem;
use crate::text::tokenize;
use crate::vocab::Vocabulary;

/// Matches required for full confidence on a subject label.
const SUBJECT_CONFIDENCE_DIVISOR: f64 = 5.0;
/// Matches required for full confidence on a topic label.
const TOPIC_CONFIDENCE_DIVISOR: f64 = 3.0;
/// Difficulty assigned when no difficulty vocabulary matches at all.
const DEFAULT_DIFFICULTY: &str = "intermediate";

/// Classify text against the loaded vocabulary.
pub fn classify(vocab: &Vocabulary, text: &str) -> Classification {
    classify_with_meta(vocab, text, None)
}

/// Classify text, then merge explicit author metadata: explicit subjects
/// and topics are unioned into the computed labels, and an explicit
/// difficulty always overrides the detected one.
pub fn classify_with_meta(
    vocab: &Vocabulary,
    text: &str,
    meta: Option<&DocMeta>,
) -> Classification {
    let tokens = tokenize(text, vocab.stop_words());
    let mut match_set: HashSet<String> = tokens.iter().cloned().collect();
    for token in &tokens {
        match_set.insert(stem(token));
    }

    let mut result = Classification::default();

    for (label, terms) in vocab.category("subjects") {
        let matches = count_matches(terms, &match_set);
        if matches > 0 {
            let confidence = (matches as f64 / SUBJECT_CONFIDENCE_DIVISOR).min(1.0);
            result.subjects.push(label.clone());
            result.confidence.insert(label.clone(), confidence);
        }
    }

    for (label, terms) in vocab.category("topics") {
        let matches = count_matches(terms, &match_set);
        if matches > 0 {
            let confidence = (matches as f64 / TOPIC_CONFIDENCE_DIVISOR).min(1.0);
            result.topics.push(label.clone());
            result.confidence.insert(label.clone(), confidence);
        }
    }

    // Highest match count wins; a strict comparison means ties go to the
    // first label in category load order (sorted file name order).
    let mut max_matches = 0;
    let mut detected = DEFAULT_DIFFICULTY.to_string();
    for (label, terms) in vocab.category("difficulty") {
        let matches = count_matches(terms, &match_set);
        if matches > max_matches {
            max_matches = matches;
            detected = label.clone();
        }
    }
    result.difficulty = detected;

    if let Some(meta) = meta {
        merge_meta(&mut result, meta);
    }

    result
}

/// How many of the label's terms appear in the document's match set,
/// by literal or stemmed form.
fn count_matches(terms: &HashSet<String>, match_set: &HashSet<String>) -> usize {
    terms
        .iter()
        .filter(|t| match_set.contains(*t) || match_set.contains(&stem(t)))
        .count()
}

fn merge_meta(result: &mut Classification, meta: &DocMeta) {
    for subject in &meta.taxonomy.subjects {
        if !result.subjects.contains(subject) {
            result.subjects.push(subject.clone());
        }
    }
    for topic in &meta.taxonomy.topics {
        if !result.topics.contains(topic) {
            result.topics.push(topic.clone());
        }
    }
    if let Some(difficulty) = &meta.difficulty {
        if !difficulty.is_empty() {
            result.difficulty = difficulty.clone();
        }
    }
}

//! Term normalization and text tokenization.
//!
//! All vocabulary matching happens over normalized terms: lowercase ASCII,
//! digits, and single interior hyphens. The tokenizer additionally drops
//! one-character tokens and stop words (matched by literal or stemmed form).

use std::collections::HashSet;

use crate::stem::stem;

/// Normalize a term: lowercase, trim, strip everything outside `[a-z0-9-]`,
/// collapse repeated hyphens, and strip leading/trailing hyphens.
pub fn normalize(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    let mut prev_hyphen = false;
    for c in term.trim().chars() {
        let c = c.to_ascii_lowercase();
        if c == '-' {
            if !prev_hyphen {
                out.push('-');
                prev_hyphen = true;
            }
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
            prev_hyphen = false;
        }
    }
    out.trim_matches('-').to_string()
}

/// Normalize a term and stem it. Returns an empty string when nothing
/// survives normalization.
pub fn stem_term(term: &str) -> String {
    let normalized = normalize(term);
    if normalized.is_empty() {
        return String::new();
    }
    stem(&normalized)
}

/// The stop-word set. Holds both literal and stemmed forms; a word is a
/// stop word when either form of it is present.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    terms: HashSet<String>,
}

impl StopWords {
    pub fn new(terms: HashSet<String>) -> Self {
        Self { terms }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        let normalized = normalize(word);
        if normalized.is_empty() {
            return false;
        }
        self.terms.contains(&normalized) || self.terms.contains(&stem(&normalized))
    }
}

/// Tokenize text into words: lowercase, replace anything outside
/// `[a-z0-9\s-]` with a space, split on whitespace runs, and drop tokens of
/// length one as well as stop words.
pub fn tokenize(text: &str, stop_words: &StopWords) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|w| w.len() > 1 && !stop_words.contains(w))
        .map(|w| w.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_words(words: &[&str]) -> StopWords {
        let mut terms = HashSet::new();
        for w in words {
            let n = normalize(w);
            terms.insert(stem(&n));
            terms.insert(n);
        }
        StopWords::new(terms)
    }

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("  Hello, World!  "), "helloworld");
        assert_eq!(normalize("Getting-Started"), "getting-started");
        assert_eq!(normalize("a--b---c"), "a-b-c");
        assert_eq!(normalize("-edge-case-"), "edge-case");
        assert_eq!(normalize("C++"), "c");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!!"), "");
        assert_eq!(normalize("---"), "");
    }

    #[test]
    fn test_tokenize_splits_and_lowercases() {
        let tokens = tokenize("Hello World, this is Rust!", &StopWords::default());
        assert_eq!(tokens, vec!["hello", "world", "this", "is", "rust"]);
    }

    #[test]
    fn test_tokenize_drops_short_tokens() {
        let tokens = tokenize("a b cd I x yz", &StopWords::default());
        assert_eq!(tokens, vec!["cd", "yz"]);
    }

    #[test]
    fn test_tokenize_removes_stop_words() {
        let sw = stop_words(&["the", "a", "is"]);
        let tokens = tokenize("The quick brown fox", &sw);
        assert!(!tokens.contains(&"the".to_string()));
        assert_eq!(tokens, vec!["quick", "brown", "fox"]);
    }

    #[test]
    fn test_stop_word_matches_stemmed_form() {
        // "using" stems to "use"; with "use" in the set both are dropped.
        let sw = stop_words(&["use"]);
        assert!(sw.contains("use"));
        assert!(sw.contains("using"));
        assert!(!sw.contains("user-interface"));
    }

    #[test]
    fn test_tokenize_keeps_hyphens() {
        let tokens = tokenize("getting-started guide", &StopWords::default());
        assert_eq!(tokens, vec!["getting-started", "guide"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("", &StopWords::default()).is_empty());
        assert!(tokenize("   \n\t  ", &StopWords::default()).is_empty());
    }
}

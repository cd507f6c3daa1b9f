//! Vocabulary store: loads controlled-taxonomy term lists and builds the
//! stemmed lookup index.
//!
//! Term lists live in a vocabulary directory:
//!
//! ```text
//! vocab/
//! ├── subjects/       # one <label>.txt per subject
//! ├── topics/         # one <label>.txt per topic
//! ├── difficulty/     # one <label>.txt per difficulty level
//! └── stopwords.txt
//! ```
//!
//! A `Vocabulary` is an explicit context object: the host constructs it once,
//! calls [`Vocabulary::load_all`], and passes it by shared reference into the
//! classifier and keyword extractor. Loaded files are memoized per path; a
//! fresh value starts cold. Missing files or directories degrade to empty
//! sets with a warning, never an error — absent vocabulary is a usable state.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::text::{normalize, stem_term, StopWords};

/// The three taxonomy categories, in the order they are loaded.
pub const CATEGORIES: [&str; 3] = ["subjects", "topics", "difficulty"];

/// A labeled set of matchable terms (literal and stemmed forms merged).
pub type LabeledTerms = (String, HashSet<String>);

#[derive(Debug, Default)]
pub struct Vocabulary {
    vocab_dir: PathBuf,
    /// Memoized per-file term sets.
    file_cache: HashMap<PathBuf, HashSet<String>>,
    /// Labels with their matchable term sets, per category, in load order.
    /// Load order is sorted file name order; the difficulty tie-break
    /// depends on it.
    categories: HashMap<String, Vec<LabeledTerms>>,
    /// Stemmed term -> literal terms that stem to it.
    stemmed_index: HashMap<String, BTreeSet<String>>,
    stop_words: StopWords,
}

/// Per-category term counts, reported by `cdx vocab`.
#[derive(Debug, Default, Serialize)]
pub struct VocabStats {
    pub stop_words: usize,
    pub subjects: Vec<(String, usize)>,
    pub topics: Vec<(String, usize)>,
    pub difficulty: Vec<(String, usize)>,
    pub total_terms: usize,
    pub stemmed_index: usize,
}

impl Vocabulary {
    /// Create a cold vocabulary rooted at `vocab_dir`. Nothing is read
    /// until a `load_*` call.
    pub fn new(vocab_dir: impl Into<PathBuf>) -> Self {
        Self {
            vocab_dir: vocab_dir.into(),
            ..Default::default()
        }
    }

    /// Load the stop-word list and every category.
    pub fn load_all(&mut self) {
        self.load_stop_words();
        for category in CATEGORIES {
            self.load_category(category);
        }
    }

    /// Load a single term-list file: one term per line, blank lines and
    /// `#` comments ignored. Every literal term is also stemmed; the
    /// returned matchable set is the union of both forms. Results are
    /// memoized per path for the lifetime of this vocabulary.
    pub fn load_file(&mut self, path: &Path) -> HashSet<String> {
        if let Some(cached) = self.file_cache.get(path) {
            return cached.clone();
        }

        let mut terms = HashSet::new();

        match std::fs::read_to_string(path) {
            Ok(content) => {
                for line in content.lines() {
                    let trimmed = line.trim();
                    if trimmed.is_empty() || trimmed.starts_with('#') {
                        continue;
                    }
                    let normalized = normalize(trimmed);
                    if normalized.is_empty() {
                        continue;
                    }
                    let stemmed = stem_term(&normalized);
                    if !stemmed.is_empty() {
                        self.stemmed_index
                            .entry(stemmed.clone())
                            .or_default()
                            .insert(normalized.clone());
                        terms.insert(stemmed);
                    }
                    terms.insert(normalized);
                }
            }
            Err(e) => {
                eprintln!("Warning: vocabulary file {}: {}", path.display(), e);
            }
        }

        self.file_cache.insert(path.to_path_buf(), terms.clone());
        terms
    }

    /// Load the stop-word set from `stopwords.txt` at the vocabulary root.
    pub fn load_stop_words(&mut self) -> &StopWords {
        if self.stop_words.is_empty() {
            let path = self.vocab_dir.join("stopwords.txt");
            let terms = self.load_file(&path);
            self.stop_words = StopWords::new(terms);
        }
        &self.stop_words
    }

    /// Load every `<label>.txt` in the category's directory, label = file
    /// base name. Files are loaded in sorted name order so label order is
    /// deterministic across platforms.
    pub fn load_category(&mut self, category: &str) {
        if self
            .categories
            .get(category)
            .is_some_and(|labels| !labels.is_empty())
        {
            return;
        }

        let dir = self.vocab_dir.join(category);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!(
                    "Warning: vocabulary category directory {}: {}",
                    dir.display(),
                    e
                );
                self.categories.insert(category.to_string(), Vec::new());
                return;
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        files.sort();

        let mut labels = Vec::new();
        for file in files {
            let label = match file.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };
            let terms = self.load_file(&file);
            labels.push((label, terms));
        }

        self.categories.insert(category.to_string(), labels);
    }

    /// Labels and term sets for a category, in load order. Empty when the
    /// category has not been loaded or its directory was missing.
    pub fn category(&self, category: &str) -> &[LabeledTerms] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Recover one literal term for a stem, if any vocabulary term stems to
    /// it. Deterministic: the lexicographically smallest literal wins.
    pub fn representative(&self, stemmed: &str) -> Option<&str> {
        self.stemmed_index
            .get(stemmed)
            .and_then(|originals| originals.iter().next())
            .map(String::as_str)
    }

    /// Is this term (literal or stemmed form) present in any loaded
    /// category?
    pub fn knows_term(&self, term: &str) -> bool {
        CATEGORIES.iter().any(|category| {
            self.category(category)
                .iter()
                .any(|(_, terms)| terms.contains(term))
        })
    }

    pub fn stats(&self) -> VocabStats {
        let count = |category: &str| -> Vec<(String, usize)> {
            self.category(category)
                .iter()
                .map(|(label, terms)| (label.clone(), terms.len()))
                .collect()
        };

        let subjects = count("subjects");
        let topics = count("topics");
        let difficulty = count("difficulty");
        let total_terms = subjects
            .iter()
            .chain(&topics)
            .chain(&difficulty)
            .map(|(_, n)| n)
            .sum();

        VocabStats {
            stop_words: self.stop_words.len(),
            subjects,
            topics,
            difficulty,
            total_terms,
            stemmed_index: self.stemmed_index.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_vocab(dir: &Path, relative: &str, lines: &[&str]) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, lines.join("\n")).unwrap();
    }

    fn test_vocab() -> (TempDir, Vocabulary) {
        let tmp = TempDir::new().unwrap();
        write_vocab(tmp.path(), "stopwords.txt", &["the", "a", "is", "and"]);
        write_vocab(
            tmp.path(),
            "subjects/technology.txt",
            &["# tech terms", "api", "code", "", "software"],
        );
        write_vocab(tmp.path(), "subjects/science.txt", &["research", "data"]);
        write_vocab(tmp.path(), "topics/testing.txt", &["test", "coverage"]);
        write_vocab(tmp.path(), "difficulty/beginner.txt", &["basic", "simple"]);
        write_vocab(
            tmp.path(),
            "difficulty/advanced.txt",
            &["complex", "expert"],
        );
        let mut vocab = Vocabulary::new(tmp.path());
        vocab.load_all();
        (tmp, vocab)
    }

    #[test]
    fn test_load_category_labels_sorted() {
        let (_tmp, vocab) = test_vocab();
        let labels: Vec<&str> = vocab
            .category("subjects")
            .iter()
            .map(|(l, _)| l.as_str())
            .collect();
        assert_eq!(labels, vec!["science", "technology"]);
    }

    #[test]
    fn test_comments_and_blanks_ignored() {
        let (_tmp, vocab) = test_vocab();
        let (_, terms) = &vocab.category("subjects")[1];
        assert!(terms.contains("api"));
        assert!(terms.contains("software"));
        assert!(!terms.contains("tech terms"));
    }

    #[test]
    fn test_matchable_set_includes_stems() {
        let (_tmp, vocab) = test_vocab();
        let (_, terms) = &vocab.category("subjects")[1];
        // "software" stems to "softwar"; both forms are matchable.
        assert!(terms.contains("software"));
        assert!(terms.contains("softwar"));
    }

    #[test]
    fn test_stemmed_index_recovers_original() {
        let (_tmp, vocab) = test_vocab();
        assert_eq!(vocab.representative("softwar"), Some("software"));
        assert_eq!(vocab.representative("nonexistent"), None);
    }

    #[test]
    fn test_stop_words_loaded() {
        let (_tmp, vocab) = test_vocab();
        assert!(vocab.stop_words().contains("the"));
        assert!(vocab.stop_words().contains("The"));
        assert!(!vocab.stop_words().contains("api"));
    }

    #[test]
    fn test_missing_category_is_empty_not_error() {
        let tmp = TempDir::new().unwrap();
        let mut vocab = Vocabulary::new(tmp.path().join("does-not-exist"));
        vocab.load_all();
        assert!(vocab.category("subjects").is_empty());
        assert!(vocab.stop_words().is_empty());
    }

    #[test]
    fn test_knows_term() {
        let (_tmp, vocab) = test_vocab();
        assert!(vocab.knows_term("api"));
        assert!(vocab.knows_term("softwar"));
        assert!(!vocab.knows_term("rust"));
    }

    #[test]
    fn test_stats() {
        let (_tmp, vocab) = test_vocab();
        let stats = vocab.stats();
        assert_eq!(stats.subjects.len(), 2);
        assert_eq!(stats.difficulty.len(), 2);
        assert!(stats.stop_words >= 4);
        assert!(stats.stemmed_index > 0);
        assert!(stats.total_terms > 0);
    }
}

//! Core data models used throughout the indexer.
//!
//! These types represent document metadata, classification results, and the
//! per-document analysis record that flows from the classifier and keyword
//! extractor into the cache and the published index artifact.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Author-supplied metadata parsed from front matter or a YAML document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocMeta {
    pub title: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub difficulty: Option<String>,
    #[serde(default)]
    pub taxonomy: Taxonomy,
    /// Any remaining front-matter fields, carried through to the index entry.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Explicit taxonomy labels supplied by the author. These are merged with
/// (subjects/topics) or override (difficulty) the computed classification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Taxonomy {
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Result of classifying a document against the controlled taxonomy.
///
/// Confidence is normalized per category independently; scores for a
/// subject label and a topic label are not comparable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub subjects: Vec<String>,
    pub topics: Vec<String>,
    pub difficulty: String,
    pub confidence: BTreeMap<String, f64>,
}

impl Default for Classification {
    fn default() -> Self {
        Self {
            subjects: Vec::new(),
            topics: Vec::new(),
            difficulty: "intermediate".to_string(),
            confidence: BTreeMap::new(),
        }
    }
}

/// Per-document analysis record, the unit stored in the change-detection
/// cache and consumed by the index builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub keywords: Vec<String>,
    pub phrases: Vec<String>,
    pub categories: Classification,
}

/// A ranked keyword from the frequency heuristic: the stemmed term, one
/// representative literal form recovered from the stemmed index, and the
/// score that ranked it.
#[derive(Debug, Clone, Serialize)]
pub struct Keyword {
    pub term: String,
    pub original: String,
    pub score: f64,
}

/// Content quality findings for a single document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

/// One entry in the published index artifact.
#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    pub path: String,
    pub name: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    /// Front-matter fields not otherwise modeled.
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub analysis: Analysis,
    pub validation: Validation,
    /// Lowercased concatenation of title, summary, keywords, and phrases,
    /// used for client-side substring search.
    pub search_text: String,
}

/// Response from the optional AI-enhancement collaborator. The indexer
/// produces a complete result without it; when present, its output is a
/// superset of the analysis shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Enhancement {
    #[serde(default)]
    pub suggestions: Vec<serde_json::Value>,
    #[serde(default, rename = "autoTags")]
    pub auto_tags: Vec<String>,
    #[serde(default, rename = "suggestedDifficulty")]
    pub suggested_difficulty: Option<String>,
}

/// A vocabulary term seen in enough documents to be worth adding to a
/// term-list file.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestedTerm {
    pub term: String,
    pub frequency: usize,
}

/// Indexing run report, written alongside the index artifact.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub summary: ReportSummary,
    pub categorization: Categorization,
    pub validation: ValidationReport,
    pub vocabulary: VocabularyReport,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportSummary {
    pub total_files: usize,
    pub indexed_files: usize,
    pub reused_from_cache: usize,
    pub skipped_files: usize,
    pub valid_files: usize,
    pub files_with_errors: usize,
    pub files_with_warnings: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Categorization {
    pub by_subject: BTreeMap<String, usize>,
    pub by_topic: BTreeMap<String, usize>,
    pub by_difficulty: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub file_errors: Vec<FileIssues>,
    pub file_warnings: Vec<FileIssues>,
    /// Per-path processing failures (unreadable file, bad front matter).
    /// These never abort the batch; the path is recorded and skipped.
    pub processing_errors: Vec<FileIssues>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileIssues {
    pub path: String,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VocabularyReport {
    pub total_unique_terms: usize,
    pub suggested_additions: Vec<SuggestedTerm>,
}

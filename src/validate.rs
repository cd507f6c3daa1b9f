//! Content quality checks for indexed documents.
//!
//! Errors make a document invalid; warnings and suggestions are advisory.
//! Checks run against the parsed metadata and raw content, never against
//! the computed analysis, so validation results are stable across cache
//! reuse.

use crate::models::{DocMeta, Validation};

const TITLE_MIN_CHARS: usize = 3;
const TITLE_MAX_CHARS: usize = 100;
const SUMMARY_MIN_CHARS: usize = 20;
const SUMMARY_MAX_CHARS: usize = 300;
const CONTENT_MIN_CHARS: usize = 100;

/// Phrases that indicate unfinished or placeholder content. Matched
/// case-insensitively against the full document.
const PLACEHOLDER_PATTERNS: [&str; 4] = ["lorem ipsum", "todo:", "fixme:", "test test test"];

/// Validate a document's metadata and content.
pub fn validate_content(meta: &DocMeta, content: &str) -> Validation {
    let mut result = Validation {
        valid: true,
        ..Default::default()
    };

    match &meta.title {
        None => {
            result.errors.push("missing required field: title".to_string());
        }
        Some(title) => {
            let len = title.trim().chars().count();
            if len == 0 {
                result.errors.push("missing required field: title".to_string());
            } else if len < TITLE_MIN_CHARS {
                result
                    .errors
                    .push(format!("title too short (minimum {} characters)", TITLE_MIN_CHARS));
            } else if len > TITLE_MAX_CHARS {
                result
                    .errors
                    .push(format!("title too long (maximum {} characters)", TITLE_MAX_CHARS));
            }
        }
    }

    match &meta.summary {
        None => {
            result
                .errors
                .push("missing required field: summary".to_string());
        }
        Some(summary) => {
            let len = summary.trim().chars().count();
            if len == 0 {
                result
                    .errors
                    .push("missing required field: summary".to_string());
            } else if len < SUMMARY_MIN_CHARS {
                result.warnings.push(format!(
                    "summary shorter than {} characters",
                    SUMMARY_MIN_CHARS
                ));
            } else if len > SUMMARY_MAX_CHARS {
                result.warnings.push(format!(
                    "summary longer than {} characters",
                    SUMMARY_MAX_CHARS
                ));
            }
        }
    }

    if content.trim().chars().count() < CONTENT_MIN_CHARS {
        result.warnings.push(format!(
            "content shorter than {} characters",
            CONTENT_MIN_CHARS
        ));
    }

    let lowered = content.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lowered.contains(pattern) {
            result
                .warnings
                .push(format!("placeholder content found: \"{}\"", pattern));
        }
    }

    suggest_improvements(meta, &mut result);

    result.valid = result.errors.is_empty();
    result
}

fn suggest_improvements(meta: &DocMeta, result: &mut Validation) {
    if meta.tags.is_empty() {
        result
            .suggestions
            .push("add tags to improve discoverability".to_string());
    }
    if meta.difficulty.is_none() {
        result
            .suggestions
            .push("set an explicit difficulty level".to_string());
    }
    if meta.taxonomy.subjects.is_empty() && meta.taxonomy.topics.is_empty() {
        result
            .suggestions
            .push("add taxonomy subjects or topics".to_string());
    }
}

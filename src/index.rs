//! Indexing pipeline orchestration.
//!
//! Coordinates the full run: scan → parse → change detection → analysis →
//! validation → index and report artifacts. Per-file failures are recorded
//! in the report and never abort the batch.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::cache::{fingerprint, CacheStore, SqliteCache};
use crate::classify::classify_with_meta;
use crate::config::Config;
use crate::extract::{parse_document, title_from_file_name, ParsedDoc};
use crate::keywords::{extract_keywords_tfidf, extract_phrases};
use crate::models::{
    Analysis, FileIssues, IndexEntry, Report, SuggestedTerm, Validation,
};
use crate::scan::scan_content;
use crate::stem::stem;
use crate::summarize::summarize;
use crate::text::tokenize;
use crate::validate::validate_content;
use crate::vocab::Vocabulary;

/// Unknown terms suggested for vocabulary addition, at most.
const SUGGESTION_LIMIT: usize = 20;

pub async fn run_index(
    config: &Config,
    full: bool,
    dry_run: bool,
    validate: bool,
    limit: Option<usize>,
) -> Result<()> {
    let mut vocab = Vocabulary::new(&config.vocab.dir);
    vocab.load_all();

    let cache = SqliteCache::open(&config.cache.path).await?;

    let mut paths = scan_content(&config.content)?;
    if let Some(lim) = limit {
        paths.truncate(lim);
    }

    if dry_run {
        let diff = cache.diff(&paths).await?;
        println!("index (dry-run)");
        println!("  files found: {}", paths.len());
        println!("  new: {}", diff.added.len());
        println!("  known: {}", diff.unchanged.len());
        println!("  stale cache entries: {}", diff.deleted.len());
        cache.close().await;
        return Ok(());
    }

    let mut report = Report::default();
    report.summary.total_files = paths.len();

    let mut entries: Vec<IndexEntry> = Vec::new();
    let mut parsed_docs: Vec<(String, ParsedDoc, String)> = Vec::new();
    // Stem -> documents it appears in, for vocabulary suggestions.
    let mut term_docs: HashMap<String, usize> = HashMap::new();

    for rel_path in &paths {
        let abs_path = config.content.root.join(rel_path);
        let content = match std::fs::read_to_string(&abs_path) {
            Ok(content) => content,
            Err(e) => {
                report.validation.processing_errors.push(FileIssues {
                    path: rel_path.clone(),
                    issues: vec![format!("failed to read: {}", e)],
                });
                report.summary.skipped_files += 1;
                continue;
            }
        };

        match parse_document(&abs_path, &content) {
            Ok(doc) => parsed_docs.push((rel_path.clone(), doc, content)),
            Err(e) => {
                report.validation.processing_errors.push(FileIssues {
                    path: rel_path.clone(),
                    issues: vec![format!("{:#}", e)],
                });
                report.summary.skipped_files += 1;
            }
        }
    }

    // The TF-IDF corpus is every parseable document in this run.
    let corpus: Vec<String> = parsed_docs
        .iter()
        .map(|(_, doc, _)| analysis_text(doc))
        .collect();

    for (rel_path, doc, content) in &parsed_docs {
        let hash = fingerprint(content);

        // Cache failures are local to the path: a broken read means
        // "changed", a broken write means the next run recomputes.
        let changed = if full {
            true
        } else {
            match cache.check_changed(rel_path, &hash).await {
                Ok(changed) => changed,
                Err(e) => {
                    eprintln!("Warning: cache lookup for {}: {}", rel_path, e);
                    true
                }
            }
        };

        let cached = if changed {
            None
        } else {
            match cache.get_cached(rel_path).await {
                Ok(cached) => cached,
                Err(e) => {
                    eprintln!("Warning: cache read for {}: {}", rel_path, e);
                    None
                }
            }
        };

        let analysis = match cached {
            Some(cached) => {
                report.summary.reused_from_cache += 1;
                cached
            }
            None => {
                // Fresh analysis: the file is new, changed, or its cache
                // entry is gone or corrupt.
                let text = analysis_text(doc);
                let analysis = Analysis {
                    keywords: extract_keywords_tfidf(&text, &corpus, &vocab),
                    phrases: extract_phrases(&text, config.analysis.phrase_ngram, &vocab),
                    categories: classify_with_meta(&vocab, &text, Some(&doc.meta)),
                };
                if let Err(e) = cache.save(rel_path, &hash, &analysis).await {
                    eprintln!("Warning: cache write for {}: {}", rel_path, e);
                }
                report.summary.indexed_files += 1;
                analysis
            }
        };

        let validation = validate_content(&doc.meta, content);
        record_validation(&mut report, rel_path, &validation);
        record_categorization(&mut report, &analysis);
        record_unknown_terms(&mut term_docs, doc, &vocab);

        entries.push(build_entry(rel_path, doc, analysis, validation));
    }

    if let Err(e) = cache.prune(&paths).await {
        eprintln!("Warning: cache prune: {}", e);
    }

    report.vocabulary.total_unique_terms = term_docs.len();
    report.vocabulary.suggested_additions = suggest_terms(&term_docs, config.analysis.suggestion_min_docs);

    write_artifacts(config, &entries, &report)?;

    println!("index");
    println!("  files found: {}", report.summary.total_files);
    println!("  analyzed: {}", report.summary.indexed_files);
    println!("  reused from cache: {}", report.summary.reused_from_cache);
    println!("  skipped: {}", report.summary.skipped_files);
    println!("  valid: {}", report.summary.valid_files);
    println!("  with errors: {}", report.summary.files_with_errors);
    println!("  with warnings: {}", report.summary.files_with_warnings);
    println!("  index: {}", config.output.index_path.display());
    println!("  report: {}", config.output.report_path.display());
    println!("ok");

    cache.close().await;

    if validate && report.summary.files_with_errors > 0 {
        anyhow::bail!(
            "{} file(s) failed validation",
            report.summary.files_with_errors
        );
    }

    Ok(())
}

/// The text a document is analyzed over: explicit title and summary
/// followed by the body, so metadata terms always participate in
/// classification.
fn analysis_text(doc: &ParsedDoc) -> String {
    let mut text = String::new();
    if let Some(title) = &doc.meta.title {
        text.push_str(title);
        text.push('\n');
    }
    if let Some(summary) = &doc.meta.summary {
        text.push_str(summary);
        text.push('\n');
    }
    for tag in &doc.meta.tags {
        text.push_str(tag);
        text.push('\n');
    }
    text.push_str(&doc.body);
    text
}

fn record_validation(report: &mut Report, path: &str, validation: &Validation) {
    if validation.valid {
        report.summary.valid_files += 1;
    } else {
        report.summary.files_with_errors += 1;
        report.validation.file_errors.push(FileIssues {
            path: path.to_string(),
            issues: validation.errors.clone(),
        });
    }
    if !validation.warnings.is_empty() {
        report.summary.files_with_warnings += 1;
        report.validation.file_warnings.push(FileIssues {
            path: path.to_string(),
            issues: validation.warnings.clone(),
        });
    }
}

fn record_categorization(report: &mut Report, analysis: &Analysis) {
    for subject in &analysis.categories.subjects {
        *report
            .categorization
            .by_subject
            .entry(subject.clone())
            .or_default() += 1;
    }
    for topic in &analysis.categories.topics {
        *report
            .categorization
            .by_topic
            .entry(topic.clone())
            .or_default() += 1;
    }
    *report
        .categorization
        .by_difficulty
        .entry(analysis.categories.difficulty.clone())
        .or_default() += 1;
}

/// Track how many documents each unknown stem appears in. Terms already in
/// the vocabulary are not candidates.
fn record_unknown_terms(term_docs: &mut HashMap<String, usize>, doc: &ParsedDoc, vocab: &Vocabulary) {
    let text = analysis_text(doc);
    let stems: std::collections::HashSet<String> = tokenize(&text, vocab.stop_words())
        .iter()
        .map(|t| stem(t))
        .collect();

    for stemmed in stems {
        if !vocab.knows_term(&stemmed) {
            *term_docs.entry(stemmed).or_default() += 1;
        }
    }
}

fn suggest_terms(term_docs: &HashMap<String, usize>, min_docs: usize) -> Vec<SuggestedTerm> {
    let mut suggestions: Vec<SuggestedTerm> = term_docs
        .iter()
        .filter(|(_, &count)| count >= min_docs)
        .map(|(term, &count)| SuggestedTerm {
            term: term.clone(),
            frequency: count,
        })
        .collect();

    suggestions.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.term.cmp(&b.term)));
    suggestions.truncate(SUGGESTION_LIMIT);
    suggestions
}

fn build_entry(
    rel_path: &str,
    doc: &ParsedDoc,
    analysis: Analysis,
    validation: Validation,
) -> IndexEntry {
    let path = Path::new(rel_path);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| rel_path.to_string());

    let title = doc
        .meta
        .title
        .clone()
        .or_else(|| Some(title_from_file_name(path)));
    let summary = doc.meta.summary.clone().or_else(|| {
        let generated = summarize(&doc.body);
        (!generated.is_empty()).then_some(generated)
    });

    let search_text = [
        title.as_deref().unwrap_or_default(),
        summary.as_deref().unwrap_or_default(),
        &analysis.keywords.join(" "),
        &analysis.phrases.join(" "),
    ]
    .join(" ")
    .to_lowercase();

    IndexEntry {
        path: rel_path.to_string(),
        name,
        title,
        summary,
        metadata: doc.meta.extra.clone(),
        analysis,
        validation,
        search_text,
    }
}

fn write_artifacts(config: &Config, entries: &[IndexEntry], report: &Report) -> Result<()> {
    let index_json = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "document_count": entries.len(),
        "documents": entries,
    });

    write_json(&config.output.index_path, &index_json)?;
    write_json(&config.output.report_path, &serde_json::to_value(report)?)?;
    Ok(())
}

fn write_json(path: &Path, value: &serde_json::Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let pretty = serde_json::to_string_pretty(value)?;
    std::fs::write(path, pretty)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocMeta;

    fn doc(title: Option<&str>, body: &str) -> ParsedDoc {
        ParsedDoc {
            meta: DocMeta {
                title: title.map(String::from),
                ..Default::default()
            },
            body: body.to_string(),
        }
    }

    #[test]
    fn test_analysis_text_includes_metadata() {
        let mut parsed = doc(Some("Kubernetes Guide"), "Body here.");
        parsed.meta.tags = vec!["ops".to_string()];
        let text = analysis_text(&parsed);
        assert!(text.contains("Kubernetes Guide"));
        assert!(text.contains("ops"));
        assert!(text.contains("Body here."));
    }

    #[test]
    fn test_build_entry_autofills_title_and_summary() {
        let body = "The quick setup procedure only takes a minute to complete.";
        let entry = build_entry(
            "guides/quick-setup.md",
            &doc(None, body),
            Analysis {
                keywords: vec!["setup".to_string()],
                phrases: vec![],
                categories: Default::default(),
            },
            Validation::default(),
        );
        assert_eq!(entry.title.as_deref(), Some("Quick Setup"));
        assert!(entry.summary.is_some());
        assert_eq!(entry.name, "quick-setup.md");
        assert!(entry.search_text.contains("setup"));
    }

    #[test]
    fn test_suggest_terms_threshold_and_order() {
        let mut term_docs = HashMap::new();
        term_docs.insert("kubernetes".to_string(), 5);
        term_docs.insert("helm".to_string(), 3);
        term_docs.insert("rare".to_string(), 1);

        let suggestions = suggest_terms(&term_docs, 3);
        let terms: Vec<&str> = suggestions.iter().map(|s| s.term.as_str()).collect();
        assert_eq!(terms, vec!["kubernetes", "helm"]);
    }
}

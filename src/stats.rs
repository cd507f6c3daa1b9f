//! Cache and vocabulary overview.
//!
//! Provides a quick summary of indexer state: how many files the cache
//! knows about, when they were last analyzed, and how many terms the
//! vocabulary carries per category. Used by `cdx stats` to give confidence
//! that incremental runs are reusing work as expected.

use anyhow::Result;

use crate::cache::{CacheStore, SqliteCache};
use crate::config::Config;
use crate::vocab::Vocabulary;

/// Run the stats command: query the cache and vocabulary and print a
/// summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let cache = SqliteCache::open(&config.cache.path).await?;
    let cache_stats = cache.stats().await?;

    let mut vocab = Vocabulary::new(&config.vocab.dir);
    vocab.load_all();
    let vocab_stats = vocab.stats();

    println!("Codex Indexer — Stats");
    println!("=====================");
    println!();
    println!("  Cache:       {}", config.cache.path.display());
    println!("  Size:        {}", format_bytes(cache_stats.cache_size));
    println!("  Files:       {}", cache_stats.total_files);
    println!(
        "  Oldest:      {}",
        cache_stats.oldest_entry.as_deref().unwrap_or("never")
    );
    println!(
        "  Newest:      {}",
        cache_stats.newest_entry.as_deref().unwrap_or("never")
    );
    println!();
    println!("  Vocabulary:  {}", config.vocab.dir.display());
    println!("  Stop words:  {}", vocab_stats.stop_words);
    println!("  Terms:       {}", vocab_stats.total_terms);
    println!("  Stem index:  {}", vocab_stats.stemmed_index);

    for (category, labels) in [
        ("subjects", &vocab_stats.subjects),
        ("topics", &vocab_stats.topics),
        ("difficulty", &vocab_stats.difficulty),
    ] {
        if labels.is_empty() {
            continue;
        }
        println!();
        println!("  {}:", category);
        println!("  {:<24} {:>6}", "LABEL", "TERMS");
        println!("  {}", "-".repeat(32));
        for (label, count) in labels {
            println!("  {:<24} {:>6}", label, count);
        }
    }

    println!();

    cache.close().await;
    Ok(())
}

/// Run the vocab command: per-label term counts only, no cache access.
pub fn run_vocab(config: &Config) -> Result<()> {
    let mut vocab = Vocabulary::new(&config.vocab.dir);
    vocab.load_all();
    let stats = vocab.stats();

    println!("Vocabulary: {}", config.vocab.dir.display());
    println!("  Stop words:  {}", stats.stop_words);
    println!("  Terms:       {}", stats.total_terms);
    println!("  Stem index:  {}", stats.stemmed_index);

    for (category, labels) in [
        ("subjects", &stats.subjects),
        ("topics", &stats.topics),
        ("difficulty", &stats.difficulty),
    ] {
        println!();
        println!("  {}:", category);
        if labels.is_empty() {
            println!("  (none)");
            continue;
        }
        for (label, count) in labels {
            println!("  {:<24} {:>6}", label, count);
        }
    }

    println!();
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

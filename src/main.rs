//! # Codex Indexer CLI (`cdx`)
//!
//! The `cdx` binary is the primary interface for the indexer. It provides
//! commands for initialization, indexing runs, cache management, and
//! vocabulary inspection.
//!
//! ## Usage
//!
//! ```bash
//! cdx --config ./cdx.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cdx init` | Create the cache database and vocabulary scaffold |
//! | `cdx index` | Scan, analyze, and publish the index artifacts |
//! | `cdx stats` | Cache and vocabulary overview |
//! | `cdx vocab` | Per-label vocabulary term counts |
//! | `cdx cache clear` | Drop every cache entry |
//! | `cdx enhance <path>` | AI metadata suggestions for one document |
//!
//! ## Examples
//!
//! ```bash
//! # First run
//! cdx init --config ./cdx.toml
//! cdx index --config ./cdx.toml
//!
//! # Re-analyze everything, ignoring the cache
//! cdx index --full
//!
//! # Fail the run when any document has validation errors (CI mode)
//! cdx index --validate
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use codex_indexer::cache::{CacheStore, SqliteCache};
use codex_indexer::config;
use codex_indexer::enhance;
use codex_indexer::index;
use codex_indexer::stats;
use codex_indexer::vocab::CATEGORIES;

/// Codex Indexer CLI — classify and index a markdown/YAML knowledge base.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file.
#[derive(Parser)]
#[command(
    name = "cdx",
    about = "Codex Indexer — classify and index a markdown/YAML knowledge base",
    version,
    long_about = "Codex Indexer scans a content tree, classifies each document against a \
    controlled vocabulary (subjects, topics, difficulty), extracts keywords and phrases, \
    validates content quality, and publishes a searchable JSON index. A content-hash cache \
    makes repeat runs incremental."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./cdx.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the cache database and vocabulary scaffold.
    ///
    /// Creates the SQLite cache file with its schema and the vocabulary
    /// directory layout (subjects/, topics/, difficulty/, stopwords.txt)
    /// when missing. Idempotent — running it multiple times is safe.
    Init,

    /// Scan the content tree and publish the index artifacts.
    ///
    /// Reads every document matching the configured globs, reuses cached
    /// analyses for unchanged files, analyzes the rest, and writes the
    /// index and report JSON files.
    Index {
        /// Ignore the cache — re-analyze every file from scratch.
        #[arg(long)]
        full: bool,

        /// Dry run — show file and change counts without analyzing or
        /// writing anything.
        #[arg(long)]
        dry_run: bool,

        /// Exit with an error when any document has validation errors.
        #[arg(long)]
        validate: bool,

        /// Maximum number of files to process.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show cache and vocabulary statistics.
    Stats,

    /// Show per-label vocabulary term counts.
    Vocab,

    /// Manage the change-detection cache.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Request AI metadata suggestions for a single document.
    ///
    /// Requires an enabled provider in `[enhance]` and the
    /// `OPENAI_API_KEY` environment variable.
    Enhance {
        /// Path to the document.
        path: PathBuf,
    },
}

/// Cache management subcommands.
#[derive(Subcommand)]
enum CacheAction {
    /// Remove every cache entry. The next index run re-analyzes all files.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let cache = SqliteCache::open(&cfg.cache.path).await?;
            cache.close().await;

            for category in CATEGORIES {
                std::fs::create_dir_all(cfg.vocab.dir.join(category))?;
            }
            let stopwords = cfg.vocab.dir.join("stopwords.txt");
            if !stopwords.exists() {
                std::fs::write(&stopwords, "# one stop word per line\n")?;
            }

            println!("Initialized cache at {}", cfg.cache.path.display());
            println!("Vocabulary scaffold at {}", cfg.vocab.dir.display());
        }
        Commands::Index {
            full,
            dry_run,
            validate,
            limit,
        } => {
            index::run_index(&cfg, full, dry_run, validate, limit).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Vocab => {
            stats::run_vocab(&cfg)?;
        }
        Commands::Cache { action } => match action {
            CacheAction::Clear => {
                let cache = SqliteCache::open(&cfg.cache.path).await?;
                cache.clear().await?;
                cache.close().await;
                println!("Cache cleared.");
            }
        },
        Commands::Enhance { path } => {
            enhance::run_enhance(&cfg, &path).await?;
        }
    }

    Ok(())
}

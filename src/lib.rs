//! # Codex Indexer
//!
//! A knowledge-base indexer for markdown and YAML documents.
//!
//! Codex Indexer scans a content tree, classifies each document against a
//! controlled vocabulary (subjects, topics, difficulty), extracts keywords
//! and repeated phrases, validates content quality, and publishes a
//! searchable JSON index plus a run report. A SQLite cache keyed by content
//! hash makes repeat runs incremental: only changed files are re-analyzed.
//!
//! ## Quick Start
//!
//! ```bash
//! cdx init                      # create cache and vocabulary scaffold
//! cdx index                     # analyze the content tree
//! cdx index --full              # ignore the cache, re-analyze everything
//! cdx stats                     # cache and vocabulary overview
//! cdx vocab                     # per-label term counts
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`stem`] | Porter stemmer |
//! | [`text`] | Normalization and tokenization |
//! | [`vocab`] | Vocabulary loading and stemmed index |
//! | [`classify`] | Taxonomy classification |
//! | [`keywords`] | Keyword and phrase extraction |
//! | [`cache`] | Change-detection cache |
//! | [`scan`] | Content tree scanning |
//! | [`extract`] | Front-matter parsing |
//! | [`summarize`] | Fallback summary generation |
//! | [`validate`] | Content quality checks |
//! | [`index`] | Indexing pipeline |
//! | [`enhance`] | Optional AI metadata suggestions |
//! | [`db`] | Database connection |

pub mod cache;
pub mod classify;
pub mod config;
pub mod db;
pub mod enhance;
pub mod extract;
pub mod index;
pub mod keywords;
pub mod models;
pub mod scan;
pub mod stats;
pub mod stem;
pub mod summarize;
pub mod text;
pub mod validate;
pub mod vocab;

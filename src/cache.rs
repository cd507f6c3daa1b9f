//! Change-detection cache keyed by content hash.
//!
//! The [`CacheStore`] trait defines the freshness operations the indexing
//! pipeline needs, enabling pluggable backends (SQLite on disk, in-memory
//! for tests and embedded use).
//!
//! The governing rule: a file is re-analyzed exactly when its content hash
//! differs from the cached one. Paths are compared as given; callers pass
//! the relative path of each file under the content root. Corrupt cache
//! state never aborts a run, it degrades to recomputation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use sqlx::{Row, SqlitePool};
use tokio::sync::RwLock;

use crate::db;
use crate::models::Analysis;

/// Hex-encoded SHA-256 of the file content.
pub fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Result of comparing the current file listing against the cache.
///
/// Computed from paths alone, without re-hashing content; a path present
/// on both sides lands in `unchanged` even if its content moved on.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheDiff {
    pub added: Vec<String>,
    pub unchanged: Vec<String>,
    pub deleted: Vec<String>,
}

/// Summary of cache state, reported by `cdx stats`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub total_files: usize,
    /// On-disk size in bytes; zero for the in-memory backend.
    pub cache_size: u64,
    pub oldest_entry: Option<String>,
    pub newest_entry: Option<String>,
}

/// Abstract cache backend.
///
/// All operations are async (via `async-trait`); the in-memory
/// implementation returns immediately-ready futures.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Has this file changed since its analysis was cached? `true` for
    /// unknown paths.
    async fn check_changed(&self, path: &str, content_hash: &str) -> Result<bool>;

    /// Persist the analysis for a file, replacing any previous entry.
    async fn save(&self, path: &str, content_hash: &str, analysis: &Analysis) -> Result<()>;

    /// Fetch the cached analysis for a path, or `None` when absent or
    /// unreadable.
    async fn get_cached(&self, path: &str) -> Result<Option<Analysis>>;

    /// Compare the given current paths against every cached path.
    async fn diff(&self, current: &[String]) -> Result<CacheDiff>;

    /// Drop cache entries for paths no longer present. Returns how many
    /// were removed.
    async fn prune(&self, current: &[String]) -> Result<usize>;

    async fn stats(&self) -> Result<CacheStats>;

    /// Remove every entry.
    async fn clear(&self) -> Result<()>;
}

fn sorted(mut paths: Vec<String>) -> Vec<String> {
    paths.sort();
    paths
}

/// SQLite-backed cache. One row per file, upserted on save.
pub struct SqliteCache {
    pool: SqlitePool,
    db_path: PathBuf,
}

impl SqliteCache {
    pub async fn open(db_path: &Path) -> Result<Self> {
        let pool = db::connect(db_path).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS file_cache (
                path TEXT PRIMARY KEY,
                content_hash TEXT NOT NULL,
                analysis_json TEXT NOT NULL,
                analyzed_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self {
            pool,
            db_path: db_path.to_path_buf(),
        })
    }

    async fn cached_paths(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT path FROM file_cache")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(|r| r.get("path")).collect())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl CacheStore for SqliteCache {
    async fn check_changed(&self, path: &str, content_hash: &str) -> Result<bool> {
        let cached: Option<String> =
            sqlx::query_scalar("SELECT content_hash FROM file_cache WHERE path = ?")
                .bind(path)
                .fetch_optional(&self.pool)
                .await?;

        Ok(cached.as_deref() != Some(content_hash))
    }

    async fn save(&self, path: &str, content_hash: &str, analysis: &Analysis) -> Result<()> {
        let analysis_json = serde_json::to_string(analysis)?;
        sqlx::query(
            r#"
            INSERT INTO file_cache (path, content_hash, analysis_json, analyzed_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(path) DO UPDATE SET
                content_hash = excluded.content_hash,
                analysis_json = excluded.analysis_json,
                analyzed_at = excluded.analyzed_at
            "#,
        )
        .bind(path)
        .bind(content_hash)
        .bind(analysis_json)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_cached(&self, path: &str) -> Result<Option<Analysis>> {
        let json: Option<String> =
            sqlx::query_scalar("SELECT analysis_json FROM file_cache WHERE path = ?")
                .bind(path)
                .fetch_optional(&self.pool)
                .await?;

        let Some(json) = json else {
            return Ok(None);
        };

        match serde_json::from_str(&json) {
            Ok(analysis) => Ok(Some(analysis)),
            Err(e) => {
                eprintln!("Warning: corrupt cache entry for {}: {}", path, e);
                Ok(None)
            }
        }
    }

    async fn diff(&self, current: &[String]) -> Result<CacheDiff> {
        let cached = self.cached_paths().await?;
        Ok(diff_paths(current, &cached))
    }

    async fn prune(&self, current: &[String]) -> Result<usize> {
        let diff = self.diff(current).await?;
        for path in &diff.deleted {
            sqlx::query("DELETE FROM file_cache WHERE path = ?")
                .bind(path)
                .execute(&self.pool)
                .await?;
        }
        Ok(diff.deleted.len())
    }

    async fn stats(&self) -> Result<CacheStats> {
        let total_files: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM file_cache")
            .fetch_one(&self.pool)
            .await?;
        let oldest_entry: Option<String> =
            sqlx::query_scalar("SELECT MIN(analyzed_at) FROM file_cache")
                .fetch_one(&self.pool)
                .await?;
        let newest_entry: Option<String> =
            sqlx::query_scalar("SELECT MAX(analyzed_at) FROM file_cache")
                .fetch_one(&self.pool)
                .await?;

        let cache_size = std::fs::metadata(&self.db_path)
            .map(|m| m.len())
            .unwrap_or(0);

        Ok(CacheStats {
            total_files: total_files as usize,
            cache_size,
            oldest_entry,
            newest_entry,
        })
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM file_cache")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(Clone)]
struct MemoryEntry {
    content_hash: String,
    analysis: Analysis,
    analyzed_at: String,
}

/// In-memory cache with the same semantics as the SQLite backend minus
/// persistence. Useful for tests and embedded callers that do not want a
/// database file.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn check_changed(&self, path: &str, content_hash: &str) -> Result<bool> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(path)
            .map_or(true, |e| e.content_hash != content_hash))
    }

    async fn save(&self, path: &str, content_hash: &str, analysis: &Analysis) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(
            path.to_string(),
            MemoryEntry {
                content_hash: content_hash.to_string(),
                analysis: analysis.clone(),
                analyzed_at: Utc::now().to_rfc3339(),
            },
        );
        Ok(())
    }

    async fn get_cached(&self, path: &str) -> Result<Option<Analysis>> {
        let entries = self.entries.read().await;
        Ok(entries.get(path).map(|e| e.analysis.clone()))
    }

    async fn diff(&self, current: &[String]) -> Result<CacheDiff> {
        let entries = self.entries.read().await;
        let cached: Vec<String> = entries.keys().cloned().collect();
        Ok(diff_paths(current, &cached))
    }

    async fn prune(&self, current: &[String]) -> Result<usize> {
        let diff = self.diff(current).await?;
        let mut entries = self.entries.write().await;
        for path in &diff.deleted {
            entries.remove(path);
        }
        Ok(diff.deleted.len())
    }

    async fn stats(&self) -> Result<CacheStats> {
        let entries = self.entries.read().await;
        let mut timestamps: Vec<&String> = entries.values().map(|e| &e.analyzed_at).collect();
        timestamps.sort();

        Ok(CacheStats {
            total_files: entries.len(),
            cache_size: 0,
            oldest_entry: timestamps.first().map(|s| s.to_string()),
            newest_entry: timestamps.last().map(|s| s.to_string()),
        })
    }

    async fn clear(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

fn diff_paths(current: &[String], cached: &[String]) -> CacheDiff {
    let current_set: std::collections::HashSet<&str> =
        current.iter().map(String::as_str).collect();
    let cached_set: std::collections::HashSet<&str> = cached.iter().map(String::as_str).collect();

    CacheDiff {
        added: sorted(
            current
                .iter()
                .filter(|p| !cached_set.contains(p.as_str()))
                .cloned()
                .collect(),
        ),
        unchanged: sorted(
            current
                .iter()
                .filter(|p| cached_set.contains(p.as_str()))
                .cloned()
                .collect(),
        ),
        deleted: sorted(
            cached
                .iter()
                .filter(|p| !current_set.contains(p.as_str()))
                .cloned()
                .collect(),
        ),
    }
}

/*!
 * Durable translation cache with amortized-batch LRU eviction.
 *
 * Maps (source language key, target language, source text) to a translated
 * text. Lookups refresh the last-used timestamp; writes are upserts followed
 * by an eviction check that trims the oldest entries in batches rather than
 * per insert, bounding write amplification under high insert rates.
 *
 * Cache failures are never fatal: a lookup error degrades to a miss and a
 * write error is logged and swallowed, so callers fall through to the
 * backend either way.
 */

use chrono::{SecondsFormat, Utc};
use log::{debug, info, warn};
use parking_lot::Mutex;
use rusqlite::{params, OptionalExtension};
use std::path::Path;

use crate::app_config::CacheConfig;
use crate::cache::connection::CacheConnection;

/// Cache statistics for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached entries
    pub total_entries: usize,
    /// Database file size in bytes
    pub db_size_bytes: u64,
    /// Configured entry limit
    pub max_entries: usize,
}

/// Thread-safe translation cache with LRU eviction and size limits
#[derive(Clone)]
pub struct TranslationCache {
    conn: CacheConnection,
    config: CacheConfig,
    // Serializes the eviction check-and-delete sequence so two writers
    // cannot both count, both decide to delete, and overshoot.
    eviction_lock: std::sync::Arc<Mutex<()>>,
}

impl TranslationCache {
    /// Open the cache at the path from the configuration, or the per-user
    /// default location when none is set.
    pub fn open(config: CacheConfig) -> anyhow::Result<Self> {
        let conn = match &config.db_path {
            Some(path) => CacheConnection::new(path)?,
            None => CacheConnection::new_default()?,
        };
        Ok(Self::with_connection(conn, config))
    }

    /// Open the cache at an explicit path.
    pub fn open_at<P: AsRef<Path>>(path: P, config: CacheConfig) -> anyhow::Result<Self> {
        Ok(Self::with_connection(CacheConnection::new(path)?, config))
    }

    /// Create an in-memory cache (for testing).
    pub fn new_in_memory(config: CacheConfig) -> anyhow::Result<Self> {
        Ok(Self::with_connection(
            CacheConnection::new_in_memory()?,
            config,
        ))
    }

    fn with_connection(conn: CacheConnection, config: CacheConfig) -> Self {
        Self {
            conn,
            config,
            eviction_lock: std::sync::Arc::new(Mutex::new(())),
        }
    }

    /// Canonical source-language key: the hint, or "auto", lower-cased.
    pub fn source_key(source_lang: Option<&str>) -> String {
        source_lang.unwrap_or("auto").to_lowercase()
    }

    /// Get a cached translation and refresh its last-used timestamp.
    ///
    /// Any I/O failure is reported as a miss.
    pub fn get(&self, src: &str, tgt: &str, text: &str) -> Option<String> {
        let result = self.conn.execute(|conn| {
            let row: Option<String> = conn
                .query_row(
                    "SELECT result FROM translations WHERE src=?1 AND tgt=?2 AND text=?3",
                    params![src, tgt, text],
                    |row| row.get(0),
                )
                .optional()?;

            if row.is_some() {
                conn.execute(
                    "UPDATE translations SET last_used_at=?1 WHERE src=?2 AND tgt=?3 AND text=?4",
                    params![now_timestamp(), src, tgt, text],
                )?;
            }

            Ok(row)
        });

        match result {
            Ok(row) => row,
            Err(e) => {
                debug!("Cache lookup failed, treating as miss: {}", e);
                None
            }
        }
    }

    /// Cache a translation (upsert) and run the eviction check.
    ///
    /// Write failures are logged and swallowed.
    pub fn put(&self, src: &str, tgt: &str, text: &str, result: &str) {
        let write = self.conn.execute(|conn| {
            let now = now_timestamp();
            conn.execute(
                r#"
                INSERT INTO translations (src, tgt, text, result, created_at, last_used_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                ON CONFLICT(src, tgt, text) DO UPDATE SET
                    result=excluded.result,
                    last_used_at=excluded.last_used_at
                "#,
                params![src, tgt, text, result, now],
            )?;
            Ok(())
        });

        if let Err(e) = write {
            warn!("Cache write failed, continuing without caching: {}", e);
            return;
        }

        self.cleanup_if_needed();
    }

    /// Get cache statistics for monitoring.
    pub fn stats(&self) -> anyhow::Result<CacheStats> {
        let total_entries = self.entry_count()?;
        Ok(CacheStats {
            total_entries,
            db_size_bytes: self.conn.file_size_bytes(),
            max_entries: self.config.max_entries,
        })
    }

    fn entry_count(&self) -> anyhow::Result<usize> {
        self.conn.execute(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM translations", [], |row| {
                row.get(0)
            })?;
            Ok(count as usize)
        })
    }

    /// Remove the oldest entries when the cache exceeds its size limit.
    ///
    /// The batch size is clamped so a pass never removes more than needed to
    /// get back under the limit with one batch of headroom.
    fn cleanup_if_needed(&self) {
        let _guard = self.eviction_lock.lock();

        let count = match self.entry_count() {
            Ok(count) => count,
            Err(e) => {
                debug!("Cache eviction count failed: {}", e);
                return;
            }
        };

        if count <= self.config.max_entries {
            return;
        }

        let entries_to_remove = self
            .config
            .cleanup_batch
            .min(count - self.config.max_entries + self.config.cleanup_batch);

        let deleted = self.conn.execute(|conn| {
            let deleted = conn.execute(
                r#"
                DELETE FROM translations WHERE id IN (
                    SELECT id FROM translations ORDER BY last_used_at ASC LIMIT ?1
                )
                "#,
                params![entries_to_remove as i64],
            )?;
            Ok(deleted)
        });

        match deleted {
            Ok(deleted) => info!(
                "Cache cleanup: removed {} entries (was {}, limit {})",
                deleted, count, self.config.max_entries
            ),
            Err(e) => warn!("Cache eviction failed: {}", e),
        }
    }
}

/// Fixed-width UTC timestamp so lexicographic ordering matches time order.
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/*!
 * Cache database connection management.
 *
 * Handles SQLite connection creation, schema initialization and thread-safe
 * access. WAL journal mode keeps concurrent readers and writers from
 * different pipeline runs safe without caller-side locking.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Default database filename
const DEFAULT_DB_FILENAME: &str = "translations.db";

/// Default database directory name under the user's data directory
const DEFAULT_DB_DIRNAME: &str = "laytrans";

/// Cache connection wrapper with thread-safe access
#[derive(Clone)]
pub struct CacheConnection {
    /// Path to the database file
    db_path: PathBuf,
    /// Thread-safe connection wrapped in Arc<Mutex>
    connection: Arc<Mutex<Connection>>,
}

impl CacheConnection {
    /// Create a connection at the default per-user location.
    pub fn new_default() -> Result<Self> {
        let db_path = Self::default_database_path()?;
        Self::new(&db_path)
    }

    /// Create a connection at the specified path.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create cache directory: {:?}", parent))?;
        }

        info!("Opening translation cache at: {:?}", db_path);

        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open cache database: {:?}", db_path))?;

        initialize_schema(&conn)?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database (for testing).
    pub fn new_in_memory() -> Result<Self> {
        debug!("Creating in-memory cache database");

        let conn = Connection::open_in_memory().context("Failed to create in-memory database")?;

        initialize_schema(&conn)?;

        Ok(Self {
            db_path: PathBuf::from(":memory:"),
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the default database path under the user's data directory.
    pub fn default_database_path() -> Result<PathBuf> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

        Ok(base_dir.join(DEFAULT_DB_DIRNAME).join(DEFAULT_DB_FILENAME))
    }

    /// Get the database file path.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Size of the database file in bytes; 0 for in-memory databases.
    pub fn file_size_bytes(&self) -> u64 {
        if self.db_path.to_string_lossy() == ":memory:" {
            return 0;
        }
        std::fs::metadata(&self.db_path).map(|m| m.len()).unwrap_or(0)
    }

    /// Execute a database operation with the connection.
    pub fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .connection
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to acquire cache lock: {}", e))?;

        f(&conn)
    }
}

/// Initialize the cache schema.
///
/// WAL mode is enabled first so concurrent readers never block on a writer.
fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS translations(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            src TEXT NOT NULL,
            tgt TEXT NOT NULL,
            text TEXT NOT NULL,
            result TEXT NOT NULL,
            created_at TEXT NOT NULL,
            last_used_at TEXT NOT NULL,
            UNIQUE (src, tgt, text)
        );

        CREATE INDEX IF NOT EXISTS idx_last_used ON translations(last_used_at);
        "#,
    )?;

    Ok(())
}

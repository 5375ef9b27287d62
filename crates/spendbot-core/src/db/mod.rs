//! Database access layer with connection pooling
//!
//! - `expenses` - Expense inserts and the two read queries
//!
//! Every operation checks a connection out of the pool and returns it when
//! the operation ends. Nothing holds a connection between requests.

use std::sync::Arc;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::debug;

use crate::error::Result;

mod expenses;


pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Upper bound on pooled connections. Commands are handled one at a time,
/// so this only matters when the CLI and the bot share a file.
const POOL_SIZE: u32 = 4;

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
    /// Owning directory for throwaway databases, removed with the last clone
    _temp_dir: Option<Arc<tempfile::TempDir>>,
}

impl Database {
    /// Open (creating if needed) the database file and make sure the schema exists
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(POOL_SIZE).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
            _temp_dir: None,
        };
        db.ensure_schema()?;

        debug!("Opened expense database at {}", path);
        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a file in a temporary directory rather than `:memory:`
    /// because every pooled connection to `:memory:` would see its own empty
    /// database. The directory, including the `-wal`/`-shm` sidecars, is
    /// deleted when the last clone of the handle is dropped.
    pub fn in_memory() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("spendbot_test_").tempdir()?;
        let path = dir.path().join("expenses.db");

        let mut db = Self::new(&path.to_string_lossy())?;
        db._temp_dir = Some(Arc::new(dir));
        Ok(db)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Create the expenses table if it does not exist yet
    ///
    /// Idempotent; safe to call on every startup and before every insert.
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block the writer
            -- Note: creates -wal and -shm sidecar files alongside the database
            PRAGMA journal_mode = WAL;

            CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY,
                date TEXT,
                category TEXT,
                amount REAL,
                description TEXT
            );
            "#,
        )?;

        Ok(())
    }
}

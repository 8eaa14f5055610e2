use rusqlite::Connection;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

use super::CacheError;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// Lazily opened SQLite handle for the local snapshot cache.
pub struct Database {
    path: PathBuf,
    conn: RefCell<Option<Connection>>,
}

impl Database {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            conn: RefCell::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the connection on first use and runs `f(conn)`.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, CacheError>
    where
        F: FnOnce(&mut Connection) -> Result<T, CacheError>,
    {
        let mut slot = self.conn.borrow_mut();
        let conn = match &mut *slot {
            Some(conn) => conn,
            empty => empty.insert(Connection::open(&self.path)?),
        };
        f(conn)
    }
}

/// Applies the bundled schema.
pub fn init_db(db: &Database) -> Result<(), CacheError> {
    db.with_conn(|conn| {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    })?;

    tracing::debug!(path = %db.path().display(), "✅ Snapshot cache initialized");
    Ok(())
}

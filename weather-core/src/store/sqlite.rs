use parking_lot::Mutex;
use rusqlite::{Connection, ErrorCode, params};
use std::path::Path;
use tracing::debug;

use super::CityStore;
use crate::error::StoreError;

/// SQLite-backed store with a `UNIQUE` constraint on the city name.
pub struct SqliteCityStore {
    conn: Mutex<Connection>,
}

impl SqliteCityStore {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        debug!(path = %path.display(), "opening city database");
        Self::with_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS city (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            );
            "#,
        )?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

impl std::fmt::Debug for SqliteCityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteCityStore").finish_non_exhaustive()
    }
}

impl CityStore for SqliteCityStore {
    fn insert(&self, name: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        match conn.execute("INSERT INTO city (name) VALUES (?1)", params![name]) {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StoreError::UniqueViolation(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, name: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock();
        let rows = conn.execute("DELETE FROM city WHERE name = ?1", params![name])?;
        Ok(rows > 0)
    }

    fn contains(&self, name: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM city WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT name FROM city")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute_batch("DELETE FROM city;")?;
        Ok(())
    }
}

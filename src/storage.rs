use crate::dlog;
use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use std::path::Path;

/// Opaque key-value persistence. Values are whole snapshots; `set` replaces
/// whatever was stored before.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened workout store");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        if !table_exists(&conn, "kv")? {
            dlog!("creating kv table");
        }
        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS kv (
              key    TEXT PRIMARY KEY,
              value  TEXT NOT NULL
            );
            ",
        )?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO kv (key, value) VALUES (?1, ?2)
            ON CONFLICT (key) DO UPDATE SET value = excluded.value
            ",
            params![key, value],
        )?;
        dlog!("stored key={key} bytes={}", value.len());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let n = self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        dlog!("removed key={key} rows={n}");
        Ok(())
    }
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1 LIMIT 1")?;
    let mut rows = stmt.query([table])?;
    Ok(rows.next()?.is_some())
}

/// Process-local storage; contents vanish with the value.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_set_overwrites() {
        let mut s = SqliteStorage::open_in_memory().unwrap();
        assert_eq!(s.get("save-workout").unwrap(), None);

        s.set("save-workout", "[1]").unwrap();
        s.set("save-workout", "[1,2]").unwrap();
        assert_eq!(s.get("save-workout").unwrap().as_deref(), Some("[1,2]"));

        s.remove("save-workout").unwrap();
        assert_eq!(s.get("save-workout").unwrap(), None);
    }

    #[test]
    fn sqlite_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("waymark.sqlite");

        {
            let mut s = SqliteStorage::open(&path).unwrap();
            s.set("k", "v").unwrap();
        }

        let s = SqliteStorage::open(&path).unwrap();
        assert_eq!(s.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn memory_remove_missing_key_is_ok() {
        let mut s = MemoryStorage::default();
        s.remove("nothing").unwrap();
        s.set("a", "b").unwrap();
        assert_eq!(s.get("a").unwrap().as_deref(), Some("b"));
    }
}

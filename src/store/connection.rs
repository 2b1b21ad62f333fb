use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
pub(crate) const DATA_DIR_NAME: &str = ".onsong-library";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "library.sqlite";

/// Ensure the database file exists, create the key-value table if needed, and
/// return a live connection.
pub fn ensure_schema(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }
    }

    let conn = Connection::open(db_path).context("failed to open SQLite database")?;
    create_tables(&conn)?;
    Ok(conn)
}

pub(crate) fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create kv_store table")?;
    Ok(())
}

/// Resolve the application data directory inside the user's home.
pub(crate) fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

/// Absolute path to the SQLite database used when the config does not name one.
pub fn default_db_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_schema_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("library.sqlite");

        let conn = ensure_schema(&path).unwrap();

        assert!(path.exists());
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_store'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn ensure_schema_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.sqlite");

        drop(ensure_schema(&path).unwrap());
        assert!(ensure_schema(&path).is_ok());
    }
}

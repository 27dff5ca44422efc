use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::info;

use crate::error::StoreError;

/// Where the store keeps its rows. In-memory databases exist for tests; closing
/// one discards its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Location {
    File(PathBuf),
    Memory,
}

impl Location {
    pub(crate) fn describe(&self) -> String {
        match self {
            Location::File(path) => path.display().to_string(),
            Location::Memory => ":memory:".to_string(),
        }
    }
}

/// Open the database, creating the parent directory of an on-disk file first,
/// and make sure the `agenda` table exists.
pub(crate) fn open(location: &Location) -> Result<Connection, StoreError> {
    let conn = match location {
        Location::File(path) => {
            ensure_parent_dir(path)?;
            Connection::open(path).map_err(|source| StoreError::Open {
                path: path.clone(),
                source,
            })?
        }
        Location::Memory => Connection::open_in_memory().map_err(|source| StoreError::Open {
            path: PathBuf::from(":memory:"),
            source,
        })?,
    };

    ensure_schema(&conn)?;
    info!(location = %location.describe(), "agenda database connected");
    Ok(conn)
}

/// Create the `agenda` table and its ordering index if they are missing.
/// `title` and `scheduled_at` are the only required columns.
pub(crate) fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS agenda (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            scheduled_at TEXT NOT NULL,
            priority TEXT
        );
        CREATE INDEX IF NOT EXISTS agenda_scheduled_at ON agenda (scheduled_at);",
    )
    .map_err(StoreError::Schema)
}

fn ensure_parent_dir(path: &Path) -> Result<(), StoreError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| StoreError::DataDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

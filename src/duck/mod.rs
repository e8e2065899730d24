use anyhow::{Context, Result};
use duckdb::{params, AccessMode, Config, Connection};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

/// Path value that selects an in-memory database instead of a file.
pub const IN_MEMORY: &str = ":memory:";

pub fn is_in_memory(path: &Path) -> bool {
    path.as_os_str() == IN_MEMORY
}

/// Open the target database, optionally dropping it first.
///
/// With `recreate`, an existing database file and its write-ahead log are
/// deleted before the connection is opened, so nothing from a previous run
/// survives. `Connection::open` creates the file if it doesn't exist.
pub fn open_database(path: &Path, recreate: bool) -> Result<Connection> {
    if is_in_memory(path) {
        return open_mem_db();
    }

    if recreate {
        drop_database(path)?;
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating database directory {}", parent.display()))?;
    }

    open_disk_db(path)
}

/// Remove a database file and its WAL. Missing files are not an error.
pub fn drop_database(path: &Path) -> Result<()> {
    for p in [path.to_path_buf(), wal_path(path)] {
        if p.exists() {
            fs::remove_file(&p).with_context(|| format!("dropping database file {}", p.display()))?;
            info!(path = %p.display(), "dropped existing database file");
        }
    }
    Ok(())
}

fn wal_path(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(".wal");
    PathBuf::from(s)
}

/// Open a DuckDB database on disk at `path`, creating the file if it doesn't exist.
pub fn open_disk_db(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("opening database {}", path.display()))?;
    Ok(conn)
}

/// Open an existing database file without write access.
pub fn open_read_only(path: &Path) -> Result<Connection> {
    let config = Config::default().access_mode(AccessMode::ReadOnly)?;
    let conn = Connection::open_with_flags(path, config)
        .with_context(|| format!("opening database {} read-only", path.display()))?;
    Ok(conn)
}

/// Open a DuckDB in‐memory database
pub fn open_mem_db() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("opening in-memory database")?;
    Ok(conn)
}

/// Catalog lookup for a table, ignoring identifier case.
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let n: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE lower(table_name) = lower(?)",
            params![table],
            |r| r.get(0),
        )
        .with_context(|| format!("looking up table {}", table))?;
    Ok(n > 0)
}

pub fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM \"{}\"", table);
    conn.query_row(&sql, [], |r| r.get(0))
        .with_context(|| format!("counting rows in {}", table))
}

//! Movie store trait and SQLite implementation.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::record::{self, join_cast, COLUMNS};
use crate::error::{FeedError, FeedResult};
use crate::movies::types::Movie;

/// Trait for movie list persistence backends.
pub trait MovieStore: Send + Sync {
  /// Replace the stored list with `movies`, keeping their order.
  fn replace_all(&self, movies: &[Movie]) -> FeedResult<()>;

  /// Load the stored list in the order it was written.
  fn load_all(&self) -> FeedResult<Vec<Movie>>;

  /// When the stored list was last written, if ever.
  fn cached_at(&self) -> FeedResult<Option<DateTime<Utc>>>;
}

/// Store that doesn't persist anything.
/// Used when caching is disabled - all operations are no-ops.
pub struct NoopStore;

impl MovieStore for NoopStore {
  fn replace_all(&self, _movies: &[Movie]) -> FeedResult<()> {
    Ok(()) // Discard
  }

  fn load_all(&self) -> FeedResult<Vec<Movie>> {
    Ok(Vec::new()) // Always empty
  }

  fn cached_at(&self) -> FeedResult<Option<DateTime<Utc>>> {
    Ok(None)
  }
}

/// SQLite-based movie store.
pub struct SqliteStore {
  conn: Mutex<Connection>,
}

impl SqliteStore {
  /// Open the store at `path`, or at the default location when `None`.
  pub fn open(path: Option<&Path>) -> Result<Self> {
    let path = match path {
      Some(p) => p.to_path_buf(),
      None => Self::default_path()?,
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create cache directory: {}", e))?;
    }

    let conn = Connection::open(&path)
      .map_err(|e| eyre!("Failed to open cache database at {}: {}", path.display(), e))?;

    let store = Self {
      conn: Mutex::new(conn),
    };
    store.run_migrations()?;

    Ok(store)
  }

  /// Get the default database path.
  pub fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("marquee").join("cache.db"))
  }

  fn run_migrations(&self) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute_batch(CACHE_SCHEMA)
      .map_err(|e| eyre!("Failed to run cache migrations: {}", e))?;

    Ok(())
  }

  fn lock(&self) -> FeedResult<std::sync::MutexGuard<'_, Connection>> {
    self.conn.lock().map_err(|_| FeedError::LockPoisoned)
  }
}

const CACHE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS movies (
    position INTEGER PRIMARY KEY,
    imdb_id TEXT NOT NULL,
    title TEXT NOT NULL,
    year TEXT NOT NULL,
    runtime TEXT NOT NULL,
    cast_members TEXT NOT NULL,
    cached_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

impl MovieStore for SqliteStore {
  fn replace_all(&self, movies: &[Movie]) -> FeedResult<()> {
    let conn = self.lock()?;
    let tx = conn.unchecked_transaction()?;

    tx.execute("DELETE FROM movies", [])?;

    {
      let mut stmt = tx.prepare(&format!(
        "INSERT INTO movies (position, {}, cached_at) VALUES (?, ?, ?, ?, ?, ?, datetime('now'))",
        COLUMNS
      ))?;

      for (position, movie) in movies.iter().enumerate() {
        stmt.execute(params![
          position as i64,
          movie.id,
          movie.title,
          movie.year,
          movie.runtime,
          join_cast(&movie.cast),
        ])?;
      }
    }

    tx.commit()?;
    Ok(())
  }

  fn load_all(&self) -> FeedResult<Vec<Movie>> {
    let conn = self.lock()?;
    let mut stmt = conn.prepare(&format!(
      "SELECT {} FROM movies ORDER BY position",
      COLUMNS
    ))?;

    let movies = stmt
      .query_map([], record::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(movies)
  }

  fn cached_at(&self) -> FeedResult<Option<DateTime<Utc>>> {
    let conn = self.lock()?;
    let latest: Option<String> =
      conn.query_row("SELECT MAX(cached_at) FROM movies", [], |row| row.get(0))?;

    Ok(latest.as_deref().and_then(parse_datetime))
  }
}

/// Parse a datetime string from SQLite format ("YYYY-MM-DD HH:MM:SS").
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
  chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
    .map(|dt| dt.and_utc())
    .ok()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::movies::types::movie;
  use pretty_assertions::assert_eq;
  use tempfile::TempDir;

  fn temp_store() -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(Some(dir.path().join("nested").join("cache.db").as_path())).unwrap();
    (dir, store)
  }

  fn full_eq(a: &[Movie], b: &[Movie]) {
    let key = |m: &Movie| (m.id.clone(), m.title.clone(), m.year.clone(), m.runtime.clone(), m.cast.clone());
    assert_eq!(
      a.iter().map(key).collect::<Vec<_>>(),
      b.iter().map(key).collect::<Vec<_>>()
    );
  }

  #[test]
  fn test_empty_store_loads_nothing() {
    let (_dir, store) = temp_store();
    assert!(store.load_all().unwrap().is_empty());
    assert_eq!(store.cached_at().unwrap(), None);
  }

  #[test]
  fn test_round_trip_keeps_records_and_cast_order() {
    let (_dir, store) = temp_store();
    let movies = vec![
      movie("tt2", "Second", &["Zed", "Amy", "Bob"]),
      movie("tt1", "First", &[]),
      movie("tt3", "Third", &["Solo"]),
    ];

    store.replace_all(&movies).unwrap();

    full_eq(&store.load_all().unwrap(), &movies);
    assert!(store.cached_at().unwrap().is_some());
  }

  #[test]
  fn test_replace_all_discards_previous_list() {
    let (_dir, store) = temp_store();
    store
      .replace_all(&[movie("tt1", "Old", &["A"]), movie("tt2", "Older", &["B"])])
      .unwrap();

    let fresh = vec![movie("tt9", "New", &["C"])];
    store.replace_all(&fresh).unwrap();

    full_eq(&store.load_all().unwrap(), &fresh);
  }

  #[test]
  fn test_reopen_reads_persisted_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");
    let movies = vec![movie("tt1", "Kept", &["A", "B"])];

    SqliteStore::open(Some(path.as_path()))
      .unwrap()
      .replace_all(&movies)
      .unwrap();

    let reopened = SqliteStore::open(Some(path.as_path())).unwrap();
    full_eq(&reopened.load_all().unwrap(), &movies);
  }

  #[test]
  fn test_noop_store_forgets_everything() {
    let store = NoopStore;
    store.replace_all(&[movie("tt1", "Gone", &[])]).unwrap();
    assert!(store.load_all().unwrap().is_empty());
    assert_eq!(store.cached_at().unwrap(), None);
  }

  #[test]
  fn test_parse_datetime() {
    assert!(parse_datetime("2024-03-01 12:30:00").is_some());
    assert!(parse_datetime("yesterday").is_none());
  }
}

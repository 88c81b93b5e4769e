//! Row shape of a persisted movie.

use crate::movies::types::Movie;
use rusqlite::Row;

/// Separator used to flatten the cast into a single column.
pub const CAST_SEPARATOR: &str = ", ";

/// Flatten a cast list into the stored column value.
pub fn join_cast(cast: &[String]) -> String {
  cast.join(CAST_SEPARATOR)
}

/// Split a stored cast column back into names.
///
/// An empty column is an empty cast, not a cast with one empty name.
pub fn split_cast(stored: &str) -> Vec<String> {
  if stored.is_empty() {
    return Vec::new();
  }
  stored.split(CAST_SEPARATOR).map(String::from).collect()
}

/// Column list shared by inserts and selects, in `from_row` order.
pub(super) const COLUMNS: &str = "imdb_id, title, year, runtime, cast_members";

pub(super) fn from_row(row: &Row<'_>) -> rusqlite::Result<Movie> {
  let cast: String = row.get(4)?;
  Ok(Movie {
    id: row.get(0)?,
    title: row.get(1)?,
    year: row.get(2)?,
    runtime: row.get(3)?,
    cast: split_cast(&cast),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_join_uses_comma_space() {
    let cast = vec!["Keanu Reeves".to_string(), "Carrie-Anne Moss".to_string()];
    assert_eq!(join_cast(&cast), "Keanu Reeves, Carrie-Anne Moss");
  }

  #[test]
  fn test_split_keeps_order() {
    assert_eq!(split_cast("B, A, C"), vec!["B", "A", "C"]);
  }

  #[test]
  fn test_empty_cast_round_trips() {
    assert_eq!(join_cast(&[]), "");
    assert!(split_cast("").is_empty());
  }

  #[test]
  fn test_single_name_with_inner_comma_is_lossy() {
    // Only names without the separator survive the flattening
    let cast = vec!["Smith, Jr.".to_string()];
    assert_eq!(split_cast(&join_cast(&cast)), vec!["Smith", "Jr."]);
  }
}

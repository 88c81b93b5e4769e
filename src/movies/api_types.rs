//! Serde-deserializable types matching the movie feed.
//!
//! Kept apart from [`Movie`] so the wire casing stays out of the rest of the app.

use serde::Deserialize;

use super::types::Movie;

#[derive(Debug, Deserialize)]
pub struct ApiMovie {
  #[serde(rename = "Title")]
  pub title: String,
  #[serde(rename = "Year")]
  pub year: String,
  #[serde(rename = "Runtime")]
  pub runtime: String,
  #[serde(rename = "Cast", default)]
  pub cast: Vec<String>,
  #[serde(rename = "imdbID")]
  pub imdb_id: String,
}

/// One page of the feed: `{ "movies": [...] }`
#[derive(Debug, Deserialize)]
pub struct ApiMoviePage {
  pub movies: Vec<ApiMovie>,
}

impl From<ApiMovie> for Movie {
  fn from(api: ApiMovie) -> Self {
    Movie {
      id: api.imdb_id,
      title: api.title,
      year: api.year,
      runtime: api.runtime,
      cast: api.cast,
    }
  }
}

impl ApiMoviePage {
  pub fn into_movies(self) -> Vec<Movie> {
    self.movies.into_iter().map(Movie::from).collect()
  }
}

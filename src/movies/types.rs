/// A single movie as shown in the list.
///
/// Two movies are the same movie when their IMDb ids match, regardless of the
/// other fields.
#[derive(Debug, Clone, Eq)]
pub struct Movie {
  pub id: String,
  pub title: String,
  pub year: String,
  pub runtime: String,
  pub cast: Vec<String>,
}

impl PartialEq for Movie {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl std::hash::Hash for Movie {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

#[cfg(test)]
pub(crate) fn movie(id: &str, title: &str, cast: &[&str]) -> Movie {
  Movie {
    id: id.to_string(),
    title: title.to_string(),
    year: "2001".to_string(),
    runtime: "120 min".to_string(),
    cast: cast.iter().map(|c| c.to_string()).collect(),
  }
}

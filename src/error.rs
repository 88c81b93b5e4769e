use thiserror::Error;

/// Failures at the feed and store boundary.
///
/// The pager catches every one of these where it happens, logs it, and leaves
/// the movie list untouched.
#[derive(Error, Debug)]
pub enum FeedError {
  #[error("Failed to reach movie feed: {0}")]
  Network(#[from] reqwest::Error),

  #[error("Movie feed returned HTTP {status} for page {page}")]
  Status { page: u32, status: u16 },

  #[error("Failed to decode page {page}: {source}")]
  Decode {
    page: u32,
    #[source]
    source: serde_json::Error,
  },

  #[error("Invalid feed URL: {0}")]
  InvalidUrl(#[from] url::ParseError),

  #[error("Movie cache error: {0}")]
  Persistence(#[from] rusqlite::Error),

  #[error("Movie cache lock poisoned")]
  LockPoisoned,
}

impl FeedError {
  /// Short label used in the list title when a load fails.
  pub fn kind(&self) -> &'static str {
    match self {
      FeedError::Network(_) | FeedError::Status { .. } | FeedError::InvalidUrl(_) => "network",
      FeedError::Decode { .. } => "decode",
      FeedError::Persistence(_) | FeedError::LockPoisoned => "cache",
    }
  }
}

pub type FeedResult<T> = std::result::Result<T, FeedError>;

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use crate::movies::api_types::ApiMoviePage;
use crate::movies::types::Movie;
use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Anything that can hand out one page of movies at a time.
#[async_trait]
pub trait PageSource: Send + Sync {
  /// Fetch page `page` (1-based) of the feed.
  async fn fetch_page(&self, page: u32) -> FeedResult<Vec<Movie>>;

  /// Human-readable location of the feed, shown in the header.
  fn describe(&self) -> String;
}

/// HTTP client for the paged movie feed at `{base}/{page}.json`
#[derive(Clone)]
pub struct MovieClient {
  client: reqwest::Client,
  base_url: Url,
}

impl MovieClient {
  pub fn new(config: &FeedConfig) -> Result<Self> {
    Self::with_timeout(&config.base_url, Duration::from_secs(config.timeout_secs))
  }

  pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
    let mut base_url =
      Url::parse(base_url).map_err(|e| eyre!("Invalid feed URL {}: {}", base_url, e))?;

    // Url::join drops the last segment unless the path ends with a slash
    if !base_url.path().ends_with('/') {
      let path = format!("{}/", base_url.path());
      base_url.set_path(&path);
    }

    let client = reqwest::Client::builder()
      .timeout(timeout)
      .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { client, base_url })
  }

  /// URL of the given page
  pub fn page_url(&self, page: u32) -> FeedResult<Url> {
    Ok(self.base_url.join(&format!("{}.json", page))?)
  }

  pub fn host(&self) -> Option<&str> {
    self.base_url.host_str()
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }
}

#[async_trait]
impl PageSource for MovieClient {
  async fn fetch_page(&self, page: u32) -> FeedResult<Vec<Movie>> {
    let url = self.page_url(page)?;
    debug!(%url, "fetching movie page");

    let response = self.client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
      return Err(FeedError::Status {
        page,
        status: status.as_u16(),
      });
    }

    let body = response.bytes().await?;
    let parsed: ApiMoviePage =
      serde_json::from_slice(&body).map_err(|source| FeedError::Decode { page, source })?;

    Ok(parsed.into_movies())
  }

  fn describe(&self) -> String {
    self.host().unwrap_or(self.base_url.as_str()).to_string()
  }
}

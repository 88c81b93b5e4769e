use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://task.auditflo.in";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  /// Title shown in the header (defaults to "Movies")
  #[serde(default = "default_title")]
  pub title: String,
  #[serde(default)]
  pub feed: FeedConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
  /// Pages are fetched from `{base_url}/{page}.json`
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// Per-request timeout in seconds
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// Disable to run without any local persistence
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Database location (defaults to $XDG_DATA_HOME/marquee/cache.db)
  pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
  /// Tracing filter, overridden by RUST_LOG
  #[serde(default = "default_log_level")]
  pub level: String,
}

fn default_title() -> String {
  "Movies".to_string()
}

fn default_base_url() -> String {
  DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
  30
}

fn default_true() -> bool {
  true
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for Config {
  fn default() -> Self {
    Self {
      title: default_title(),
      feed: FeedConfig::default(),
      cache: CacheConfig::default(),
      log: LogConfig::default(),
    }
  }
}

impl Default for FeedConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      path: None,
    }
  }
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./marquee.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/marquee/config.yaml
  ///
  /// Falls back to defaults when no file exists.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("marquee.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("marquee").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
    // An empty file deserializes to unit, not an empty mapping
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents)
  }

  /// Directory for the log files.
  pub fn log_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("marquee").join("logs"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.title, "Movies");
    assert_eq!(config.feed.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.feed.timeout_secs, 30);
    assert!(config.cache.enabled);
    assert!(config.cache.path.is_none());
    assert_eq!(config.log.level, "info");
  }

  #[test]
  fn test_partial_file_keeps_other_defaults() {
    let config = Config::parse(
      r#"
feed:
  base_url: "https://movies.example.com/v1"
cache:
  enabled: false
"#,
    )
    .unwrap();

    assert_eq!(config.feed.base_url, "https://movies.example.com/v1");
    assert_eq!(config.feed.timeout_secs, 30);
    assert!(!config.cache.enabled);
    assert_eq!(config.title, "Movies");
  }

  #[test]
  fn test_empty_file_is_default() {
    let config = Config::parse("  \n").unwrap();
    assert_eq!(config.feed.base_url, DEFAULT_BASE_URL);
  }

  #[test]
  fn test_load_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "title: Watchlist\nlog:\n  level: debug").unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.title, "Watchlist");
    assert_eq!(config.log.level, "debug");
  }

  #[test]
  fn test_missing_explicit_path_is_an_error() {
    let err = Config::load(Some(Path::new("/nonexistent/marquee.yaml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }

  #[test]
  fn test_invalid_yaml_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "feed: [not, a, mapping]").unwrap();
    assert!(Config::load(Some(file.path())).is_err());
  }
}

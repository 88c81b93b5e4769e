mod app;
mod cache;
mod config;
mod connectivity;
mod error;
mod event;
mod movies;
mod pager;
mod ui;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "marquee")]
#[command(about = "A terminal movie browser with a paginated feed and offline cache")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/marquee/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Feed base URL; pages are fetched from <URL>/<page>.json
  #[arg(long)]
  base_url: Option<String>,

  /// Skip the network and show the cached list
  #[arg(long)]
  offline: bool,

  /// Don't read or write the local cache
  #[arg(long)]
  no_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Command line overrides
  if let Some(base_url) = args.base_url {
    config.feed.base_url = base_url;
  }
  if args.no_cache {
    config.cache.enabled = false;
  }

  // Keep the guard alive so buffered log lines are flushed on exit
  let _guard = init_tracing(&config.log.level)?;

  // Initialize and run the app
  let mut app = app::App::new(config, args.offline)?;
  app.run().await?;

  Ok(())
}

/// Log to a daily file; the terminal belongs to the UI.
fn init_tracing(level: &str) -> Result<WorkerGuard> {
  let log_dir = config::Config::log_dir()?;
  std::fs::create_dir_all(&log_dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", log_dir.display(), e))?;

  let appender = tracing_appender::rolling::daily(&log_dir, "marquee.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(level))
    .map_err(|e| eyre!("Invalid log level '{}': {}", level, e))?;

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}

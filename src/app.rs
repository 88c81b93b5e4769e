use crate::cache::{MovieStore, NoopStore, SqliteStore};
use crate::config::Config;
use crate::connectivity::{Connectivity, Fixed, TcpProbe};
use crate::event::{Event, EventHandler};
use crate::movies::client::MovieClient;
use crate::pager::Pager;
use crate::ui::view::{View, ViewAction};
use crate::ui::views::MovieListView;
use crate::ui::{self, HeaderInfo};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// How long the startup reachability probe may take
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Main application state
pub struct App {
  /// Navigation stack - root is always the movie list
  view_stack: Vec<Box<dyn View>>,

  /// Header title from config
  title: String,

  /// Host of the movie feed, for the header
  feed: String,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config, force_offline: bool) -> Result<Self> {
    let client = MovieClient::new(&config.feed)?;

    let store: Arc<dyn MovieStore> = if config.cache.enabled {
      Arc::new(SqliteStore::open(config.cache.path.as_deref())?)
    } else {
      Arc::new(NoopStore)
    };

    let connectivity: Arc<dyn Connectivity> = if force_offline {
      Arc::new(Fixed(false))
    } else {
      Arc::new(TcpProbe::for_url(client.base_url(), PROBE_TIMEOUT))
    };

    let feed = client.base_url().to_string();
    let (pager, events) = Pager::new(Arc::new(client), store, connectivity);
    let pager = if force_offline {
      pager.offline_only()
    } else {
      pager
    };
    let feed_name = pager.feed_name();
    info!(%feed, cache = config.cache.enabled, force_offline, "starting");

    let root = MovieListView::new(config.title.clone(), pager, events);

    Ok(Self {
      view_stack: vec![Box::new(root)],
      title: config.title,
      feed: feed_name,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.event_loop(&mut terminal).await;

    // Cleanup terminal even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(250));

    while !self.should_quit {
      for view in self.view_stack.iter_mut() {
        view.tick();
      }

      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Resize) | Some(Event::Tick) => {}
        None => break,
      }
    }

    Ok(())
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let action = match self.view_stack.last_mut() {
      Some(view) => view.handle_key(key),
      None => ViewAction::Pop,
    };
    self.apply(action);
  }

  fn apply(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => self.view_stack.push(view),
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
    }
  }

  // Accessors for UI rendering
  pub fn current_view_mut(&mut self) -> Option<&mut Box<dyn View>> {
    self.view_stack.last_mut()
  }

  pub fn header_info(&self) -> HeaderInfo {
    HeaderInfo {
      title: self.title.clone(),
      feed: self.feed.clone(),
      source: self.view_stack.first().and_then(|v| v.source()),
      shortcuts: self
        .view_stack
        .last()
        .map(|v| v.shortcuts())
        .unwrap_or_default(),
    }
  }

  pub fn view_breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|v| v.breadcrumb_label())
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{CacheConfig, FeedConfig};
  use crate::ui::views::MovieDetailView;
  use crate::movies::types::movie;

  fn offline_app() -> App {
    let config = Config {
      feed: FeedConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 1,
      },
      cache: CacheConfig {
        enabled: false,
        path: None,
      },
      ..Config::default()
    };
    App::new(config, true).unwrap()
  }

  #[tokio::test]
  async fn test_push_and_pop_views() {
    let mut app = offline_app();
    assert_eq!(app.view_breadcrumb(), vec!["Movies"]);

    app.apply(ViewAction::Push(Box::new(MovieDetailView::new(movie("tt7", "Seven", &[])))));
    assert_eq!(app.view_breadcrumb(), vec!["Movies", "tt7"]);

    app.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
    assert_eq!(app.view_breadcrumb(), vec!["Movies"]);
    assert!(!app.should_quit);

    app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
    assert!(app.should_quit);
  }

  #[tokio::test]
  async fn test_ctrl_c_quits_from_any_view() {
    let mut app = offline_app();
    app.apply(ViewAction::Push(Box::new(MovieDetailView::new(movie("tt7", "Seven", &[])))));
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);
  }

  #[tokio::test]
  async fn test_header_shows_feed_host() {
    let app = offline_app();
    let header = app.header_info();
    assert_eq!(header.feed, "127.0.0.1");
    assert_eq!(header.title, "Movies");
  }
}

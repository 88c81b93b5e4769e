//! Paginated movie list with offline fallback.
//!
//! [`Pager`] owns the in-memory movie list. It decides between the feed and
//! the local store at startup, appends one page at a time when the presenter
//! reaches the end of the list, persists the merged list after every page, and
//! reports each change over a channel. The presenter never touches the list
//! directly; it only sees snapshots.

use crate::cache::MovieStore;
use crate::connectivity::Connectivity;
use crate::error::FeedError;
use crate::movies::client::PageSource;
use crate::movies::types::Movie;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Where the currently displayed list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSource {
  /// Fetched from the feed in this session
  Network,
  /// Restored from the local store because the feed was unreachable
  Offline { cached_at: Option<DateTime<Utc>> },
}

/// Notifications sent from the pager to the presenter.
#[derive(Debug, Clone)]
pub enum PagerEvent {
  /// A page request is in flight
  Loading { page: u32 },
  /// The list was replaced or extended; `movies` is the full new snapshot
  ListChanged {
    movies: Arc<Vec<Movie>>,
    source: ListSource,
  },
  /// A load failed and the list was left untouched; `page` is `None` when
  /// the local store could not be read
  LoadFailed {
    page: Option<u32>,
    kind: &'static str,
    message: String,
  },
}

/// What a single pager call ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
  /// A page was fetched and merged
  Loaded { page: u32, count: usize },
  /// The list was restored from the local store
  Restored { count: usize },
  /// Another load was already running; nothing was requested
  Busy,
  /// The pager is pinned to the local store; the feed is never asked
  Offline,
  /// The load failed; the list is unchanged
  Failed,
}

#[derive(Debug)]
struct PagerState {
  movies: Arc<Vec<Movie>>,
  /// Last page merged into `movies` (next request is cursor + 1)
  cursor: u32,
  loading: bool,
  source: ListSource,
}

impl Default for PagerState {
  fn default() -> Self {
    Self {
      movies: Arc::new(Vec::new()),
      cursor: 1,
      loading: false,
      source: ListSource::Network,
    }
  }
}

/// Owner of the movie list. Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct Pager {
  state: Arc<Mutex<PagerState>>,
  source: Arc<dyn PageSource>,
  store: Arc<dyn MovieStore>,
  connectivity: Arc<dyn Connectivity>,
  events: mpsc::UnboundedSender<PagerEvent>,
  offline_only: bool,
}

impl Pager {
  /// Create a pager and the receiving end of its notification channel.
  pub fn new(
    source: Arc<dyn PageSource>,
    store: Arc<dyn MovieStore>,
    connectivity: Arc<dyn Connectivity>,
  ) -> (Self, mpsc::UnboundedReceiver<PagerEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let pager = Self {
      state: Arc::new(Mutex::new(PagerState::default())),
      source,
      store,
      connectivity,
      events: tx,
      offline_only: false,
    };
    (pager, rx)
  }

  /// Pin the pager to the local store: the next-page trigger never fetches.
  pub fn offline_only(mut self) -> Self {
    self.offline_only = true;
    self
  }

  /// Load the first page from the feed, or the stored list when offline.
  ///
  /// The cursor only moves back to page 1 once the new list is in place, so
  /// a failed reload leaves both list and cursor as they were.
  pub async fn initialize(&self) -> LoadOutcome {
    {
      let mut state = self.state();
      if state.loading {
        debug!("initialize skipped, a load is already running");
        return LoadOutcome::Busy;
      }
      state.loading = true;
    }

    // DNS and TCP connects block, keep them off the async workers
    let connectivity = Arc::clone(&self.connectivity);
    let reachable = tokio::task::spawn_blocking(move || connectivity.is_reachable())
      .await
      .unwrap_or_else(|e| {
        warn!(error = %e, "connectivity check panicked, assuming offline");
        false
      });

    let outcome = if reachable {
      self.load_first_page().await
    } else {
      self.restore_from_store()
    };

    self.state().loading = false;
    outcome
  }

  async fn load_first_page(&self) -> LoadOutcome {
    self.emit(PagerEvent::Loading { page: 1 });

    match self.source.fetch_page(1).await {
      Ok(movies) => {
        let count = movies.len();
        let snapshot = Arc::new(movies);
        {
          let mut state = self.state();
          state.movies = Arc::clone(&snapshot);
          state.cursor = 1;
          state.source = ListSource::Network;
        }
        info!(count, "loaded first page");
        self.persist(&snapshot);
        self.emit(PagerEvent::ListChanged {
          movies: snapshot,
          source: ListSource::Network,
        });
        LoadOutcome::Loaded { page: 1, count }
      }
      Err(e) => {
        self.report_failure(Some(1), &e);
        LoadOutcome::Failed
      }
    }
  }

  fn restore_from_store(&self) -> LoadOutcome {
    let movies = match self.store.load_all() {
      Ok(movies) => movies,
      Err(e) => {
        self.report_failure(None, &e);
        return LoadOutcome::Failed;
      }
    };

    let cached_at = self.store.cached_at().unwrap_or_else(|e| {
      warn!(error = %e, "failed to read cache timestamp");
      None
    });
    let source = ListSource::Offline { cached_at };

    let count = movies.len();
    let snapshot = Arc::new(movies);
    {
      let mut state = self.state();
      state.movies = Arc::clone(&snapshot);
      state.cursor = 1;
      state.source = source;
    }
    info!(count, "feed unreachable, restored movies from cache");
    self.emit(PagerEvent::ListChanged {
      movies: snapshot,
      source,
    });
    LoadOutcome::Restored { count }
  }

  /// Fetch and append the next page.
  ///
  /// Ignored while another load is running. On failure the cursor is rolled
  /// back so the next call asks for the same page again.
  pub async fn on_approaching_end(&self) -> LoadOutcome {
    if self.offline_only {
      debug!("next page skipped, pager is offline only");
      return LoadOutcome::Offline;
    }

    let page = {
      let mut state = self.state();
      if state.loading {
        debug!(cursor = state.cursor, "next page skipped, a load is already running");
        return LoadOutcome::Busy;
      }
      state.loading = true;
      state.cursor += 1;
      state.cursor
    };

    self.emit(PagerEvent::Loading { page });

    match self.source.fetch_page(page).await {
      Ok(batch) => {
        let count = batch.len();
        let snapshot = {
          let mut state = self.state();
          let mut merged = Vec::with_capacity(state.movies.len() + count);
          merged.extend(state.movies.iter().cloned());
          merged.extend(batch);
          state.movies = Arc::new(merged);
          state.source = ListSource::Network;
          Arc::clone(&state.movies)
        };
        info!(page, count, total = snapshot.len(), "appended page");

        self.persist(&snapshot);
        self.emit(PagerEvent::ListChanged {
          movies: snapshot,
          source: ListSource::Network,
        });
        self.state().loading = false;
        LoadOutcome::Loaded { page, count }
      }
      Err(e) => {
        {
          let mut state = self.state();
          state.cursor -= 1;
          state.loading = false;
        }
        self.report_failure(Some(page), &e);
        LoadOutcome::Failed
      }
    }
  }

  /// Snapshot of the list as of the last completed merge.
  pub fn current_list(&self) -> Arc<Vec<Movie>> {
    Arc::clone(&self.state().movies)
  }

  /// Last page merged into the list.
  #[cfg(test)]
  fn cursor(&self) -> u32 {
    self.state().cursor
  }

  #[cfg(test)]
  fn is_loading(&self) -> bool {
    self.state().loading
  }

  #[cfg(test)]
  fn source(&self) -> ListSource {
    self.state().source
  }

  pub fn feed_name(&self) -> String {
    self.source.describe()
  }

  fn persist(&self, movies: &[Movie]) {
    if let Err(e) = self.store.replace_all(movies) {
      warn!(error = %e, count = movies.len(), "failed to persist movies");
    }
  }

  fn report_failure(&self, page: Option<u32>, error: &FeedError) {
    warn!(page = ?page, kind = error.kind(), error = %error, "movie load failed");
    self.emit(PagerEvent::LoadFailed {
      page,
      kind: error.kind(),
      message: error.to_string(),
    });
  }

  fn emit(&self, event: PagerEvent) {
    // Receiver gone means the UI is shutting down
    let _ = self.events.send(event);
  }

  fn state(&self) -> MutexGuard<'_, PagerState> {
    self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

use crate::movies::types::Movie;
use crate::pager::{ListSource, Pager, PagerEvent};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{format_cast, truncate};
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::MovieDetailView;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Load state shown in the list title
#[derive(Debug, Clone, PartialEq, Eq)]
enum LoadState {
  Idle,
  Loading { page: u32 },
  Failed { message: String },
}

/// The movie list. Renders pager snapshots and asks for the next page when
/// the last row scrolls into view.
pub struct MovieListView {
  title: String,
  pager: Pager,
  events: mpsc::UnboundedReceiver<PagerEvent>,
  movies: Arc<Vec<Movie>>,
  source: Option<ListSource>,
  load_state: LoadState,
  list_state: ListState,
  /// Index one past the last row drawn in the previous frame
  visible_end: usize,
  /// List length at which the next page was last requested
  requested_at: Option<usize>,
}

impl MovieListView {
  pub fn new(title: String, pager: Pager, events: mpsc::UnboundedReceiver<PagerEvent>) -> Self {
    let view = Self {
      title,
      pager,
      events,
      movies: Arc::new(Vec::new()),
      source: None,
      load_state: LoadState::Idle,
      list_state: ListState::default(),
      visible_end: 0,
      requested_at: None,
    };

    // Start loading immediately
    view.spawn_initialize();
    view
  }

  fn spawn_initialize(&self) {
    let pager = self.pager.clone();
    tokio::spawn(async move {
      pager.initialize().await;
    });
  }

  fn spawn_next_page(&mut self) {
    self.requested_at = Some(self.movies.len());
    let pager = self.pager.clone();
    tokio::spawn(async move {
      pager.on_approaching_end().await;
    });
  }

  fn apply(&mut self, event: PagerEvent) {
    match event {
      PagerEvent::Loading { page } => self.load_state = LoadState::Loading { page },
      PagerEvent::ListChanged { movies, source } => {
        self.movies = movies;
        self.source = Some(source);
        self.load_state = LoadState::Idle;
      }
      PagerEvent::LoadFailed { page, kind, message } => {
        debug!(page = ?page, kind, "showing load failure");
        self.load_state = LoadState::Failed {
          message: format!("{} error: {}", kind, message),
        };
      }
    }
  }

  /// Request the next page once per list length when the last row is visible.
  fn maybe_request_more(&mut self) {
    let len = self.movies.len();
    if len == 0 || self.visible_end < len || self.requested_at == Some(len) {
      return;
    }
    if self.load_state != LoadState::Idle {
      return;
    }
    self.spawn_next_page();
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.movies.len();
    ensure_valid_selection(&mut self.list_state, len);

    let title = match &self.load_state {
      LoadState::Loading { .. } if len == 0 => format!(" {} (loading...) ", self.title),
      LoadState::Loading { page } => format!(" {} ({}, loading page {}...) ", self.title, len, page),
      LoadState::Failed { message } => format!(" {} ({}) ({}) ", self.title, len, message),
      LoadState::Idle => format!(" {} ({}) ", self.title, len),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if self.movies.is_empty() {
      let content = match (&self.load_state, self.source) {
        (LoadState::Loading { .. }, _) => "Loading movies...",
        (LoadState::Failed { .. }, _) => "Failed to load movies. Press 'r' to retry.",
        (_, Some(ListSource::Offline { .. })) => "Offline and nothing cached yet.",
        _ => "No movies found.",
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      self.visible_end = 0;
      return;
    }

    let items: Vec<ListItem> = self
      .movies
      .iter()
      .map(|movie| {
        let line = Line::from(vec![
          Span::styled(
            format!("{:<40}", truncate(&movie.title, 40)),
            Style::default().fg(Color::White).bold(),
          ),
          Span::raw(" "),
          Span::styled(format!("{:<6}", movie.year), Style::default().fg(Color::Cyan)),
          Span::raw(" "),
          Span::styled(
            format!("{:<9}", truncate(&movie.runtime, 9)),
            Style::default().fg(Color::Yellow),
          ),
          Span::raw(" "),
          Span::styled(
            truncate(&format_cast(&movie.cast, 3), 60),
            Style::default().fg(Color::DarkGray),
          ),
        ]);
        ListItem::new(line)
      })
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);

    let rows = area.height.saturating_sub(2) as usize;
    self.visible_end = visible_end(self.list_state.offset(), rows, len);
  }

  fn selected_movie(&self) -> Option<&Movie> {
    self.list_state.selected().and_then(|i| self.movies.get(i))
  }

  fn at_last_row(&self) -> bool {
    matches!(self.list_state.selected(), Some(i) if i + 1 == self.movies.len())
  }
}

/// One past the last index drawn, given the scroll offset and row count.
fn visible_end(offset: usize, rows: usize, len: usize) -> usize {
  (offset + rows).min(len)
}

impl View for MovieListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        if self.at_last_row() {
          // Explicit retry from the bottom of the list
          self.spawn_next_page();
        } else {
          self.list_state.select_next();
        }
      }
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('g') | KeyCode::Home => self.list_state.select_first(),
      KeyCode::Char('G') | KeyCode::End => self.list_state.select_last(),
      KeyCode::Char('r') => {
        self.requested_at = None;
        self.spawn_initialize();
      }
      KeyCode::Enter => {
        if let Some(movie) = self.selected_movie() {
          return ViewAction::Push(Box::new(MovieDetailView::new(movie.clone())));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_list(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    self.title.clone()
  }

  fn source(&self) -> Option<ListSource> {
    self.source
  }

  fn tick(&mut self) {
    while let Ok(event) = self.events.try_recv() {
      self.apply(event);
    }
    self.maybe_request_more();
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new("enter", "details"),
      Shortcut::new("r", "reload"),
      Shortcut::new("q", "quit"),
    ]
  }
}

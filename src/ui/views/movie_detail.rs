use crate::movies::types::Movie;
use crate::ui::view::{Shortcut, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Full details of a single movie
pub struct MovieDetailView {
  movie: Movie,
  scroll: u16,
}

impl MovieDetailView {
  pub fn new(movie: Movie) -> Self {
    Self { movie, scroll: 0 }
  }

  fn lines(&self) -> Vec<Line<'_>> {
    let label = Style::default().fg(Color::DarkGray);
    let movie = &self.movie;

    let mut lines = vec![
      Line::from(vec![
        Span::styled("Title:   ", label),
        Span::styled(movie.title.as_str(), Style::default().bold()),
      ]),
      Line::from(vec![
        Span::styled("Year:    ", label),
        Span::styled(movie.year.as_str(), Style::default().fg(Color::Cyan)),
      ]),
      Line::from(vec![
        Span::styled("Runtime: ", label),
        Span::styled(movie.runtime.as_str(), Style::default().fg(Color::Yellow)),
      ]),
      Line::from(vec![Span::styled("IMDb:    ", label), Span::raw(movie.id.as_str())]),
      Line::default(),
      Line::from(Span::styled(format!("Cast ({})", movie.cast.len()), label)),
    ];

    if movie.cast.is_empty() {
      lines.push(Line::from(Span::styled("  No cast listed", label)));
    }
    lines.extend(
      movie
        .cast
        .iter()
        .map(|name| Line::from(format!("  • {}", name))),
    );

    lines
  }
}

impl View for MovieDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
      KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(format!(" {} ", self.movie.title))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let paragraph = Paragraph::new(self.lines())
      .block(block)
      .wrap(Wrap { trim: false })
      .scroll((self.scroll, 0));
    frame.render_widget(paragraph, area);
  }

  fn breadcrumb_label(&self) -> String {
    self.movie.id.clone()
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![Shortcut::new("j/k", "scroll"), Shortcut::new("q", "back")]
  }
}

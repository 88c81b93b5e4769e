use crate::pager::ListSource;
use crate::ui::view::Shortcut;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Everything the header bar shows
pub struct HeaderInfo {
  pub title: String,
  pub feed: String,
  pub source: Option<ListSource>,
  pub shortcuts: Vec<Shortcut>,
}

/// Draw the header bar with logo, feed, data source and shortcuts
pub fn draw_header(frame: &mut Frame, area: Rect, info: &HeaderInfo) {
  let separator = Span::styled("│", Style::default().fg(Color::DarkGray));

  let mut spans = vec![
    Span::styled(" marquee ", Style::default().fg(Color::Cyan).bold()),
    separator.clone(),
    Span::styled(format!(" {} ", info.feed), Style::default().fg(Color::White)),
    separator.clone(),
    Span::styled(
      format!(" {} ", info.title),
      Style::default().fg(Color::Yellow).bold(),
    ),
  ];

  if let Some(source) = info.source {
    let (label, color) = source_badge(source);
    spans.push(separator);
    spans.push(Span::styled(format!(" {} ", label), Style::default().fg(color)));
  }

  spans.push(Span::raw(" "));
  for shortcut in &info.shortcuts {
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
      format!("<{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

fn source_badge(source: ListSource) -> (String, Color) {
  match source {
    ListSource::Network => ("online".to_string(), Color::Green),
    ListSource::Offline {
      cached_at: Some(at),
    } => (
      format!("offline · cached {}", at.format("%Y-%m-%d %H:%M")),
      Color::Red,
    ),
    ListSource::Offline { cached_at: None } => ("offline · no cache".to_string(), Color::Red),
  }
}

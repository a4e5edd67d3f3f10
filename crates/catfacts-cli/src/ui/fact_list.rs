//! Fact list pane.

use catfacts_core::{
  fact::Source,
  view::{Filter, View},
};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::{app::App, timestamp};

/// What to show when nothing passes `filter`.
pub fn empty_message(filter: Filter) -> String {
  match filter {
    Filter::All => "No cat facts yet! Add one with [a] or fetch a random one with [r].".into(),
    Filter::Favorites => "No favorite facts found!".into(),
    Filter::User => "No user added facts found!".into(),
    Filter::Api => "No facts from the API found!".into(),
  }
}

/// Render the current page into `area`.
pub fn draw<S>(f: &mut Frame, area: Rect, app: &App<S>, view: &View) {
  let title = format!(
    " {} · page {}/{} · {} matching ",
    view.filter.label(),
    view.page,
    view.page_count,
    view.matching
  );
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  if view.is_empty() {
    f.render_widget(
      Paragraph::new(Line::from(Span::styled(
        empty_message(view.filter),
        Style::default().fg(Color::DarkGray),
      )))
      .wrap(Wrap { trim: true })
      .block(block),
      area,
    );
    return;
  }

  let items: Vec<ListItem> = view
    .facts
    .iter()
    .map(|fact| {
      let heart = if fact.favorite {
        Span::styled("♥ ", Style::default().fg(Color::Red))
      } else {
        Span::raw("  ")
      };
      let badge_color = match fact.source {
        Source::User => Color::Green,
        Source::Api => Color::Blue,
      };
      let meta = Line::from(vec![
        heart,
        Span::styled(
          format!("#{} ", fact.id),
          Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
          format!("[{}]", fact.source.label()),
          Style::default().fg(badge_color),
        ),
        Span::styled(
          format!("  {}", timestamp::display(&fact.created_at)),
          Style::default().fg(Color::DarkGray),
        ),
      ]);
      let text = Line::from(format!("  {}", fact.text));
      ListItem::new(vec![meta, text, Line::raw("")])
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.cursor));

  f.render_stateful_widget(
    List::new(items)
      .block(block)
      .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
      .highlight_symbol("▌"),
    area,
    &mut state,
  );
}

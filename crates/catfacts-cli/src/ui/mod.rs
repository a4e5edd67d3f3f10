//! TUI rendering: header, tabs, fact list and status bar.

pub mod fact_list;

use catfacts_core::{
  intent::Action,
  notify::Severity,
  service::FactService,
  view::{Filter, View},
};
use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Tabs},
};
use strum::IntoEnumIterator;

use crate::app::{App, Mode};

// ─── Root draw ───────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S: FactService>(f: &mut Frame, app: &App<S>, view: &View) {
  let input_height = if app.mode == Mode::Compose { 3 } else { 0 };

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1),            // header
      Constraint::Length(1),            // filter tabs
      Constraint::Min(0),               // facts
      Constraint::Length(input_height), // compose box
      Constraint::Length(1),            // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app, view);
  draw_tabs(f, rows[1], view);
  fact_list::draw(f, rows[2], app, view);
  if app.mode == Mode::Compose {
    draw_input(f, rows[3], app);
  }
  draw_status(f, rows[4], app);
}

// ─── Header ──────────────────────────────────────────────────────────────────

fn draw_header<S: FactService>(f: &mut Frame, area: Rect, app: &App<S>, view: &View) {
  let stats = view.stats;
  let left = Span::styled(
    format!(
      " catfacts  {} facts · ♥ {} · {} yours · {} from API",
      stats.total, stats.favorites, stats.user_added, stats.api_sourced
    ),
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );

  let right_text = if app.manager.is_loading() {
    "loading… ".to_string()
  } else {
    format!("{} ", Local::now().format("%Y-%m-%d"))
  };
  let right = Span::styled(right_text, Style::default().fg(Color::Gray));

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);
  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Tabs ────────────────────────────────────────────────────────────────────

fn draw_tabs(f: &mut Frame, area: Rect, view: &View) {
  let titles: Vec<Line> = Filter::iter()
    .map(|filter| Line::from(format!("{} ({})", filter.label(), view.stats.count(filter))))
    .collect();
  let selected = Filter::iter()
    .position(|filter| filter == view.filter)
    .unwrap_or_default();

  f.render_widget(
    Tabs::new(titles)
      .select(selected)
      .style(Style::default().fg(Color::DarkGray))
      .highlight_style(
        Style::default()
          .fg(Color::Yellow)
          .add_modifier(Modifier::BOLD),
      )
      .divider("│"),
    area,
  );
}

// ─── Compose box ─────────────────────────────────────────────────────────────

fn draw_input<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let block = Block::default()
    .title(" New cat fact ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow));
  f.render_widget(
    Paragraph::new(format!("{}_", app.input)).block(block),
    area,
  );
}

// ─── Status bar ──────────────────────────────────────────────────────────────

fn draw_status<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let (mode_label, hints) = match &app.mode {
    Mode::Browse => (
      "BROWSE",
      "a add  r random  f favorite  d delete  Tab filter  ←→ page  R refresh  q quit".to_string(),
    ),
    Mode::Compose => ("ADD", "Type a fact  Enter submit  Esc cancel".to_string()),
    Mode::ConfirmDelete(id) => ("DELETE", format!("Delete fact #{id}?  y confirm  n cancel")),
  };

  let busy: Vec<String> = Action::iter()
    .filter(|action| app.in_flight.is_busy(*action))
    .map(|action| action.to_string())
    .collect();

  let (text, style) = match (&app.mode, &app.status) {
    _ if app.blocked_action().is_some() => (
      format!("  {}", blocked_hint(&app.mode)),
      Style::default().fg(Color::Yellow),
    ),
    (Mode::Browse, Some(note)) => (
      format!("  {}  (Esc dismiss)", note.message),
      Style::default().fg(severity_color(note.severity)),
    ),
    _ => (format!("  {hints}"), Style::default().fg(Color::DarkGray)),
  };

  let mut spans = vec![
    Span::styled(
      format!(" {mode_label} "),
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::styled(text, style),
  ];
  if !busy.is_empty() {
    spans.push(Span::styled(
      format!("  [{}…]", busy.join(", ")),
      Style::default().fg(Color::Yellow),
    ));
  }

  f.render_widget(
    Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black)),
    area,
  );
}

fn blocked_hint(mode: &Mode) -> &'static str {
  match mode {
    Mode::ConfirmDelete(_) => "Still deleting the previous fact. Press y again once it finishes.",
    _ => "Still adding the previous fact. Press Enter again once it finishes.",
  }
}

fn severity_color(severity: Severity) -> Color {
  match severity {
    Severity::Success => Color::Green,
    Severity::Warning => Color::Yellow,
    Severity::Error => Color::Red,
  }
}

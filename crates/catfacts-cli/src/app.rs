//! Application state machine and event dispatcher.

use std::{future::Future, sync::Arc};

use catfacts_core::{
  FactManager,
  fact::{Fact, FactId},
  intent::{Action, InFlight},
  notify::{Notification, NotificationLog, TracingNotifier},
  outcome::Outcome,
  service::FactService,
  view::{Filter, View},
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use strum::IntoEnumIterator;
use tracing::debug;

/// Notifications go to the log and to the status bar.
pub type Sink = (TracingNotifier, Arc<NotificationLog>);

pub type SharedManager<S> = Arc<FactManager<S, Sink>>;

// ─── Mode ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Browse,
  /// Typing a new fact into the input box.
  Compose,
  /// Waiting for `y`/`n` before deleting.
  ConfirmDelete(FactId),
}

// ─── App ─────────────────────────────────────────────────────────────────────

pub struct App<S> {
  pub mode:      Mode,
  /// Text in the compose box.
  pub input:     String,
  /// Row under the cursor within the current page.
  pub cursor:    usize,
  /// Most recent notification, until dismissed or replaced.
  pub status:    Option<Notification>,
  pub manager:   SharedManager<S>,
  pub in_flight: InFlight,
  log:           Arc<NotificationLog>,
}

impl<S> App<S> {
  /// The action the current mode would start, when one of that kind is
  /// still running. Confirming is refused until it settles.
  pub fn blocked_action(&self) -> Option<Action> {
    let action = match self.mode {
      Mode::Browse => return None,
      Mode::Compose => Action::Create,
      Mode::ConfirmDelete(_) => Action::Delete,
    };
    self.in_flight.is_busy(action).then_some(action)
  }
}

impl<S: FactService + 'static> App<S> {
  pub fn new(manager: SharedManager<S>, log: Arc<NotificationLog>) -> Self {
    Self {
      mode: Mode::Browse,
      input: String::new(),
      cursor: 0,
      status: None,
      manager,
      in_flight: InFlight::new(),
      log,
    }
  }

  /// Pull in notifications from finished intents and keep the cursor on the
  /// page. Called once per frame.
  pub fn tick(&mut self) {
    if let Some(latest) = self.log.drain().pop() {
      self.status = Some(latest);
    }
    let rows = self.manager.view().facts.len();
    self.cursor = self.cursor.min(rows.saturating_sub(1));
  }

  pub fn view(&self) -> View { self.manager.view() }

  /// The fact under the cursor, if the page is not empty.
  pub fn selected(&self) -> Option<Fact> { self.view().facts.into_iter().nth(self.cursor) }

  // ── Dispatch ──────────────────────────────────────────────────────────────

  /// Run a remote intent on its own task unless one of the same kind is
  /// already running.
  fn dispatch<F, Fut>(&self, action: Action, op: F)
  where
    F: FnOnce(SharedManager<S>) -> Fut,
    Fut: Future<Output = Outcome> + Send + 'static,
  {
    let Some(guard) = self.in_flight.try_begin(action) else {
      debug!(%action, "already in flight");
      return;
    };
    let fut = op(Arc::clone(&self.manager));
    tokio::spawn(async move {
      let outcome = fut.await;
      debug!(action = %guard.action(), ?outcome, "intent settled");
      drop(guard);
    });
  }

  pub fn refresh(&self) { self.dispatch(Action::Refresh, |m| async move { m.load_all().await }); }

  fn submit_input(&mut self) {
    if let Some(action) = self.blocked_action() {
      debug!(%action, "still in flight, keeping input");
      return;
    }
    let text = std::mem::take(&mut self.input);
    self.mode = Mode::Browse;
    self.dispatch(Action::Create, move |m| async move { m.create(&text).await });
  }

  fn add_random(&self) { self.dispatch(Action::Random, |m| async move { m.add_random().await }); }

  fn delete(&mut self, id: FactId) {
    if let Some(action) = self.blocked_action() {
      debug!(%action, id, "still in flight, keeping confirmation");
      return;
    }
    self.mode = Mode::Browse;
    self.dispatch(Action::Delete, move |m| async move { m.delete(id).await });
  }

  fn toggle_favorite(&self) {
    if let Some(fact) = self.selected() {
      self.manager.toggle_favorite(fact.id);
    }
  }

  fn cycle_filter(&mut self, forward: bool) {
    let filters: Vec<Filter> = Filter::iter().collect();
    let current = filters
      .iter()
      .position(|f| *f == self.manager.filter())
      .unwrap_or_default();
    let next = if forward {
      (current + 1) % filters.len()
    } else {
      (current + filters.len() - 1) % filters.len()
    };
    self.set_filter(filters[next]);
  }

  fn set_filter(&mut self, filter: Filter) {
    self.manager.set_filter(filter);
    self.cursor = 0;
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    match self.mode.clone() {
      Mode::Browse => return self.handle_browse_key(key),
      Mode::Compose => self.handle_compose_key(key),
      Mode::ConfirmDelete(id) => match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => self.delete(id),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.mode = Mode::Browse,
        _ => {}
      },
    }
    true
  }

  fn handle_browse_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Down | KeyCode::Char('j') => {
        let rows = self.view().facts.len();
        if self.cursor + 1 < rows {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
      KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => {
        self.manager.next_page();
        self.cursor = 0;
      }
      KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => {
        self.manager.prev_page();
        self.cursor = 0;
      }
      KeyCode::Tab => self.cycle_filter(true),
      KeyCode::BackTab => self.cycle_filter(false),
      KeyCode::Char(c @ '1'..='4') => {
        if let Some(filter) = Filter::iter().nth(usize::from(c as u8 - b'1')) {
          self.set_filter(filter);
        }
      }
      KeyCode::Char('a') | KeyCode::Char('i') => self.mode = Mode::Compose,
      KeyCode::Char('r') => self.add_random(),
      KeyCode::Char('R') | KeyCode::F(5) => self.refresh(),
      KeyCode::Char('f') | KeyCode::Char(' ') => self.toggle_favorite(),
      KeyCode::Char('d') | KeyCode::Delete => {
        if let Some(fact) = self.selected() {
          self.mode = Mode::ConfirmDelete(fact.id);
        }
      }
      KeyCode::Esc => self.status = None,
      _ => {}
    }
    true
  }

  fn handle_compose_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => self.mode = Mode::Browse,
      KeyCode::Enter => self.submit_input(),
      KeyCode::Backspace => {
        self.input.pop();
      }
      KeyCode::Char(c) => self.input.push(c),
      _ => {}
    }
  }
}

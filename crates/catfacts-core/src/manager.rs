//! The collection view-state manager.
//!
//! [`FactManager`] owns the session's copy of the collection and the overlay
//! that enriches it, and is the only thing that talks to the
//! [`FactService`]. Front-ends hold an `Arc<FactManager>` and render from
//! [`FactManager::view`].
//!
//! Every successful remote write is followed by a full reload instead of a
//! local splice, so after a mutation settles the collection is exactly what
//! a fresh load would show (plus overlay state). This costs one extra round
//! trip per write.
//!
//! State sits behind a `std::sync::Mutex` that is only ever locked between
//! awaits. Operations started from different tasks therefore interleave at
//! their network calls, and overlapping reloads resolve last-write-wins.

use std::{
  collections::BTreeSet,
  num::NonZeroUsize,
  sync::{Mutex, MutexGuard, PoisonError},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
  ErrorKind,
  fact::{Fact, FactId, Source, normalize_text},
  notify::{Notifier, Severity},
  outcome::{self, Outcome},
  overlay::{FavoriteRetention, Overlay},
  service::{CreateOutcome, FactService},
  view::{self, Filter, Stats, View},
};

/// Five facts per page.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(4);

// ─── Configuration ───────────────────────────────────────────────────────────

/// How deletes reach the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteMode {
  /// `DELETE /facts/{id}`, then reload.
  #[default]
  Remote,
  /// The service has no delete endpoint. The fact is hidden for the rest of
  /// the session and stays stored remotely.
  LocalOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerConfig {
  pub page_size:          NonZeroUsize,
  pub delete_mode:        DeleteMode,
  pub favorite_retention: FavoriteRetention,
}

impl Default for ManagerConfig {
  fn default() -> Self {
    Self {
      page_size:          DEFAULT_PAGE_SIZE,
      delete_mode:        DeleteMode::default(),
      favorite_retention: FavoriteRetention::default(),
    }
  }
}

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct ViewState {
  facts:           Vec<Fact>,
  overlay:         Overlay,
  filter:          Filter,
  /// 1-indexed.
  page:            usize,
  loads_in_flight: usize,
}

impl Default for ViewState {
  fn default() -> Self {
    Self {
      facts:           Vec::new(),
      overlay:         Overlay::default(),
      filter:          Filter::default(),
      page:            1,
      loads_in_flight: 0,
    }
  }
}

impl ViewState {
  fn matching(&self) -> usize { self.facts.iter().filter(|f| self.filter.matches(f)).count() }

  fn clamp_page(&mut self, page_size: NonZeroUsize) {
    self.page = view::clamp_page(self.page, self.matching(), page_size);
  }
}

// ─── Manager ─────────────────────────────────────────────────────────────────

pub struct FactManager<S, N> {
  service:  S,
  notifier: N,
  config:   ManagerConfig,
  state:    Mutex<ViewState>,
}

impl<S: FactService, N: Notifier> FactManager<S, N> {
  /// Create a manager with an empty collection. Call
  /// [`load_all`](Self::load_all) to populate it.
  pub fn new(service: S, notifier: N, config: ManagerConfig) -> Self {
    Self {
      service,
      notifier,
      config,
      state: Mutex::new(ViewState::default()),
    }
  }

  pub fn service(&self) -> &S { &self.service }

  pub fn notifier(&self) -> &N { &self.notifier }

  pub fn config(&self) -> &ManagerConfig { &self.config }

  fn state(&self) -> MutexGuard<'_, ViewState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// The whole collection in remote order.
  pub fn facts(&self) -> Vec<Fact> { self.state().facts.clone() }

  pub fn get(&self, id: FactId) -> Option<Fact> {
    self.state().facts.iter().find(|f| f.id == id).cloned()
  }

  /// The current filter and page applied to the collection.
  pub fn view(&self) -> View {
    let state = self.state();
    View::derive(&state.facts, state.filter, state.page, self.config.page_size)
  }

  pub fn stats(&self) -> Stats { Stats::of(&self.state().facts) }

  pub fn user_added_ids(&self) -> BTreeSet<FactId> { self.state().overlay.user_added() }

  pub fn favorite_ids(&self) -> BTreeSet<FactId> { self.state().overlay.favorites().clone() }

  pub fn filter(&self) -> Filter { self.state().filter }

  pub fn page(&self) -> usize { self.state().page }

  /// `true` while at least one full reload is in flight.
  pub fn is_loading(&self) -> bool { self.state().loads_in_flight > 0 }

  // ── Local intents ─────────────────────────────────────────────────────────

  /// Switch filter and go back to the first page.
  pub fn set_filter(&self, filter: Filter) {
    let mut state = self.state();
    state.filter = filter;
    state.page = 1;
  }

  /// Jump to `page`, clamped to the valid range. Returns the page now shown.
  pub fn set_page(&self, page: usize) -> usize {
    let mut state = self.state();
    state.page = page;
    state.clamp_page(self.config.page_size);
    state.page
  }

  pub fn next_page(&self) -> usize {
    let mut state = self.state();
    state.page = state.page.saturating_add(1);
    state.clamp_page(self.config.page_size);
    state.page
  }

  pub fn prev_page(&self) -> usize {
    let mut state = self.state();
    state.page = state.page.saturating_sub(1);
    state.clamp_page(self.config.page_size);
    state.page
  }

  /// Flip the favorite flag for `id`. Purely local; always succeeds, even for
  /// an id that is not in view.
  pub fn toggle_favorite(&self, id: FactId) -> Outcome {
    let mut state = self.state();
    let favorite = state.overlay.toggle_favorite(id);
    if let Some(fact) = state.facts.iter_mut().find(|f| f.id == id) {
      fact.favorite = favorite;
    }
    state.clamp_page(self.config.page_size);
    debug!(id, favorite, "toggled favorite");
    Outcome::Favorited { id, favorite }
  }

  // ── Remote intents ────────────────────────────────────────────────────────

  /// Replace the collection with a fresh snapshot.
  ///
  /// On failure the last-known collection stays in place and a single
  /// connectivity error is reported.
  pub async fn load_all(&self) -> Outcome {
    let ticket = {
      let mut state = self.state();
      state.loads_in_flight += 1;
      state.overlay.begin_snapshot()
    };
    debug!(ticket, "loading facts");

    let result = self.service.list_facts().await;

    let outcome = {
      let mut state = self.state();
      state.loads_in_flight = state.loads_in_flight.saturating_sub(1);
      match result {
        Ok(snapshot) => {
          let facts =
            state
              .overlay
              .reconcile(snapshot, ticket, self.config.favorite_retention);
          state.facts = facts;
          state.clamp_page(self.config.page_size);
          Outcome::Loaded {
            count: state.facts.len(),
          }
        }
        Err(e) => {
          warn!(error = %e, "loading facts failed");
          Outcome::Failed(ErrorKind::Connectivity)
        }
      }
    };

    if outcome.is_failure() {
      self.notifier.notify(Severity::Error, outcome::MSG_CONNECTIVITY);
    }
    outcome
  }

  /// Submit user-typed text. A created fact is recorded as user-added.
  pub async fn create(&self, text: &str) -> Outcome { self.submit(text, Source::User).await }

  /// Fetch a suggestion from the service and submit it as an API-sourced
  /// fact. Classified exactly like [`create`](Self::create).
  pub async fn add_random(&self) -> Outcome {
    let suggestion = match self.service.random_fact().await {
      Ok(suggestion) => suggestion,
      Err(e) => {
        warn!(error = %e, "fetching a random fact failed");
        self
          .notifier
          .notify(Severity::Error, outcome::MSG_RANDOM_FAILED);
        return Outcome::Failed(ErrorKind::Connectivity);
      }
    };
    self.submit(&suggestion.fact, Source::Api).await
  }

  async fn submit(&self, text: &str, source: Source) -> Outcome {
    let Ok(text) = normalize_text(text) else {
      self.notifier.notify(Severity::Error, outcome::MSG_EMPTY);
      return Outcome::Failed(ErrorKind::Validation);
    };

    let response = match self.service.create_fact(&text).await {
      Ok(response) => response,
      Err(e) => {
        warn!(error = %e, ?source, "create request failed");
        self.notifier.notify(Severity::Error, outcome::MSG_ADD_FAILED);
        return Outcome::Failed(ErrorKind::MutationFailed);
      }
    };

    let id = match response {
      CreateOutcome::Duplicate { message } => {
        info!(?source, "create answered duplicate");
        let message = message.as_deref().unwrap_or(outcome::MSG_DUPLICATE);
        self.notifier.notify(Severity::Warning, message);
        return Outcome::Duplicate;
      }
      CreateOutcome::Rejected { code, message } => {
        warn!(?code, ?message, ?source, "create rejected");
        let message = match message {
          Some(detail) => format!("Failed to add the cat fact: {detail}"),
          None => outcome::MSG_ADD_FAILED.to_owned(),
        };
        self.notifier.notify(Severity::Error, &message);
        return Outcome::Failed(ErrorKind::MutationFailed);
      }
      CreateOutcome::Created(record) => {
        if source == Source::User {
          self.state().overlay.mark_user_added(record.id);
        }
        Some(record.id)
      }
      CreateOutcome::Accepted => None,
    };

    info!(?id, ?source, "fact created");
    let message = match source {
      Source::User => outcome::MSG_ADDED,
      Source::Api => outcome::MSG_RANDOM_ADDED,
    };
    self.notifier.notify(Severity::Success, message);

    let loaded = self.load_all().await;

    let mut state = self.state();
    let id = match id {
      Some(id) => Some(id),
      // The service stored the text without echoing the record; find it in
      // the fresh snapshot by its exact text.
      None if !loaded.is_failure() => {
        let found = state.facts.iter().find(|f| f.text == text).map(|f| f.id);
        if let (Some(found), Source::User) = (found, source) {
          state.overlay.mark_user_added(found);
          if let Some(fact) = state.facts.iter_mut().find(|f| f.id == found) {
            fact.source = Source::User;
          }
        }
        found
      }
      None => None,
    };
    state.page = 1;
    Outcome::Created { id }
  }

  /// Remove a fact.
  ///
  /// With [`DeleteMode::Remote`] the service deletes first and the collection
  /// is reloaded; with [`DeleteMode::LocalOnly`] the fact is hidden locally.
  pub async fn delete(&self, id: FactId) -> Outcome {
    if self.config.delete_mode == DeleteMode::LocalOnly {
      {
        let mut state = self.state();
        state.overlay.hide(id);
        state.facts.retain(|f| f.id != id);
        state.clamp_page(self.config.page_size);
      }
      info!(id, "fact removed locally");
      self
        .notifier
        .notify(Severity::Success, outcome::MSG_DELETED_LOCALLY);
      return Outcome::Deleted { id, remote: false };
    }

    if let Err(e) = self.service.delete_fact(id).await {
      warn!(error = %e, id, "delete request failed");
      self
        .notifier
        .notify(Severity::Error, outcome::MSG_DELETE_FAILED);
      return Outcome::Failed(ErrorKind::MutationFailed);
    }

    self.state().overlay.forget(id);
    info!(id, "fact deleted");
    self.notifier.notify(Severity::Success, outcome::MSG_DELETED);

    self.load_all().await;
    Outcome::Deleted { id, remote: true }
  }
}

//! Client-side metadata the remote service does not store.
//!
//! The wire format carries neither provenance nor favorites, so the
//! [`Overlay`] is the only place either survives a reload. Reconciling a
//! fresh snapshot against it produces the enriched collection.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::fact::{Fact, FactId, RemoteFact, Source};

/// Whether favorites outlive a full reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteRetention {
  /// Favorites last for the whole session.
  #[default]
  Session,
  /// Every successful reload clears them, as a plain refetch would.
  ResetOnReload,
}

#[derive(Debug, Clone, Default)]
pub struct Overlay {
  /// Ids this session created from user-typed text, with the snapshot epoch
  /// current when each was registered.
  user_added: BTreeMap<FactId, u64>,
  /// Advisory; may name ids that are not currently in view.
  favorites:  BTreeSet<FactId>,
  /// Removed locally because the service cannot delete.
  hidden:     BTreeSet<FactId>,
  /// Number of snapshots requested so far.
  epoch:      u64,
}

impl Overlay {
  pub fn user_added(&self) -> BTreeSet<FactId> { self.user_added.keys().copied().collect() }

  pub fn is_user_added(&self, id: FactId) -> bool { self.user_added.contains_key(&id) }

  pub fn favorites(&self) -> &BTreeSet<FactId> { &self.favorites }

  pub fn hidden(&self) -> &BTreeSet<FactId> { &self.hidden }

  pub fn source_of(&self, id: FactId) -> Source {
    if self.is_user_added(id) {
      Source::User
    } else {
      Source::Api
    }
  }

  pub fn is_favorite(&self, id: FactId) -> bool { self.favorites.contains(&id) }

  /// Record that a create this session issued for user text came back with
  /// `id`.
  pub fn mark_user_added(&mut self, id: FactId) { self.user_added.insert(id, self.epoch); }

  /// Flip the favorite flag, returning the new value.
  pub fn toggle_favorite(&mut self, id: FactId) -> bool {
    if self.favorites.remove(&id) {
      false
    } else {
      self.favorites.insert(id);
      true
    }
  }

  /// Drop every trace of `id` after it was deleted remotely.
  pub fn forget(&mut self, id: FactId) {
    self.user_added.remove(&id);
    self.favorites.remove(&id);
  }

  /// Forget `id` and keep it out of future snapshots.
  pub fn hide(&mut self, id: FactId) {
    self.forget(id);
    self.hidden.insert(id);
  }

  /// Start a snapshot request. Pass the returned ticket to
  /// [`reconcile`](Self::reconcile) with the response.
  pub fn begin_snapshot(&mut self) -> u64 {
    self.epoch += 1;
    self.epoch
  }

  /// Merge a fresh snapshot with the overlay.
  ///
  /// Keeps remote order, drops repeated ids (first wins) and hidden ids, and
  /// prunes provenance for ids the snapshot no longer contains. An id
  /// registered after `ticket` was issued is kept even when absent: the
  /// snapshot was requested before the fact existed.
  pub fn reconcile(
    &mut self,
    snapshot: Vec<RemoteFact>,
    ticket: u64,
    retention: FavoriteRetention,
  ) -> Vec<Fact> {
    if retention == FavoriteRetention::ResetOnReload {
      self.favorites.clear();
    }

    let remote_ids: HashSet<FactId> = snapshot.iter().map(|r| r.id).collect();
    self.hidden.retain(|id| remote_ids.contains(id));

    let mut seen = HashSet::with_capacity(snapshot.len());
    let facts: Vec<Fact> = snapshot
      .into_iter()
      .filter(|r| !self.hidden.contains(&r.id) && seen.insert(r.id))
      .map(|r| Fact {
        source:     self.source_of(r.id),
        favorite:   self.is_favorite(r.id),
        id:         r.id,
        text:       r.fact,
        created_at: r.created_at,
      })
      .collect();

    self
      .user_added
      .retain(|id, registered| seen.contains(id) || *registered >= ticket);
    facts
  }
}

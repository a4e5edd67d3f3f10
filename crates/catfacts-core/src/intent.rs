//! Single-flight flags for user intents.
//!
//! These belong to the UI layer, not the manager: a front-end asks
//! [`InFlight::try_begin`] before dispatching an intent and disables the
//! matching control while the returned guard is alive. Different kinds never
//! block each other.

use std::{
  collections::HashSet,
  sync::{Arc, Mutex, PoisonError},
};

use strum::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
  Refresh,
  Create,
  Random,
  Delete,
}

/// Set of action kinds currently in flight. Cheap to clone; clones share
/// the same set.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
  active: Arc<Mutex<HashSet<Action>>>,
}

impl InFlight {
  pub fn new() -> Self { Self::default() }

  /// Mark `action` busy, or return `None` if it already is.
  pub fn try_begin(&self, action: Action) -> Option<InFlightGuard> {
    let inserted = self
      .active
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .insert(action);
    inserted.then(|| InFlightGuard {
      active: Arc::clone(&self.active),
      action,
    })
  }

  pub fn is_busy(&self, action: Action) -> bool {
    self
      .active
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .contains(&action)
  }
}

/// Clears its action from the set when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
  active: Arc<Mutex<HashSet<Action>>>,
  action: Action,
}

impl InFlightGuard {
  pub fn action(&self) -> Action { self.action }
}

impl Drop for InFlightGuard {
  fn drop(&mut self) {
    self
      .active
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .remove(&self.action);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn same_kind_is_single_flight() {
    let flags = InFlight::new();
    let guard = flags.try_begin(Action::Create).unwrap();
    assert!(flags.is_busy(Action::Create));
    assert!(flags.try_begin(Action::Create).is_none());

    drop(guard);
    assert!(!flags.is_busy(Action::Create));
    assert!(flags.try_begin(Action::Create).is_some());
  }

  #[test]
  fn different_kinds_run_together() {
    let flags = InFlight::new();
    let _delete = flags.try_begin(Action::Delete).unwrap();
    let random = flags.try_begin(Action::Random);
    assert!(random.is_some());
  }

  #[test]
  fn clones_share_state() {
    let flags = InFlight::new();
    let other = flags.clone();
    let _guard = flags.try_begin(Action::Refresh).unwrap();
    assert!(other.is_busy(Action::Refresh));
  }
}

//! What a manager operation did, as seen by its caller.
//!
//! Manager operations never return `Err`. Each one settles into exactly one
//! [`Outcome`] and has already sent the matching notification by the time
//! it returns.

use crate::{ErrorKind, fact::FactId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  /// A full snapshot replaced the collection.
  Loaded { count: usize },
  /// The service stored the fact. `id` is `None` when the response did not
  /// echo the record and the follow-up reload could not identify it.
  Created { id: Option<FactId> },
  /// The service already had this text. Nothing changed.
  Duplicate,
  /// The fact is gone from the view. `remote` is false when the service
  /// cannot delete and the removal is local only.
  Deleted { id: FactId, remote: bool },
  /// The favorite flag for `id` is now `favorite`.
  Favorited { id: FactId, favorite: bool },
  /// Nothing changed; the failure has been reported.
  Failed(ErrorKind),
}

impl Outcome {
  pub fn is_failure(&self) -> bool { matches!(self, Self::Failed(_)) }
}

// ─── Messages ────────────────────────────────────────────────────────────────

pub(crate) const MSG_CONNECTIVITY: &str =
  "Unable to connect to the backend. Make sure the API server is running.";
pub(crate) const MSG_EMPTY: &str = "Cat fact cannot be empty.";
pub(crate) const MSG_DUPLICATE: &str = "This cat fact already exists.";
pub(crate) const MSG_ADDED: &str = "Cat fact added.";
pub(crate) const MSG_RANDOM_ADDED: &str = "Random cat fact added.";
pub(crate) const MSG_ADD_FAILED: &str = "Failed to add the cat fact. Please try again.";
pub(crate) const MSG_RANDOM_FAILED: &str = "Failed to get a random cat fact. Please try again.";
pub(crate) const MSG_DELETED: &str = "Cat fact deleted.";
pub(crate) const MSG_DELETED_LOCALLY: &str =
  "Cat fact removed from this view. The service cannot delete, so it will stay stored there.";
pub(crate) const MSG_DELETE_FAILED: &str = "Failed to delete the cat fact. Please try again.";

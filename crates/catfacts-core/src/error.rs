//! Error types for `catfacts-core`.

use serde::Serialize;
use strum::Display;
use thiserror::Error;

use crate::fact::FactId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("fact text must not be empty")]
  EmptyText,

  #[error("fact not found: {0}")]
  FactNotFound(FactId),

  #[error("service unavailable")]
  Unavailable,

  #[error("write rejected: {0}")]
  Rejected(String),

  #[error("no suggestions available")]
  NoSuggestions,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Classification ──────────────────────────────────────────────────────────

/// The user-facing class of a failed intent.
///
/// Every failure is folded into one of these before it reaches the
/// notification sink. A duplicate submission is not a failure and has no
/// variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
  /// The service was unreachable, or answered a read with a non-success
  /// status.
  Connectivity,
  /// A write came back with anything other than success or duplicate.
  MutationFailed,
  /// The submitted text was rejected locally; no request was made.
  Validation,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kinds_display_in_kebab_case() {
    assert_eq!(ErrorKind::Connectivity.to_string(), "connectivity");
    assert_eq!(ErrorKind::MutationFailed.to_string(), "mutation-failed");
    assert_eq!(ErrorKind::Validation.to_string(), "validation");
  }
}

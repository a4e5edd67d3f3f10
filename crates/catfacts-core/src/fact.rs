//! Fact types.
//!
//! The remote service knows a fact only as `{id, fact, created_at}`. Where a
//! fact came from and whether it is a favorite are overlay state that this
//! crate tracks on the client side (see [`crate::overlay`]).

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Identifier assigned by the remote service. Never reused.
pub type FactId = i64;

// ─── Provenance ──────────────────────────────────────────────────────────────

/// Where a fact entered the collection from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
  /// Typed in by the user in this session.
  User,
  /// Anything else: seeded by the service, fetched as a random suggestion,
  /// or added by another client.
  Api,
}

impl Source {
  pub fn label(&self) -> &'static str {
    match self {
      Self::User => "User Added",
      Self::Api => "External API",
    }
  }
}

// ─── Wire record ─────────────────────────────────────────────────────────────

/// A fact exactly as the remote service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFact {
  pub id:         FactId,
  pub fact:       String,
  pub created_at: String,
}

/// Body of the random-suggestion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
  pub fact: String,
}

// ─── Enriched fact ───────────────────────────────────────────────────────────

/// A remote fact merged with the local overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fact {
  pub id:         FactId,
  pub text:       String,
  pub created_at: String,
  pub source:     Source,
  pub favorite:   bool,
}

impl Fact {
  pub fn is_user_added(&self) -> bool { self.source == Source::User }
}

/// Trim submitted text, rejecting input that is empty once trimmed.
pub fn normalize_text(text: &str) -> Result<String> {
  let trimmed = text.trim();
  if trimmed.is_empty() {
    return Err(Error::EmptyText);
  }
  Ok(trimmed.to_owned())
}

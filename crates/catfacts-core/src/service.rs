//! The `FactService` trait: the remote collaborator the manager talks to.
//!
//! Implemented by `catfacts-client` over HTTP and by
//! [`MemoryService`](crate::memory::MemoryService) in process. The manager
//! depends on this abstraction, never on a transport.

use std::future::Future;

use crate::fact::{FactId, RemoteFact, Suggestion};

// ─── Create result ───────────────────────────────────────────────────────────

/// What the service made of a create request that it answered successfully
/// at the transport level.
///
/// A duplicate is a normal answer, not an error: services report it with a
/// success status and a `DUPLICATE_FACT` code in the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
  /// Stored, and the stored record was echoed back.
  Created(RemoteFact),
  /// Stored, but the response carried no record.
  Accepted,
  /// The same text is already in the collection; nothing was stored.
  Duplicate { message: Option<String> },
  /// Refused for any other reason.
  Rejected {
    code:    Option<String>,
    message: Option<String>,
  },
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the remote fact service.
///
/// `Err` means the request did not produce a usable answer: the service was
/// unreachable, returned a non-success status, or sent a body that could not
/// be decoded. Answers the service gave on purpose (duplicates, rejections)
/// come back as `Ok`.
///
/// All methods return `Send` futures so a manager can be driven from spawned
/// tokio tasks.
pub trait FactService: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the whole collection in the order the service reports it.
  fn list_facts(
    &self,
  ) -> impl Future<Output = Result<Vec<RemoteFact>, Self::Error>> + Send + '_;

  /// Submit already-trimmed fact text.
  fn create_fact<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<CreateOutcome, Self::Error>> + Send + 'a;

  /// Remove a fact. Only called when the manager runs with remote deletes
  /// enabled.
  fn delete_fact(
    &self,
    id: FactId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Fetch one suggested fact. Nothing is stored by this call.
  fn random_fact(
    &self,
  ) -> impl Future<Output = Result<Suggestion, Self::Error>> + Send + '_;
}

impl<S: FactService> FactService for std::sync::Arc<S> {
  type Error = S::Error;

  fn list_facts(
    &self,
  ) -> impl Future<Output = Result<Vec<RemoteFact>, Self::Error>> + Send + '_ {
    (**self).list_facts()
  }

  fn create_fact<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<CreateOutcome, Self::Error>> + Send + 'a {
    (**self).create_fact(text)
  }

  fn delete_fact(
    &self,
    id: FactId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_ {
    (**self).delete_fact(id)
  }

  fn random_fact(
    &self,
  ) -> impl Future<Output = Result<Suggestion, Self::Error>> + Send + '_ {
    (**self).random_fact()
  }
}

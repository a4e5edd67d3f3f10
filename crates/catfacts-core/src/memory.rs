//! [`MemoryService`]: an in-process implementation of [`FactService`].
//!
//! Behaves like the HTTP service (unique text, ids assigned in insertion
//! order, duplicates reported as a normal answer) and adds switches for
//! simulating an unreachable service or failing writes. Useful for tests and
//! for running the front-end without a backend.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::{
  Error, Result,
  fact::{FactId, RemoteFact, Suggestion},
  service::{CreateOutcome, FactService},
};

/// Suggestions served when none are configured.
pub const DEFAULT_SUGGESTIONS: &[&str] = &[
  "Cats sleep for around 13 to 16 hours a day.",
  "A group of cats is called a clowder.",
  "Cats have five toes on their front paws but only four on the back.",
  "A cat's purr vibrates at a frequency between 25 and 150 hertz.",
  "Cats can rotate their ears 180 degrees.",
  "The oldest known pet cat was found in a 9,500-year-old grave in Cyprus.",
  "Adult cats only meow to communicate with humans.",
  "A cat's nose print is unique, much like a human fingerprint.",
];

#[derive(Debug, Default)]
struct Inner {
  facts:           Vec<RemoteFact>,
  next_id:         FactId,
  suggestions:     Vec<String>,
  next_suggestion: usize,
  offline:         bool,
  failing_writes:  bool,
  calls:           Calls,
}

/// How many times each operation has been called, including failed calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Calls {
  pub list:   usize,
  pub create: usize,
  pub delete: usize,
  pub random: usize,
}

#[derive(Debug)]
pub struct MemoryService {
  inner: Mutex<Inner>,
}

impl Default for MemoryService {
  fn default() -> Self { Self::new() }
}

impl MemoryService {
  /// An empty service with the default suggestion list.
  pub fn new() -> Self {
    Self {
      inner: Mutex::new(Inner {
        next_id: 1,
        suggestions: DEFAULT_SUGGESTIONS.iter().map(|s| (*s).to_owned()).collect(),
        ..Inner::default()
      }),
    }
  }

  /// A service already holding `texts`, stored in order.
  pub fn with_facts<I, T>(texts: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Into<String>,
  {
    let service = Self::new();
    for text in texts {
      service.insert(text);
    }
    service
  }

  /// Replace the suggestion list served by `random_fact`, cycled in order.
  pub fn with_suggestions<I, T>(self, suggestions: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Into<String>,
  {
    {
      let mut inner = self.inner();
      inner.suggestions = suggestions.into_iter().map(Into::into).collect();
      inner.next_suggestion = 0;
    }
    self
  }

  fn inner(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Store `text` directly, bypassing duplicate checks, as another client
  /// would. Returns the assigned id.
  pub fn insert(&self, text: impl Into<String>) -> FactId {
    let mut inner = self.inner();
    let id = inner.next_id;
    inner.next_id += 1;
    inner.facts.push(RemoteFact {
      id,
      fact: text.into(),
      created_at: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    });
    id
  }

  /// Remove `id` directly, as another client would.
  pub fn remove(&self, id: FactId) -> bool {
    let mut inner = self.inner();
    let before = inner.facts.len();
    inner.facts.retain(|f| f.id != id);
    inner.facts.len() != before
  }

  /// Every call fails as if the service were unreachable.
  pub fn set_offline(&self, offline: bool) { self.inner().offline = offline; }

  /// Creates are rejected and deletes fail; reads keep working.
  pub fn set_failing_writes(&self, failing: bool) { self.inner().failing_writes = failing; }

  pub fn calls(&self) -> Calls { self.inner().calls }

  /// Stored ids in order.
  pub fn ids(&self) -> Vec<FactId> { self.inner().facts.iter().map(|f| f.id).collect() }

  pub fn len(&self) -> usize { self.inner().facts.len() }

  pub fn is_empty(&self) -> bool { self.inner().facts.is_empty() }
}

impl FactService for MemoryService {
  type Error = Error;

  async fn list_facts(&self) -> Result<Vec<RemoteFact>> {
    let mut inner = self.inner();
    inner.calls.list += 1;
    if inner.offline {
      return Err(Error::Unavailable);
    }
    Ok(inner.facts.clone())
  }

  async fn create_fact(&self, text: &str) -> Result<CreateOutcome> {
    {
      let mut inner = self.inner();
      inner.calls.create += 1;
      if inner.offline {
        return Err(Error::Unavailable);
      }
      if inner.failing_writes {
        return Ok(CreateOutcome::Rejected {
          code:    Some("DATABASE_ERROR".into()),
          message: Some("write failed".into()),
        });
      }
      if text.trim().is_empty() {
        return Ok(CreateOutcome::Rejected {
          code:    Some("INVALID_FACT".into()),
          message: Some("Fact cannot be empty".into()),
        });
      }
      if inner.facts.iter().any(|f| f.fact == text) {
        return Ok(CreateOutcome::Duplicate {
          message: Some("Duplicate fact: this cat fact already exists".into()),
        });
      }
    }

    let id = self.insert(text);
    let inner = self.inner();
    let record = inner.facts.iter().find(|f| f.id == id).cloned();
    Ok(record.map_or(CreateOutcome::Accepted, CreateOutcome::Created))
  }

  async fn delete_fact(&self, id: FactId) -> Result<()> {
    {
      let mut inner = self.inner();
      inner.calls.delete += 1;
      if inner.offline {
        return Err(Error::Unavailable);
      }
      if inner.failing_writes {
        return Err(Error::Rejected("write failed".into()));
      }
    }
    if self.remove(id) {
      Ok(())
    } else {
      Err(Error::FactNotFound(id))
    }
  }

  async fn random_fact(&self) -> Result<Suggestion> {
    let mut inner = self.inner();
    inner.calls.random += 1;
    if inner.offline {
      return Err(Error::Unavailable);
    }
    if inner.suggestions.is_empty() {
      return Err(Error::NoSuggestions);
    }
    let index = inner.next_suggestion % inner.suggestions.len();
    inner.next_suggestion += 1;
    Ok(Suggestion {
      fact: inner.suggestions[index].clone(),
    })
  }
}

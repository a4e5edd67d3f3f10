//! The notification sink: where user-facing messages go.
//!
//! Delivery is fire-and-forget. The manager never reads anything back from a
//! [`Notifier`].

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Success,
  Warning,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
  pub severity: Severity,
  pub message:  String,
}

pub trait Notifier: Send + Sync {
  fn notify(&self, severity: Severity, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
  fn notify(&self, severity: Severity, message: &str) {
    (**self).notify(severity, message)
  }
}

/// Deliver to both sinks, left first.
impl<A: Notifier, B: Notifier> Notifier for (A, B) {
  fn notify(&self, severity: Severity, message: &str) {
    self.0.notify(severity, message);
    self.1.notify(severity, message);
  }
}

// ─── Sinks ───────────────────────────────────────────────────────────────────

/// Writes every notification to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
  fn notify(&self, severity: Severity, message: &str) {
    match severity {
      Severity::Success => tracing::info!(target: "catfacts::notify", "{message}"),
      Severity::Warning => tracing::warn!(target: "catfacts::notify", "{message}"),
      Severity::Error => tracing::error!(target: "catfacts::notify", "{message}"),
    }
  }
}

/// Buffers notifications until a front-end drains them.
#[derive(Debug, Default)]
pub struct NotificationLog {
  entries: Mutex<Vec<Notification>>,
}

impl NotificationLog {
  pub fn new() -> Self { Self::default() }

  /// Remove and return everything buffered so far, oldest first.
  pub fn drain(&self) -> Vec<Notification> {
    std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
  }

  /// Copy of the buffer without clearing it.
  pub fn snapshot(&self) -> Vec<Notification> {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
  }
}

impl Notifier for NotificationLog {
  fn notify(&self, severity: Severity, message: &str) {
    self
      .entries
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .push(Notification {
        severity,
        message: message.to_owned(),
      });
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn log_drains_in_order() {
    let log = NotificationLog::new();
    log.notify(Severity::Success, "added");
    log.notify(Severity::Warning, "duplicate");

    let drained = log.drain();
    assert_eq!(drained.len(), 2);
    assert_eq!(drained[0].severity, Severity::Success);
    assert_eq!(drained[1].message, "duplicate");
    assert!(log.drain().is_empty());
  }

  #[test]
  fn pair_delivers_to_both() {
    let left = Arc::new(NotificationLog::new());
    let right = Arc::new(NotificationLog::new());
    let both = (Arc::clone(&left), Arc::clone(&right));

    both.notify(Severity::Error, "offline");

    assert_eq!(left.snapshot().len(), 1);
    assert_eq!(right.snapshot().len(), 1);
  }
}

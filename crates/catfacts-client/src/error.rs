//! Error types for `catfacts-client`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client")]
  Build(#[source] reqwest::Error),

  #[error("{endpoint} failed")]
  Request {
    endpoint: String,
    #[source]
    source:   reqwest::Error,
  },

  #[error("{endpoint} → {status}")]
  Status {
    endpoint: String,
    status:   reqwest::StatusCode,
  },

  #[error("decoding response from {endpoint}")]
  Decode {
    endpoint: String,
    #[source]
    source:   serde_json::Error,
  },
}

impl Error {
  /// `true` when the service could not be reached at all.
  pub fn is_unreachable(&self) -> bool {
    matches!(self, Self::Request { source, .. } if source.is_connect() || source.is_timeout())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Response bodies as different service revisions send them.
//!
//! Older revisions answer `GET /facts` with a bare array and `POST /facts`
//! with the stored record; newer ones wrap both in a
//! `{success, data, error, message}` envelope. Both shapes decode here and
//! fold into the same typed results, so no caller has to sniff JSON.

use serde::{Deserialize, Serialize};

use crate::{fact::RemoteFact, service::CreateOutcome};

/// Error code a service uses to report that the text already exists.
pub const DUPLICATE_FACT: &str = "DUPLICATE_FACT";

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListBody {
  Plain(Vec<RemoteFact>),
  Envelope { data: Vec<RemoteFact> },
}

impl ListBody {
  pub fn into_facts(self) -> Vec<RemoteFact> {
    match self {
      Self::Plain(facts) | Self::Envelope { data: facts } => facts,
    }
  }
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEnvelope {
  pub success: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data:    Option<RemoteFact>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

impl CreateEnvelope {
  pub fn created(record: RemoteFact) -> Self {
    Self {
      success: true,
      data: Some(record),
      message: Some("Cat fact successfully added".into()),
      ..Self::default()
    }
  }

  pub fn duplicate() -> Self {
    Self {
      error: Some(DUPLICATE_FACT.into()),
      message: Some("Duplicate fact: this cat fact already exists".into()),
      ..Self::default()
    }
  }

  pub fn rejected(code: &str, message: impl Into<String>) -> Self {
    Self {
      error: Some(code.into()),
      message: Some(message.into()),
      ..Self::default()
    }
  }
}

/// `Envelope` is tried first; a bare record has no `success` field and
/// falls through to `Record`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreateBody {
  Envelope(CreateEnvelope),
  Record(RemoteFact),
}

impl From<CreateBody> for CreateOutcome {
  fn from(body: CreateBody) -> Self {
    match body {
      CreateBody::Record(record) => Self::Created(record),
      CreateBody::Envelope(env) if env.success => match env.data {
        Some(record) => Self::Created(record),
        None => Self::Accepted,
      },
      CreateBody::Envelope(env) if env.error.as_deref() == Some(DUPLICATE_FACT) => {
        Self::Duplicate { message: env.message }
      }
      CreateBody::Envelope(env) => Self::Rejected {
        code:    env.error,
        message: env.message,
      },
    }
  }
}

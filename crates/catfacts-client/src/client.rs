//! Async HTTP client for the cat fact service.

use std::time::Duration;

use catfacts_core::{
  fact::{FactId, RemoteFact, Suggestion},
  service::{CreateOutcome, FactService},
  wire::{CreateBody, CreateEnvelope, ListBody},
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_FACTS_PATH: &str = "/facts";

/// Connection settings for the fact service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
  pub base_url:   String,
  /// Where the collection is mounted, e.g. `/facts` or `/api/facts`.
  pub facts_path: String,
  /// `None` keeps the transport default (no timeout).
  pub timeout:    Option<Duration>,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url:   DEFAULT_BASE_URL.to_owned(),
      facts_path: DEFAULT_FACTS_PATH.to_owned(),
      timeout:    None,
    }
  }
}

/// [`FactService`] over HTTP.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct HttpFactService {
  client: Client,
  config: ApiConfig,
}

impl HttpFactService {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.timeout {
      builder = builder.timeout(timeout);
    }
    let client = builder.build().map_err(Error::Build)?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &ApiConfig { &self.config }

  fn url(&self, suffix: &str) -> String {
    format!(
      "{}/{}{}",
      self.config.base_url.trim_end_matches('/'),
      self.config.facts_path.trim_matches('/'),
      suffix
    )
  }

  async fn send(&self, endpoint: &str, req: reqwest::RequestBuilder) -> Result<Response> {
    debug!(endpoint, "sending request");
    req.send().await.map_err(|source| Error::Request {
      endpoint: endpoint.to_owned(),
      source,
    })
  }

  async fn body<T: DeserializeOwned>(endpoint: &str, resp: Response) -> Result<T> {
    let bytes = resp.bytes().await.map_err(|source| Error::Request {
      endpoint: endpoint.to_owned(),
      source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
      endpoint: endpoint.to_owned(),
      source,
    })
  }

  fn ensure_success(endpoint: &str, resp: &Response) -> Result<()> {
    if resp.status().is_success() {
      Ok(())
    } else {
      Err(Error::Status {
        endpoint: endpoint.to_owned(),
        status:   resp.status(),
      })
    }
  }

  // ── Collection ────────────────────────────────────────────────────────────

  /// `GET {facts_path}`
  pub async fn list(&self) -> Result<Vec<RemoteFact>> {
    let endpoint = format!("GET {}", self.config.facts_path);
    let resp = self.send(&endpoint, self.client.get(self.url(""))).await?;
    Self::ensure_success(&endpoint, &resp)?;
    let body: ListBody = Self::body(&endpoint, resp).await?;
    Ok(body.into_facts())
  }

  /// `POST {facts_path}` with the text as the `fact` form field.
  ///
  /// Some deployments answer a duplicate or invalid fact with a 4xx status
  /// and the usual envelope; such a body is still classified rather than
  /// reported as a transport failure.
  pub async fn create(&self, text: &str) -> Result<CreateOutcome> {
    let endpoint = format!("POST {}", self.config.facts_path);
    let resp = self
      .send(&endpoint, self.client.post(self.url("")).form(&[("fact", text)]))
      .await?;

    let status = resp.status();
    if status.is_success() {
      let body: CreateBody = Self::body(&endpoint, resp).await?;
      return Ok(body.into());
    }

    match Self::body::<CreateEnvelope>(&endpoint, resp).await {
      Ok(envelope) if envelope.error.is_some() => {
        debug!(%status, code = ?envelope.error, "create answered with an error envelope");
        Ok(CreateBody::Envelope(envelope).into())
      }
      _ => Err(Error::Status { endpoint, status }),
    }
  }

  /// `DELETE {facts_path}/{id}`
  pub async fn delete(&self, id: FactId) -> Result<()> {
    let endpoint = format!("DELETE {}/{id}", self.config.facts_path);
    let resp = self
      .send(&endpoint, self.client.delete(self.url(&format!("/{id}"))))
      .await?;
    Self::ensure_success(&endpoint, &resp)
  }

  /// `GET {facts_path}/random`
  pub async fn random(&self) -> Result<Suggestion> {
    let endpoint = format!("GET {}/random", self.config.facts_path);
    let resp = self
      .send(&endpoint, self.client.get(self.url("/random")))
      .await?;
    Self::ensure_success(&endpoint, &resp)?;
    Self::body(&endpoint, resp).await
  }
}

impl FactService for HttpFactService {
  type Error = Error;

  async fn list_facts(&self) -> Result<Vec<RemoteFact>> { self.list().await }

  async fn create_fact(&self, text: &str) -> Result<CreateOutcome> { self.create(text).await }

  async fn delete_fact(&self, id: FactId) -> Result<()> { self.delete(id).await }

  async fn random_fact(&self) -> Result<Suggestion> { self.random().await }
}

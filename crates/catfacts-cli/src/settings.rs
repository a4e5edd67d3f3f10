//! Layered settings: optional TOML file, then `CATFACTS_*` environment
//! variables, then command-line flags.

use std::{num::NonZeroUsize, path::Path, time::Duration};

use anyhow::{Context as _, Result};
use catfacts_client::{
  ApiConfig,
  client::{DEFAULT_BASE_URL, DEFAULT_FACTS_PATH},
};
use catfacts_core::{DeleteMode, ManagerConfig, manager::DEFAULT_PAGE_SIZE, overlay::FavoriteRetention};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub base_url:           String,
  pub facts_path:         String,
  pub page_size:          usize,
  pub delete_mode:        DeleteMode,
  pub favorite_retention: FavoriteRetention,
  pub timeout_secs:       Option<u64>,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      base_url:           DEFAULT_BASE_URL.to_owned(),
      facts_path:         DEFAULT_FACTS_PATH.to_owned(),
      page_size:          DEFAULT_PAGE_SIZE.get(),
      delete_mode:        DeleteMode::default(),
      favorite_retention: FavoriteRetention::default(),
      timeout_secs:       None,
    }
  }
}

/// Values given on the command line. `None`/`false` leaves the file or
/// environment value in place.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
  pub base_url:        Option<String>,
  pub facts_path:      Option<String>,
  pub page_size:       Option<usize>,
  pub timeout_secs:    Option<u64>,
  pub local_delete:    bool,
  pub reset_favorites: bool,
}

impl Settings {
  /// Read `path` if it exists, then the environment.
  pub fn load(path: &Path) -> Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("CATFACTS"))
      .build()
      .with_context(|| format!("reading settings from {}", path.display()))?
      .try_deserialize()
      .context("invalid settings")
  }

  pub fn apply(mut self, overrides: Overrides) -> Self {
    if let Some(url) = overrides.base_url {
      self.base_url = url;
    }
    if let Some(path) = overrides.facts_path {
      self.facts_path = path;
    }
    if let Some(size) = overrides.page_size {
      self.page_size = size;
    }
    if let Some(secs) = overrides.timeout_secs {
      self.timeout_secs = Some(secs);
    }
    if overrides.local_delete {
      self.delete_mode = DeleteMode::LocalOnly;
    }
    if overrides.reset_favorites {
      self.favorite_retention = FavoriteRetention::ResetOnReload;
    }
    self
  }

  pub fn manager_config(&self) -> Result<ManagerConfig> {
    let page_size = NonZeroUsize::new(self.page_size).context("page_size must be at least 1")?;
    Ok(ManagerConfig {
      page_size,
      delete_mode: self.delete_mode,
      favorite_retention: self.favorite_retention,
    })
  }

  pub fn api_config(&self) -> ApiConfig {
    ApiConfig {
      base_url:   self.base_url.clone(),
      facts_path: self.facts_path.clone(),
      timeout:    self.timeout_secs.map(Duration::from_secs),
    }
  }
}

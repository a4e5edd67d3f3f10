//! HTTP implementation of [`catfacts_core::service::FactService`].

pub mod client;
pub mod error;

pub use client::{ApiConfig, HttpFactService};
pub use error::{Error, Result};

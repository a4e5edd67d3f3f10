//! Core types and the view-state manager for the cat fact tracker.
//!
//! This crate has no HTTP dependencies. The remote service
//! is reached through the [`service::FactService`] trait and user-facing
//! messages leave through the [`notify::Notifier`] trait; concrete
//! implementations live in other crates (or in [`memory`] for tests and
//! demos).

pub mod error;
pub mod fact;
pub mod intent;
pub mod manager;
pub mod memory;
pub mod notify;
pub mod outcome;
pub mod overlay;
pub mod service;
pub mod view;
pub mod wire;

pub use error::{Error, ErrorKind, Result};
pub use manager::{DeleteMode, FactManager, ManagerConfig};

#[cfg(test)]
mod tests;

//! Repository implementations module.
//!
//! This module contains the implementations of the `TaskRepository` trait:
//! - `local`: In-memory implementation for unit testing and local development
//! - `rest`: Client for the task backend's REST API
pub mod local;
#[cfg(feature = "rest-repo")]
pub mod rest;

pub use local::LocalRepository;
#[cfg(feature = "rest-repo")]
pub use rest::RestRepository;

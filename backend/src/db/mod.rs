//! Task storage behind the calendar.
//!
//! The calendar never owns task data; it reads and updates the records held
//! by the task backend through the [`TaskRepository`] trait.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP layer / calendar adapter                          │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - concurrent fetch + normalization                     │
//! │  - resource list assembly                               │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/)                         │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                │
//! ┌───▼──────────────┐     ┌───────────▼─────────────┐
//! │ Local Repository │     │ Rest Repository         │
//! │ (in-memory)      │     │ (task backend API)      │
//! └──────────────────┘     └─────────────────────────┘
//! ```

pub mod config;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

pub use config::RestConfig;
pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "rest-repo")]
pub use repositories::RestRepository;
pub use repository::{ErrorContext, RepositoryError, RepositoryResult, TaskRepository};
pub use services::{change_status, health_check, list_resources, load_calendar_events};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn TaskRepository>> = OnceLock::new();

/// Initialize the global repository from the environment.
///
/// A `repository.toml` in a standard location takes precedence over
/// `REPOSITORY_TYPE` and the `KITCHEN_API_*` variables.
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo = match RepositoryConfig::from_default_location() {
        Ok(config) => RepositoryFactory::from_repository_config(&config),
        Err(_) => RepositoryFactory::from_env(),
    }
    .map_err(|e| anyhow::Error::msg(e.to_string()))?;

    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn TaskRepository>> {
    if REPOSITORY.get().is_none() {
        init_repository()?;
    }

    REPOSITORY
        .get()
        .context("Repository not initialized. Call init_repository() first.")
}

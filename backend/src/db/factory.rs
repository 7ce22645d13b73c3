//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating and configuring repository instances
//! based on runtime configuration.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::config::RestConfig;
use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "rest-repo")]
use super::repositories::RestRepository;
use super::repository::{RepositoryError, RepositoryResult, TaskRepository};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory local repository
    Local,
    /// Remote task backend over REST
    Rest,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("local", "rest", "remote").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            "rest" | "remote" => Ok(Self::Rest),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE`. Without it, defaults to Rest when
    /// `KITCHEN_API_URL` is set, otherwise Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().unwrap_or_else(|e| {
                log::warn!("{}; falling back to local repository", e);
                Self::Local
            });
        }

        if std::env::var("KITCHEN_API_URL").is_ok() {
            Self::Rest
        } else {
            Self::Local
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```ignore
/// use kitchen_calendar::db::{RepositoryFactory, RepositoryType, RestConfig};
///
/// let config = RestConfig::new("https://kitchen.example.com/api").with_token("secret");
/// let repo = RepositoryFactory::create(RepositoryType::Rest, Some(&config))?;
/// let local = RepositoryFactory::create_local();
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `rest_config` - Connection settings (required for Rest)
    pub fn create(
        repo_type: RepositoryType,
        rest_config: Option<&RestConfig>,
    ) -> RepositoryResult<Arc<dyn TaskRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Rest => {
                let config = rest_config.ok_or_else(|| {
                    RepositoryError::configuration("Rest repository requires RestConfig")
                })?;
                Self::create_rest(config)
            }
        }
    }

    /// Create a REST repository.
    #[cfg(feature = "rest-repo")]
    pub fn create_rest(config: &RestConfig) -> RepositoryResult<Arc<dyn TaskRepository>> {
        log::info!("Using rest repository at {}", config.base_url);
        let repo = RestRepository::new(config.clone())?;
        Ok(Arc::new(repo))
    }

    /// Create a REST repository when the feature is disabled.
    #[cfg(not(feature = "rest-repo"))]
    pub fn create_rest(_config: &RestConfig) -> RepositoryResult<Arc<dyn TaskRepository>> {
        Err(RepositoryError::configuration(
            "Rest repository feature not enabled",
        ))
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn TaskRepository> {
        log::info!("Using in-memory local repository");
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration.
    ///
    /// Reads `REPOSITORY_TYPE` and, for Rest, the `KITCHEN_API_*` variables.
    pub fn from_env() -> RepositoryResult<Arc<dyn TaskRepository>> {
        match RepositoryType::from_env() {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Rest => {
                let config = RestConfig::from_env()?;
                Self::create_rest(&config)
            }
        }
    }

    /// Create repository from a TOML configuration file.
    pub fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn TaskRepository>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config)
    }

    /// Create repository from a RepositoryConfig instance.
    pub fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn TaskRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Rest => {
                let rest_config = config.to_rest_config()?.ok_or_else(|| {
                    RepositoryError::configuration(
                        "Rest repository requires a [rest] section with base_url",
                    )
                })?;
                Self::create_rest(&rest_config)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_type_from_str() {
        assert_eq!(
            RepositoryType::from_str("local").unwrap(),
            RepositoryType::Local
        );
        assert_eq!(
            RepositoryType::from_str("REST").unwrap(),
            RepositoryType::Rest
        );
        assert_eq!(
            RepositoryType::from_str("remote").unwrap(),
            RepositoryType::Rest
        );
        assert!(RepositoryType::from_str("postgres").is_err());
    }

    #[tokio::test]
    async fn test_create_local_repository() {
        let repo = RepositoryFactory::create_local();
        assert!(repo.health_check().await.unwrap());
    }

    #[test]
    fn test_rest_requires_config() {
        let result = RepositoryFactory::create(RepositoryType::Rest, None);
        assert!(matches!(
            result,
            Err(RepositoryError::ConfigurationError { .. })
        ));
    }
}

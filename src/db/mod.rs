//! Data access layer: repository traits, backends, and the service API.
//!
//! The repository pattern keeps storage pluggable: handlers and services
//! work against `dyn FullRepository`, and the concrete backend (in-memory
//! or Postgres) is selected at startup via [`factory::RepositoryFactory`].

#[cfg(not(any(feature = "local-repo", feature = "postgres-repo")))]
compile_error!("At least one repository backend feature must be enabled: `local-repo` or `postgres-repo`");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;


use std::sync::{Arc, OnceLock};

pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::{PostgresConfig, PostgresRepository};
pub use repository::{
    ErrorContext, ExerciseLookup, FullRepository, RepositoryError, RepositoryResult, SetRepository,
    UserLookup,
};
pub use services::{BulkCreateError, BulkCreateOutcome};

static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

/// Initialize the process-wide repository from environment configuration.
///
/// Idempotent: the first call wins and later calls return the already
/// installed instance.
pub fn init_repository() -> RepositoryResult<Arc<dyn FullRepository>> {
    if let Some(repo) = REPOSITORY.get() {
        return Ok(repo.clone());
    }

    let repo = RepositoryFactory::from_env()?;
    Ok(REPOSITORY.get_or_init(|| repo).clone())
}

/// Install a specific repository instance as the process-wide repository.
///
/// Returns an error if a repository was already installed.
pub fn set_repository(repo: Arc<dyn FullRepository>) -> RepositoryResult<()> {
    REPOSITORY
        .set(repo)
        .map_err(|_| RepositoryError::configuration("Repository already initialized"))
}

/// Get the process-wide repository, if initialized.
pub fn get_repository() -> RepositoryResult<Arc<dyn FullRepository>> {
    REPOSITORY
        .get()
        .cloned()
        .ok_or_else(|| RepositoryError::configuration("Repository not initialized"))
}

//! Repository configuration file support.
//!
//! Reads the repository backend selection (and Postgres connection settings)
//! from a `repository.toml` file, as an alternative to environment variables.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;
#[cfg(feature = "postgres-repo")]
use super::repositories::PostgresConfig;

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub postgres: PostgresSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// Postgres connection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostgresSettings {
    #[serde(default)]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

impl RepositoryConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        toml::from_str(&contents).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to parse {}: {}",
                path.as_ref().display(),
                e
            ))
        })
    }

    /// Load configuration from the first `repository.toml` found in the
    /// standard locations (working directory, then `config/`).
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        for candidate in Self::default_locations() {
            if candidate.exists() {
                return Self::from_file(candidate);
            }
        }
        Err(RepositoryError::configuration(
            "No repository.toml found in standard locations",
        ))
    }

    fn default_locations() -> Vec<PathBuf> {
        vec![
            PathBuf::from("repository.toml"),
            PathBuf::from("config/repository.toml"),
        ]
    }

    /// Parse the configured repository type.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Build a Postgres configuration from the file settings, if present.
    #[cfg(feature = "postgres-repo")]
    pub fn to_postgres_config(&self) -> Result<Option<PostgresConfig>, RepositoryError> {
        if self.postgres.database_url.is_empty() {
            return Ok(None);
        }

        Ok(Some(PostgresConfig {
            database_url: self.postgres.database_url.clone(),
            max_pool_size: self.postgres.max_connections,
            min_pool_size: self.postgres.min_connections,
            connection_timeout_sec: self.postgres.connect_timeout,
            idle_timeout_sec: self.postgres.idle_timeout,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_config() {
        let config: RepositoryConfig = toml::from_str(
            r#"
            [repository]
            type = "local"
            "#,
        )
        .unwrap();

        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert_eq!(config.postgres.max_connections, 0); // serde default struct
    }

    #[test]
    fn test_parse_postgres_config() {
        let config: RepositoryConfig = toml::from_str(
            r#"
            [repository]
            type = "postgres"

            [postgres]
            database_url = "postgres://localhost/gymlog"
            max_connections = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.repository_type().unwrap(), RepositoryType::Postgres);
        assert_eq!(config.postgres.database_url, "postgres://localhost/gymlog");
        assert_eq!(config.postgres.max_connections, 5);
    }

    #[test]
    fn test_invalid_type_rejected() {
        let config: RepositoryConfig = toml::from_str(
            r#"
            [repository]
            type = "mongo"
            "#,
        )
        .unwrap();
        assert!(config.repository_type().is_err());
    }
}

//! Clinic configuration.
//!
//! Loaded from JSON; every field has a default so an empty object is a valid
//! config. Environment variables override the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::DEFAULT_LOG_FILTER;

/// Overrides [`ClinicConfig::database_path`].
pub const DATABASE_PATH_ENV: &str = "VITALPAW_DATABASE_PATH";
/// Overrides [`ClinicConfig::log_filter`].
pub const LOG_FILTER_ENV: &str = "VITALPAW_LOG";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Administrator created on first start if no user has this email.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminSeed {
    pub external_id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub gender: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClinicConfig {
    /// SQLite file; in-memory when unset
    pub database_path: Option<PathBuf>,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Balance granted to newly registered clients
    pub starting_vital_coins: i64,
    /// Insert the default catalogue into an empty shop on open
    pub seed_products: bool,
    /// Size of the recent purchases feed
    pub recent_purchases_limit: usize,
    pub bootstrap_admin: Option<AdminSeed>,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            starting_vital_coins: 100,
            seed_products: true,
            recent_purchases_limit: 5,
            bootstrap_admin: None,
        }
    }
}

impl ClinicConfig {
    /// Read and validate a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `VITALPAW_DATABASE_PATH` and `VITALPAW_LOG` when set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(DATABASE_PATH_ENV).ok(),
            std::env::var(LOG_FILTER_ENV).ok(),
        )
    }

    fn with_overrides(mut self, database_path: Option<String>, log_filter: Option<String>) -> Self {
        if let Some(path) = database_path.filter(|p| !p.trim().is_empty()) {
            self.database_path = Some(PathBuf::from(path));
        }
        if let Some(filter) = log_filter.filter(|f| !f.trim().is_empty()) {
            self.log_filter = filter;
        }
        self
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.starting_vital_coins < 0 {
            return Err(ConfigError::Invalid(
                "starting_vital_coins must not be negative".into(),
            ));
        }
        if let Some(admin) = &self.bootstrap_admin {
            if admin.external_id.trim().is_empty() || admin.email.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "bootstrap_admin needs external_id and email".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = ClinicConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ClinicConfig::default());
        assert_eq!(config.log_filter, "vitalpaw_core=info");
        assert_eq!(config.starting_vital_coins, 100);
        assert!(config.seed_products);
        assert_eq!(config.recent_purchases_limit, 5);
    }

    #[test]
    fn test_partial_override() {
        let config = ClinicConfig::from_json_str(
            r#"{
                "starting_vital_coins": 250,
                "seed_products": false,
                "bootstrap_admin": {
                    "external_id": "auth0|admin",
                    "email": "admin@vitalpaw.test",
                    "name": "Admin"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.starting_vital_coins, 250);
        assert!(!config.seed_products);
        let admin = config.bootstrap_admin.unwrap();
        assert_eq!(admin.email, "admin@vitalpaw.test");
        assert_eq!(admin.gender, "");
    }

    #[test]
    fn test_rejects_negative_balance() {
        let err = ClinicConfig::from_json_str(r#"{"starting_vital_coins": -1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = ClinicConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"database_path": "/var/lib/vitalpaw/clinic.db"}}"#).unwrap();

        let config = ClinicConfig::load(file.path()).unwrap();
        assert_eq!(
            config.database_path,
            Some(PathBuf::from("/var/lib/vitalpaw/clinic.db"))
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClinicConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_overrides_skip_empty_values() {
        let config = ClinicConfig::default().with_overrides(
            Some("/tmp/clinic.db".into()),
            Some("  ".into()),
        );
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/clinic.db")));
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }
}

//! Process configuration read from the environment.
//!
//! # Responsibility
//! - Resolve database location, bind address, logging and feature flags once
//!   at startup.
//! - Derive a local default database when `DATABASE_URL` is absent.
//!
//! # Invariants
//! - Configuration is read once; later environment changes are not observed.
//! - Unsupported database URL schemes are rejected, never silently remapped.

use crate::flags::FeatureFlags;
use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Fixed application name used for derived defaults.
pub const APP_NAME: &str = "noteshelf";

pub const ENV_ENVIRONMENT: &str = "NOTESHELF_ENV";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_BIND: &str = "NOTESHELF_BIND";
pub const ENV_LOG_LEVEL: &str = "NOTESHELF_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "NOTESHELF_LOG_DIR";

const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_LOG_SUBDIR: &str = "log";
const MEMORY_URLS: [&str; 2] = ["sqlite::memory:", ":memory:"];

#[derive(Debug)]
pub enum ConfigError {
    UnsupportedDatabaseUrl(String),
    EmptyDatabasePath,
    CurrentDir(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedDatabaseUrl(url) => {
                write!(f, "unsupported database url `{url}`; expected sqlite://<path>")
            }
            Self::EmptyDatabasePath => write!(f, "database url has an empty path"),
            Self::CurrentDir(err) => write!(f, "cannot resolve working directory: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentDir(err) => Some(err),
            _ => None,
        }
    }
}

/// Where the SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

impl DatabaseLocation {
    /// Parses a `DATABASE_URL` value.
    ///
    /// Accepts `sqlite::memory:`, `:memory:`, `sqlite://<path>`,
    /// `sqlite:<path>` and bare filesystem paths.
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let trimmed = url.trim();
        if MEMORY_URLS.contains(&trimmed) {
            return Ok(Self::Memory);
        }

        let path = if let Some(rest) = trimmed.strip_prefix("sqlite://") {
            rest
        } else if let Some(rest) = trimmed.strip_prefix("sqlite:") {
            rest
        } else if trimmed.contains("://") {
            return Err(ConfigError::UnsupportedDatabaseUrl(trimmed.to_string()));
        } else {
            trimmed
        };

        if path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }
        Ok(Self::File(PathBuf::from(path)))
    }

    /// Short label for log events.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File(_) => "file",
        }
    }
}

/// Derived connection URL when `DATABASE_URL` is not set.
pub fn default_database_url(environment: &str) -> String {
    format!("sqlite://{APP_NAME}_{environment}.sqlite3")
}

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub database_url: String,
    pub database: DatabaseLocation,
    pub bind_addr: String,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub flags: FeatureFlags,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        Self::from_lookup(&cwd, |name| std::env::var(name).ok())
    }

    /// Resolves configuration from an arbitrary variable source.
    ///
    /// `base_dir` anchors the default log directory.
    pub fn from_lookup<F>(base_dir: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let environment =
            non_empty(ENV_ENVIRONMENT).unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
        let database_url =
            non_empty(ENV_DATABASE_URL).unwrap_or_else(|| default_database_url(&environment));
        let database = DatabaseLocation::parse(&database_url)?;

        Ok(Self {
            bind_addr: non_empty(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string()),
            log_level: non_empty(ENV_LOG_LEVEL)
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: non_empty(ENV_LOG_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| base_dir.join(DEFAULT_LOG_SUBDIR)),
            flags: FeatureFlags::from_lookup(&lookup),
            environment,
            database_url,
            database,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{default_database_url, AppConfig, ConfigError, DatabaseLocation};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(Path::new("/srv/noteshelf"), |name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_derive_database_from_environment_name() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.environment, "development");
        assert_eq!(config.database_url, "sqlite://noteshelf_development.sqlite3");
        assert_eq!(
            config.database,
            DatabaseLocation::File(PathBuf::from("noteshelf_development.sqlite3"))
        );
        assert_eq!(config.log_dir, PathBuf::from("/srv/noteshelf/log"));
        assert!(!config.flags.dependency_upgraded_next);
    }

    #[test]
    fn test_environment_gets_its_own_database() {
        let config = config_from(&[("NOTESHELF_ENV", "test")]).unwrap();
        assert_eq!(config.database_url, default_database_url("test"));
        assert!(config.database_url.ends_with("noteshelf_test.sqlite3"));
    }

    #[test]
    fn explicit_database_url_wins() {
        let config = config_from(&[
            ("NOTESHELF_ENV", "test"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("DEPENDENCY_UPGRADED_NEXT", "true"),
        ])
        .unwrap();
        assert_eq!(config.database, DatabaseLocation::Memory);
        assert!(config.flags.dependency_upgraded_next);
    }

    #[test]
    fn parse_accepts_supported_forms() {
        assert_eq!(
            DatabaseLocation::parse(":memory:").unwrap(),
            DatabaseLocation::Memory
        );
        assert_eq!(
            DatabaseLocation::parse("sqlite:data/notes.db").unwrap(),
            DatabaseLocation::File(PathBuf::from("data/notes.db"))
        );
        assert_eq!(
            DatabaseLocation::parse("sqlite:///var/lib/notes.db").unwrap(),
            DatabaseLocation::File(PathBuf::from("/var/lib/notes.db"))
        );
        assert_eq!(
            DatabaseLocation::parse("notes.db").unwrap(),
            DatabaseLocation::File(PathBuf::from("notes.db"))
        );
    }

    #[test]
    fn parse_rejects_foreign_schemes_and_empty_paths() {
        let err = DatabaseLocation::parse("postgres://localhost/notes").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedDatabaseUrl(_)));
        let err = DatabaseLocation::parse("sqlite://").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyDatabasePath));
    }
}

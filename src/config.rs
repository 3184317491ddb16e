//! Configuration file handling for database connections.
//!
//! This module provides loading and parsing of `.mysql_wrapper.json`
//! configuration files and merges them with command-line overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::db::ConnectionConfig;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".mysql_wrapper.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level configuration file structure.
///
/// ```json
/// {
///   "database": {
///     "username": "app",
///     "password": "secret",
///     "database": "shop",
///     "host": "localhost",
///     "port": 3306
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: ConnectionConfig,
}

impl ConfigFile {
    /// Load `.mysql_wrapper.json` from the current directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."))
    }

    /// Load `.mysql_wrapper.json` from `dir`.
    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);

        if !path.exists() {
            return Err(ConfigError::NotFound { path });
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Invalid { path, source })
    }
}

/// Connection settings given explicitly (flags or environment).
///
/// Anything left `None` falls back to the configuration file, then to the
/// defaults of [`ConnectionConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl ConnectionOverrides {
    /// Apply these overrides on top of `base`.
    pub fn apply(&self, mut base: ConnectionConfig) -> ConnectionConfig {
        if let Some(host) = &self.host {
            base.host = host.clone();
        }
        if let Some(port) = self.port {
            base.port = port;
        }
        if let Some(user) = &self.user {
            base.username = user.clone();
        }
        if let Some(password) = &self.password {
            base.password = password.clone();
        }
        if let Some(database) = &self.database {
            base.database = database.clone();
        }
        base
    }

    /// Resolve against the configuration file in `dir`.
    ///
    /// Priority: overrides > config file > defaults. A missing file is not an
    /// error; an unreadable or malformed one is.
    pub fn resolve_in(&self, dir: &Path) -> Result<ConnectionConfig, ConfigError> {
        let base = match ConfigFile::load_from(dir) {
            Ok(file) => file.database,
            Err(ConfigError::NotFound { .. }) => ConnectionConfig::default(),
            Err(e) => return Err(e),
        };
        Ok(self.apply(base))
    }

    /// Resolve against the configuration file in the current directory.
    pub fn resolve(&self) -> Result<ConnectionConfig, ConfigError> {
        self.resolve_in(Path::new("."))
    }
}

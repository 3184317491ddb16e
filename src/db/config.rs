//! Connection settings for a MySQL session.

use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3306;

/// Everything needed to open one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(alias = "user")]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub database: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            database: String::new(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ConnectionConfig {
    /// Settings for `database` on the default host.
    pub fn new(username: &str, password: &str, database: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            database: database.to_string(),
            ..Self::default()
        }
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Driver options for this configuration.
    ///
    /// The statement cache is disabled: every prepared statement is closed
    /// after its single execution.
    pub(crate) fn to_opts(&self) -> mysql::Opts {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        mysql::OptsBuilder::new()
            .ip_or_hostname(Some(self.host.clone()))
            .tcp_port(self.port)
            .user(non_empty(&self.username))
            .pass(non_empty(&self.password))
            .db_name(non_empty(&self.database))
            .stmt_cache_size(0_usize)
            .into()
    }
}

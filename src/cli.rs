//! CLI argument definitions.
//!
//! This module contains the top-level CLI structure and shared types.
//! Individual command definitions are in the `commands` module.

use clap::{Args as ClapArgs, Parser};

use crate::commands::Command;
use crate::config::{ConfigError, ConnectionOverrides};
use crate::db::ConnectionConfig;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection settings. Unset values fall back to `.mysql_wrapper.json`,
/// then to `localhost:3306`.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Database server host
    #[arg(long, env = "MYSQL_HOST", global = true)]
    pub host: Option<String>,

    /// Database server port
    #[arg(long, env = "MYSQL_PORT", global = true)]
    pub port: Option<u16>,

    /// Username to connect as
    #[arg(short, long, env = "MYSQL_USER", global = true)]
    pub user: Option<String>,

    /// Password for the user
    #[arg(short, long, env = "MYSQL_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Database (schema) name
    #[arg(short, long, env = "MYSQL_DATABASE", global = true)]
    pub database: Option<String>,
}

impl ConnectionArgs {
    pub fn overrides(&self) -> ConnectionOverrides {
        ConnectionOverrides {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
        }
    }

    /// Merge these flags with the configuration file in the current directory.
    pub fn resolve(&self) -> Result<ConnectionConfig, ConfigError> {
        self.overrides().resolve()
    }
}

//! Command definitions and implementations.
//!
//! Each command is defined in its own module with:
//! - The command struct with clap attributes for CLI parsing
//! - An `execute` module producing a serializable result
//! - An `output` module implementing table formatting for that result

mod escape;
mod query;
mod send;

pub use escape::EscapeCmd;
pub use query::QueryCmd;
pub use send::SendCmd;

use clap::Subcommand;
use std::error::Error;
use tracing::debug;

use crate::db::{Database, Param, Params};
use crate::output::{OutputFormat, Outputable};

/// Trait for executing commands with command-specific result types.
pub trait Execute {
    type Output: Outputable;

    fn execute(self, db: &mut dyn Database) -> Result<Self::Output, Box<dyn Error>>;
}

/// Trait for commands that can execute and format their output.
pub trait CommandRunner {
    fn run(self, db: &mut dyn Database, format: OutputFormat) -> Result<String, Box<dyn Error>>;
}

impl<T: Execute> CommandRunner for T {
    fn run(self, db: &mut dyn Database, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        let result = self.execute(db)?;
        Ok(result.format(format))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a statement and print the rows it returns
    Query(QueryCmd),

    /// Run a statement for its effect and print affected rows / insert ID
    Send(SendCmd),

    /// Escape a value for use inside a quoted SQL literal
    Escape(EscapeCmd),
}

impl Command {
    /// Execute the command and return formatted output
    pub fn run(self, db: &mut dyn Database, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        debug!(backend = db.backend_name(), command = ?self, "running command");
        match self {
            Command::Query(cmd) => cmd.run(db, format),
            Command::Send(cmd) => cmd.run(db, format),
            Command::Escape(cmd) => cmd.run(db, format),
        }
    }
}

/// Build prepared-statement parameters from raw `--param` values.
///
/// Returns `None` when no parameters were given, meaning the statement runs
/// as a plain query.
pub(crate) fn params_from_args(raw: &[String]) -> Option<Params> {
    if raw.is_empty() {
        return None;
    }
    Some(raw.iter().map(|r| Param::infer_from_str(r)).collect())
}

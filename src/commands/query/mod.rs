mod execute;
mod output;

pub use execute::{QueryResult, QueryRows};

use clap::Args;

/// Run a statement and print the rows it returns
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  mysql_wrapper query 'SELECT id, name FROM users'                  # Rows keyed by column
  mysql_wrapper query 'SELECT id, name FROM users' --numeric        # Positional rows
  mysql_wrapper query 'SELECT * FROM users WHERE id = ?' --param 1  # Prepared statement")]
pub struct QueryCmd {
    /// SQL statement to run
    pub sql: String,

    /// Return rows as positional values instead of column-keyed maps
    #[arg(short, long, default_value_t = false)]
    pub numeric: bool,

    /// Positional parameter for a prepared statement (repeatable)
    #[arg(long = "param", value_name = "VALUE")]
    pub params: Vec<String>,
}

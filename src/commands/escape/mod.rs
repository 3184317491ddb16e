mod cli_tests;
mod execute;
mod output;

pub use execute::EscapeResult;

use clap::Args;

/// Escape a value for use inside a quoted SQL literal
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  mysql_wrapper escape \"O'Brien\"      # O\\'Brien
  mysql_wrapper escape 'line1
line2'                                 # line1\\nline2")]
pub struct EscapeCmd {
    /// Text to escape
    pub input: String,
}

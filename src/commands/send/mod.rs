mod execute;
mod output;

pub use execute::SendResult;

use clap::Args;

/// Run a statement for its effect
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  mysql_wrapper send \"DELETE FROM sessions WHERE expired = 1\"
  mysql_wrapper send \"UPDATE t SET x = ? WHERE id = ?\" --param 5 --param 1
  mysql_wrapper send \"INSERT INTO users (name) VALUES (?)\" --param alice")]
pub struct SendCmd {
    /// SQL statement to run
    pub sql: String,

    /// Positional parameter for a prepared statement (repeatable)
    #[arg(long = "param", value_name = "VALUE")]
    pub params: Vec<String>,
}

//! mysql_wrapper library - thin convenience layer over a MySQL connection
//!
//! Provides the `MysqlDatabase` connection wrapper with its process-wide query
//! log, plus the command execution and output formatting infrastructure used by
//! the `mysql_wrapper` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod output;

#[macro_use]
pub mod test_macros;

#[cfg(test)]
pub mod test_utils;

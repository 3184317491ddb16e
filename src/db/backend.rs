//! The query surface shared by every database handle.
//!
//! `MysqlDatabase` is the only production implementation. Commands take
//! `&mut dyn Database` so they can run against a test double.

use std::fmt::Display;

use super::log::QueryLog;
use super::param::Params;
use super::value::{AssocRow, Fetch, NumericRow, Outcome};
use super::DbError;

/// Trait for database handles that run SQL on one session.
pub trait Database {
    /// Execute a statement for its effect.
    ///
    /// Returns `Outcome::Applied` if it produced a result set or affected
    /// at least one row, `Outcome::NoEffect` if it affected none.
    fn send_query(&mut self, sql: &str) -> Result<Outcome, DbError>;

    /// Execute a statement and return its rows keyed by column name.
    fn get_query(&mut self, sql: &str) -> Result<Fetch<AssocRow>, DbError>;

    /// Execute a statement and return its rows as positional values.
    fn get_query_numeric(&mut self, sql: &str) -> Result<Fetch<NumericRow>, DbError>;

    /// Prepare, bind and execute a statement for its effect.
    ///
    /// Returns `Outcome::Applied` iff the statement affected at least one row.
    fn send_prepared_query(&mut self, sql: &str, params: Params) -> Result<Outcome, DbError>;

    /// Prepare, bind and execute a statement, returning rows keyed by column name.
    fn get_prepared_query(&mut self, sql: &str, params: Params) -> Result<Vec<AssocRow>, DbError>;

    /// Prepare, bind and execute a statement, returning positional rows.
    fn get_prepared_query_numeric(
        &mut self,
        sql: &str,
        params: Params,
    ) -> Result<Vec<NumericRow>, DbError>;

    /// Affected rows of the most recent statement; 0 if none ran or it failed.
    fn affected_rows(&self) -> u64;

    /// Last auto-generated ID, or `None` if the last statement generated none.
    fn insert_id(&self) -> Option<u64>;

    /// Escape the string form of `input` for use inside a quoted SQL literal.
    fn clean(&self, input: &dyn Display) -> Result<String, DbError>;

    /// Release the session. Every later call fails with `DbError::ConnectionClosed`.
    fn close_connection(&mut self);

    /// The log this handle records statements into.
    fn query_log(&self) -> &QueryLog;

    /// Get the backend name for logging/debugging.
    fn backend_name(&self) -> &'static str;

    /// Statements submitted through every handle sharing this log.
    fn total_query_count(&self) -> u64 {
        self.query_log().count()
    }

    /// SQL text submitted through every handle sharing this log, oldest first.
    fn all_queries(&self) -> Vec<String> {
        self.query_log().queries()
    }
}

//! MySQL wrapper: a thin, synchronous query interface over the `mysql` driver.
//!
//! This module provides the database layer for the crate:
//! - Connection management (one `mysql::Conn` per `MysqlDatabase`)
//! - Plain and prepared statement execution with positional parameter binding
//! - Result row extraction as associative or numeric rows
//! - A shared query log and counter across every connection that holds it
//!
//! # Type Decisions
//!
//! **Why `Outcome` instead of `bool` for `send_query`?**
//! A statement either changed something, changed nothing, or failed. The first
//! two are both successes, so they live in `Ok(Outcome)` and only the driver
//! failure travels through `Err(DbError)`.
//!
//! **Why `Param` as a tagged enum?**
//! MySQL binds every parameter as a float, an integer or a string. Encoding
//! that choice in the type moves bind-type inference to the call site, where
//! `From` impls resolve it statically. `Params::push_any` keeps a dynamic
//! escape hatch for values whose type is only known at runtime.
//!
//! **Why normalise driver values by column type?**
//! The text protocol returns every cell as bytes while the binary protocol
//! returns typed values. Normalising both against the column metadata means
//! `get_query` and `get_prepared_query` produce the same `Value` for the same
//! column.

mod backend;
mod config;
mod connection;
mod escape;
mod log;
mod param;
mod value;

pub use backend::Database;
pub use config::{ConnectionConfig, DEFAULT_HOST, DEFAULT_PORT};
pub use connection::MysqlDatabase;
pub use escape::escape_literal;
pub use log::QueryLog;
pub use param::{Param, Params};
pub use value::{AssocRow, Fetch, NumericRow, Outcome, Value};

use thiserror::Error;

/// Client error: unknown driver failure.
pub const CR_UNKNOWN_ERROR: u16 = 2000;
/// Client error: can't connect to the server.
pub const CR_CONN_HOST_ERROR: u16 = 2003;
/// Client error: lost connection to the server during a query.
pub const CR_SERVER_LOST: u16 = 2013;
/// Client error: no data supplied for the parameters of a prepared statement.
pub const CR_PARAMS_NOT_BOUND: u16 = 2031;
/// Client error: parameter count does not match the prepared statement.
pub const CR_INVALID_PARAMETER_NO: u16 = 2034;

/// Coarse classification of [`DbError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised only while establishing the session.
    Connection,
    /// Raised for any failed statement, preparation or binding.
    Query,
}

/// Database error types
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Could not connect to database: {message}")]
    ConnectionFailed { code: u16, message: String },

    #[error("Invalid query. Errorno: {code}. Error text: {message} for query: {query}")]
    QueryFailed {
        code: u16,
        message: String,
        query: String,
    },

    #[error("Parameter {position} cannot be converted to a string, it is of type: {type_name}")]
    UnbindableParam {
        position: usize,
        type_name: String,
        query: String,
    },

    #[error("Database connection is closed")]
    ConnectionClosed,
}

impl DbError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConnectionFailed { .. } => ErrorKind::Connection,
            _ => ErrorKind::Query,
        }
    }

    /// Driver error code, if the error came from the driver.
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::ConnectionFailed { code, .. } | Self::QueryFailed { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The SQL text the error refers to, if any.
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::QueryFailed { query, .. } | Self::UnbindableParam { query, .. } => Some(query),
            _ => None,
        }
    }

    pub(crate) fn from_driver(error: &mysql::Error, query: &str) -> Self {
        let (code, message) = driver_code_and_message(error, CR_SERVER_LOST);
        Self::QueryFailed {
            code,
            message,
            query: query.to_string(),
        }
    }

    pub(crate) fn connect_failed(error: &mysql::Error) -> Self {
        let (code, message) = driver_code_and_message(error, CR_CONN_HOST_ERROR);
        Self::ConnectionFailed { code, message }
    }
}

/// Split a driver error into a numeric code and its text.
///
/// Server errors keep the server code. I/O failures use `io_code`, anything
/// else raised on the client side uses `CR_UNKNOWN_ERROR`.
fn driver_code_and_message(error: &mysql::Error, io_code: u16) -> (u16, String) {
    match error {
        mysql::Error::MySqlError(e) => (e.code, e.message.clone()),
        mysql::Error::IoError(e) => (io_code, e.to_string()),
        other => (CR_UNKNOWN_ERROR, other.to_string()),
    }
}

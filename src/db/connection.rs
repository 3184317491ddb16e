//! Database connection management and statement execution.

use std::fmt::Display;
use std::sync::Arc;

use mysql::prelude::{Protocol, Queryable};
use mysql::{Conn, QueryResult, Row, Statement};
use tracing::{debug, info, warn};

use super::backend::Database;
use super::config::ConnectionConfig;
use super::escape::escape_literal;
use super::log::QueryLog;
use super::param::Params;
use super::value::{assoc_row, numeric_row, AssocRow, Fetch, NumericRow, Outcome};
use super::{DbError, CR_INVALID_PARAMETER_NO, CR_PARAMS_NOT_BOUND};

/// Metadata of the most recent statement on a connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LastStatement {
    affected_rows: u64,
    insert_id: Option<u64>,
}

/// A prepared statement with its parameters checked and converted.
struct BoundStatement {
    statement: Statement,
    signature: String,
    values: Vec<mysql::Value>,
}

/// One MySQL session.
///
/// Owns its `mysql::Conn` exclusively and records every submitted statement
/// in a shared [`QueryLog`].
pub struct MysqlDatabase {
    conn: Option<Conn>,
    log: Arc<QueryLog>,
    last: LastStatement,
}

impl MysqlDatabase {
    /// Open a session that records into the process-wide query log.
    pub fn connect(config: &ConnectionConfig) -> Result<Self, DbError> {
        Self::connect_with_log(config, QueryLog::global())
    }

    /// Open a session that records into `log`.
    pub fn connect_with_log(config: &ConnectionConfig, log: Arc<QueryLog>) -> Result<Self, DbError> {
        let conn = Conn::new(config.to_opts()).map_err(|e| {
            let err = DbError::connect_failed(&e);
            warn!(host = %config.host, port = config.port, error = %err, "connection failed");
            err
        })?;

        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "connected"
        );

        Ok(Self {
            conn: Some(conn),
            log,
            last: LastStatement::default(),
        })
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// The native driver handle, for anything this wrapper does not cover.
    pub fn raw_connection(&mut self) -> Result<&mut Conn, DbError> {
        self.conn.as_mut().ok_or(DbError::ConnectionClosed)
    }

    /// Run a plain (text protocol) statement.
    fn run_plain<R>(&mut self, sql: &str, convert: fn(Row) -> R) -> Result<Fetch<R>, DbError> {
        let conn = self.conn.as_mut().ok_or(DbError::ConnectionClosed)?;
        self.log.record(sql);
        debug!(sql, "executing query");

        let result = conn
            .query_iter(sql)
            .and_then(|result| collect_result(result, convert));
        self.finish(sql, result)
    }

    /// Prepare, bind and run a statement once, then close it.
    fn run_prepared<R>(
        &mut self,
        sql: &str,
        params: Params,
        convert: fn(Row) -> R,
    ) -> Result<Fetch<R>, DbError> {
        let conn = self.conn.as_mut().ok_or(DbError::ConnectionClosed)?;
        self.log.record(sql);

        let bound = match bind_statement(conn, sql, params) {
            Ok(bound) => bound,
            Err(err) => {
                warn!(sql, error = %err, "statement binding failed");
                self.last = LastStatement::default();
                return Err(err);
            }
        };
        debug!(sql, signature = %bound.signature, "executing prepared statement");

        let result = execute_bound(conn, bound, convert);
        self.finish(sql, result)
    }

    /// Store the statement metadata, or reset it and translate the driver error.
    fn finish<T>(
        &mut self,
        sql: &str,
        result: mysql::Result<(T, LastStatement)>,
    ) -> Result<T, DbError> {
        match result {
            Ok((value, last)) => {
                self.last = last;
                Ok(value)
            }
            Err(e) => {
                self.last = LastStatement::default();
                let err = DbError::from_driver(&e, sql);
                warn!(error = %err, "query failed");
                Err(err)
            }
        }
    }
}

/// Prepare `sql` and check `params` against it.
///
/// The statement is closed again if the parameters cannot be bound.
fn bind_statement(conn: &mut Conn, sql: &str, params: Params) -> Result<BoundStatement, DbError> {
    let statement = conn.prep(sql).map_err(|e| DbError::from_driver(&e, sql))?;

    let bound = params
        .resolve(sql)
        .and_then(|(signature, values)| check_param_count(&statement, sql, signature, values));

    match bound {
        Ok((signature, values)) => Ok(BoundStatement {
            statement,
            signature,
            values,
        }),
        Err(err) => {
            if let Err(close_err) = conn.close(statement) {
                debug!(error = %close_err, "failed to close unbound statement");
            }
            Err(err)
        }
    }
}

fn check_param_count(
    statement: &Statement,
    sql: &str,
    signature: String,
    values: Vec<mysql::Value>,
) -> Result<(String, Vec<mysql::Value>), DbError> {
    let expected = usize::from(statement.num_params());
    if values.len() == expected {
        return Ok((signature, values));
    }

    let (code, message) = if values.is_empty() {
        (
            CR_PARAMS_NOT_BOUND,
            "No data supplied for parameters in prepared statement".to_string(),
        )
    } else {
        (
            CR_INVALID_PARAMETER_NO,
            format!(
                "Invalid parameter number: statement expects {}, got {}",
                expected,
                values.len()
            ),
        )
    };

    Err(DbError::QueryFailed {
        code,
        message,
        query: sql.to_string(),
    })
}

fn execute_bound<R>(
    conn: &mut Conn,
    bound: BoundStatement,
    convert: fn(Row) -> R,
) -> mysql::Result<(Fetch<R>, LastStatement)> {
    let params = if bound.values.is_empty() {
        mysql::Params::Empty
    } else {
        mysql::Params::Positional(bound.values)
    };

    let outcome = conn
        .exec_iter(&bound.statement, params)
        .and_then(|result| collect_result(result, convert));
    let closed = conn.close(bound.statement);
    keep_outcome(outcome, closed)
}

/// The statement already ran, so a failed close only gets logged.
fn keep_outcome<T>(outcome: mysql::Result<T>, closed: mysql::Result<()>) -> mysql::Result<T> {
    if let Err(close_err) = closed {
        debug!(error = %close_err, "failed to close executed statement");
    }
    outcome
}

/// Drain the first result set of a statement.
///
/// For result sets the affected-row count is the number of rows returned
/// and there is no insert ID.
fn collect_result<P: Protocol, R>(
    mut result: QueryResult<'_, '_, '_, P>,
    convert: fn(Row) -> R,
) -> mysql::Result<(Fetch<R>, LastStatement)> {
    if result.columns().as_ref().is_empty() {
        let last = LastStatement {
            affected_rows: result.affected_rows(),
            insert_id: result.last_insert_id().filter(|id| *id != 0),
        };
        return Ok((Fetch::Executed, last));
    }

    let rows = result
        .by_ref()
        .map(|row| row.map(convert))
        .collect::<mysql::Result<Vec<R>>>()?;

    let last = LastStatement {
        affected_rows: rows.len() as u64,
        insert_id: None,
    };
    Ok((Fetch::Rows(rows), last))
}

impl Database for MysqlDatabase {
    fn send_query(&mut self, sql: &str) -> Result<Outcome, DbError> {
        match self.run_plain(sql, drop)? {
            Fetch::Rows(_) => Ok(Outcome::Applied),
            Fetch::Executed => Ok(Outcome::from_affected(self.last.affected_rows)),
        }
    }

    fn get_query(&mut self, sql: &str) -> Result<Fetch<AssocRow>, DbError> {
        self.run_plain(sql, assoc_row)
    }

    fn get_query_numeric(&mut self, sql: &str) -> Result<Fetch<NumericRow>, DbError> {
        self.run_plain(sql, numeric_row)
    }

    fn send_prepared_query(&mut self, sql: &str, params: Params) -> Result<Outcome, DbError> {
        self.run_prepared(sql, params, drop)?;
        Ok(Outcome::from_affected(self.last.affected_rows))
    }

    fn get_prepared_query(&mut self, sql: &str, params: Params) -> Result<Vec<AssocRow>, DbError> {
        Ok(self.run_prepared(sql, params, assoc_row)?.into_rows())
    }

    fn get_prepared_query_numeric(
        &mut self,
        sql: &str,
        params: Params,
    ) -> Result<Vec<NumericRow>, DbError> {
        Ok(self.run_prepared(sql, params, numeric_row)?.into_rows())
    }

    fn affected_rows(&self) -> u64 {
        self.last.affected_rows
    }

    fn insert_id(&self) -> Option<u64> {
        self.last.insert_id
    }

    fn clean(&self, input: &dyn Display) -> Result<String, DbError> {
        let conn = self.conn.as_ref().ok_or(DbError::ConnectionClosed)?;
        Ok(escape_literal(&input.to_string(), conn.no_backslash_escape()))
    }

    fn close_connection(&mut self) {
        if self.conn.take().is_some() {
            info!("connection closed");
        }
    }

    fn query_log(&self) -> &QueryLog {
        &self.log
    }

    fn backend_name(&self) -> &'static str {
        "mysql"
    }
}

//! Shared test utilities for execute and output tests.
//!
//! This module provides `MockDatabase`, a scripted `Database` implementation
//! that lets command tests run without a MySQL server.

use std::fmt::Display;

use crate::db::{
    escape_literal, AssocRow, Database, DbError, Fetch, NumericRow, Outcome, Params, QueryLog,
    Value,
};

/// One call received by a `MockDatabase`.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub method: &'static str,
    pub sql: String,
    /// Bind type signature for prepared calls.
    pub signature: Option<String>,
}

/// Scripted stand-in for a live connection.
///
/// Every query-running method records its SQL in the mock's own `QueryLog`
/// and replays the configured response.
#[derive(Debug, Default)]
pub struct MockDatabase {
    log: QueryLog,
    /// Rows returned by the `get_*` methods.
    pub rows: Vec<AssocRow>,
    /// Make plain `get_query*` calls report a statement without a result set.
    pub executed_only: bool,
    /// Affected-row count reported by statements without a result set.
    pub affected: u64,
    /// Insert ID reported by statements without a result set.
    pub generated_id: Option<u64>,
    /// Driver error code every query call fails with, if set.
    pub fail_with: Option<u16>,
    pub calls: Vec<MockCall>,
    closed: bool,
    last_affected: u64,
    last_insert_id: Option<u64>,
}

impl MockDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock whose `get_*` calls return `rows`.
    pub fn with_rows(rows: Vec<AssocRow>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Mock whose statements affect `affected` rows and generate `generated_id`.
    pub fn with_effect(affected: u64, generated_id: Option<u64>) -> Self {
        Self {
            affected,
            generated_id,
            executed_only: true,
            ..Self::default()
        }
    }

    /// Mock whose query calls fail with driver error `code`.
    pub fn failing(code: u16) -> Self {
        Self {
            fail_with: Some(code),
            ..Self::default()
        }
    }

    fn submit(
        &mut self,
        method: &'static str,
        sql: &str,
        params: Option<Params>,
    ) -> Result<(), DbError> {
        if self.closed {
            return Err(DbError::ConnectionClosed);
        }
        self.log.record(sql);

        let signature = match params {
            Some(params) => Some(
                params
                    .type_signature()
                    .ok_or_else(|| DbError::UnbindableParam {
                        position: 0,
                        type_name: "unknown".to_string(),
                        query: sql.to_string(),
                    })?,
            ),
            None => None,
        };
        self.calls.push(MockCall {
            method,
            sql: sql.to_string(),
            signature,
        });

        if let Some(code) = self.fail_with {
            self.last_affected = 0;
            self.last_insert_id = None;
            return Err(DbError::QueryFailed {
                code,
                message: "mock failure".to_string(),
                query: sql.to_string(),
            });
        }
        Ok(())
    }

    fn fetch_assoc(&mut self) -> Fetch<AssocRow> {
        if self.executed_only {
            self.last_affected = self.affected;
            self.last_insert_id = self.generated_id;
            Fetch::Executed
        } else {
            self.last_affected = self.rows.len() as u64;
            self.last_insert_id = None;
            Fetch::Rows(self.rows.clone())
        }
    }

    fn fetch_numeric(&mut self) -> Fetch<NumericRow> {
        match self.fetch_assoc() {
            Fetch::Rows(rows) => Fetch::Rows(
                rows.into_iter()
                    .map(|row| row.into_values().collect())
                    .collect(),
            ),
            Fetch::Executed => Fetch::Executed,
        }
    }

    fn outcome(&mut self) -> Outcome {
        match self.fetch_assoc() {
            Fetch::Rows(_) => Outcome::Applied,
            Fetch::Executed => Outcome::from_affected(self.last_affected),
        }
    }
}

impl Database for MockDatabase {
    fn send_query(&mut self, sql: &str) -> Result<Outcome, DbError> {
        self.submit("send_query", sql, None)?;
        Ok(self.outcome())
    }

    fn get_query(&mut self, sql: &str) -> Result<Fetch<AssocRow>, DbError> {
        self.submit("get_query", sql, None)?;
        Ok(self.fetch_assoc())
    }

    fn get_query_numeric(&mut self, sql: &str) -> Result<Fetch<NumericRow>, DbError> {
        self.submit("get_query_numeric", sql, None)?;
        Ok(self.fetch_numeric())
    }

    fn send_prepared_query(&mut self, sql: &str, params: Params) -> Result<Outcome, DbError> {
        self.submit("send_prepared_query", sql, Some(params))?;
        self.fetch_assoc();
        Ok(Outcome::from_affected(self.last_affected))
    }

    fn get_prepared_query(&mut self, sql: &str, params: Params) -> Result<Vec<AssocRow>, DbError> {
        self.submit("get_prepared_query", sql, Some(params))?;
        Ok(self.fetch_assoc().into_rows())
    }

    fn get_prepared_query_numeric(
        &mut self,
        sql: &str,
        params: Params,
    ) -> Result<Vec<NumericRow>, DbError> {
        self.submit("get_prepared_query_numeric", sql, Some(params))?;
        Ok(self.fetch_numeric().into_rows())
    }

    fn affected_rows(&self) -> u64 {
        self.last_affected
    }

    fn insert_id(&self) -> Option<u64> {
        self.last_insert_id
    }

    fn clean(&self, input: &dyn Display) -> Result<String, DbError> {
        if self.closed {
            return Err(DbError::ConnectionClosed);
        }
        Ok(escape_literal(&input.to_string(), false))
    }

    fn close_connection(&mut self) {
        self.closed = true;
    }

    fn query_log(&self) -> &QueryLog {
        &self.log
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}

/// Build an associative row from `(column, value)` pairs.
pub fn assoc(pairs: &[(&str, Value)]) -> AssocRow {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

/// The two-row `users` table used across command tests.
pub fn users_rows() -> Vec<AssocRow> {
    vec![
        assoc(&[("id", Value::Int(1)), ("name", Value::Str("a".to_string()))]),
        assoc(&[("id", Value::Int(2)), ("name", Value::Str("b".to_string()))]),
    ]
}

use std::error::Error;

use serde::Serialize;

use super::QueryCmd;
use crate::commands::{params_from_args, Execute};
use crate::db::{AssocRow, Database, Fetch, NumericRow};

/// Rows in the shape the caller asked for.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QueryRows {
    Assoc(Vec<AssocRow>),
    Numeric(Vec<NumericRow>),
}

impl QueryRows {
    pub fn len(&self) -> usize {
        match self {
            QueryRows::Assoc(rows) => rows.len(),
            QueryRows::Numeric(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of the query command execution
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub query: String,
    pub prepared: bool,
    /// False when the statement succeeded without producing a result set.
    pub has_result_set: bool,
    pub rows: QueryRows,
    pub affected_rows: u64,
    pub total_queries: u64,
}

impl Execute for QueryCmd {
    type Output = QueryResult;

    fn execute(self, db: &mut dyn Database) -> Result<Self::Output, Box<dyn Error>> {
        let params = params_from_args(&self.params);
        let prepared = params.is_some();

        let (has_result_set, rows) = match (params, self.numeric) {
            (Some(params), false) => (true, QueryRows::Assoc(db.get_prepared_query(&self.sql, params)?)),
            (Some(params), true) => (
                true,
                QueryRows::Numeric(db.get_prepared_query_numeric(&self.sql, params)?),
            ),
            (None, false) => match db.get_query(&self.sql)? {
                Fetch::Rows(rows) => (true, QueryRows::Assoc(rows)),
                Fetch::Executed => (false, QueryRows::Assoc(Vec::new())),
            },
            (None, true) => match db.get_query_numeric(&self.sql)? {
                Fetch::Rows(rows) => (true, QueryRows::Numeric(rows)),
                Fetch::Executed => (false, QueryRows::Numeric(Vec::new())),
            },
        };

        Ok(QueryResult {
            query: self.sql,
            prepared,
            has_result_set,
            rows,
            affected_rows: db.affected_rows(),
            total_queries: db.total_query_count(),
        })
    }
}

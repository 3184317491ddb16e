use std::error::Error;

use serde::Serialize;

use super::SendCmd;
use crate::commands::{params_from_args, Execute};
use crate::db::{Database, Outcome};

/// Result of the send command execution
#[derive(Debug, Clone, Serialize)]
pub struct SendResult {
    pub query: String,
    pub prepared: bool,
    pub outcome: Outcome,
    pub affected_rows: u64,
    pub insert_id: Option<u64>,
    pub total_queries: u64,
}

impl Execute for SendCmd {
    type Output = SendResult;

    fn execute(self, db: &mut dyn Database) -> Result<Self::Output, Box<dyn Error>> {
        let (prepared, outcome) = match params_from_args(&self.params) {
            Some(params) => (true, db.send_prepared_query(&self.sql, params)?),
            None => (false, db.send_query(&self.sql)?),
        };

        Ok(SendResult {
            query: self.sql,
            prepared,
            outcome,
            affected_rows: db.affected_rows(),
            insert_id: db.insert_id(),
            total_queries: db.total_query_count(),
        })
    }
}

use std::error::Error;

use serde::Serialize;

use super::EscapeCmd;
use crate::commands::Execute;
use crate::db::Database;

/// Result of the escape command execution
#[derive(Debug, Clone, Serialize)]
pub struct EscapeResult {
    pub input: String,
    pub escaped: String,
}

impl Execute for EscapeCmd {
    type Output = EscapeResult;

    fn execute(self, db: &mut dyn Database) -> Result<Self::Output, Box<dyn Error>> {
        let escaped = db.clean(&self.input)?;
        Ok(EscapeResult {
            input: self.input,
            escaped,
        })
    }
}

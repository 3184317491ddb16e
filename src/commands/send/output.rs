//! Output formatting for send command results.

use super::execute::SendResult;
use crate::output::Outputable;

impl Outputable for SendResult {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        let kind = if self.prepared { "Prepared statement" } else { "Statement" };
        lines.push(format!("{}: {}", kind, self.query));
        lines.push(String::new());

        if self.outcome.applied() {
            lines.push("Applied.".to_string());
        } else {
            lines.push("No rows affected.".to_string());
        }
        lines.push(format!("Affected rows: {}", self.affected_rows));
        if let Some(id) = self.insert_id {
            lines.push(format!("Insert ID: {}", id));
        }
        lines.push(format!("Total queries: {}", self.total_queries));

        lines.join("\n")
    }
}

//! Output formatting for query command results.

use super::execute::{QueryResult, QueryRows};
use crate::db::Value;
use crate::output::{render_grid, Outputable};

impl Outputable for QueryResult {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        let kind = if self.prepared { "Prepared query" } else { "Query" };
        lines.push(format!("{}: {}", kind, self.query));
        lines.push(String::new());

        if !self.has_result_set {
            lines.push(format!(
                "Statement executed, no result set ({} row(s) affected).",
                self.affected_rows
            ));
            return lines.join("\n");
        }

        if self.rows.is_empty() {
            lines.push("No rows.".to_string());
            return lines.join("\n");
        }

        let (headers, values): (Vec<String>, Vec<Vec<Value>>) = match &self.rows {
            QueryRows::Assoc(rows) => {
                let headers = rows[0].keys().cloned().collect();
                let values = rows.iter().map(|row| row.values().cloned().collect()).collect();
                (headers, values)
            }
            QueryRows::Numeric(rows) => {
                let width = rows.iter().map(Vec::len).max().unwrap_or(0);
                let headers = (0..width).map(|i| i.to_string()).collect();
                (headers, rows.clone())
            }
        };

        lines.extend(render_grid(&headers, &values));
        lines.push(String::new());
        lines.push(format!("{} row(s)", self.rows.len()));

        lines.join("\n")
    }
}

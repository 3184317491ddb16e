//! Shared record of every statement submitted through a connection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

/// Counter and ordered log of submitted SQL.
///
/// Connections hold an `Arc<QueryLog>`, so any number of them can share one
/// log. `QueryLog::global()` is the process-wide instance that
/// `MysqlDatabase::connect` uses.
#[derive(Debug, Default)]
pub struct QueryLog {
    count: AtomicU64,
    queries: Mutex<Vec<String>>,
}

impl QueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide log.
    pub fn global() -> Arc<QueryLog> {
        static GLOBAL: OnceLock<Arc<QueryLog>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(QueryLog::new())))
    }

    /// Record one submitted statement.
    pub fn record(&self, sql: &str) {
        // A poisoned lock only means another thread panicked mid-push; the Vec is still valid.
        let mut queries = self.queries.lock().unwrap_or_else(|e| e.into_inner());
        queries.push(sql.to_string());
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of statements recorded so far.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }

    /// Snapshot of the recorded statements, oldest first.
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

//! Server-held memory of the most recently accepted query.
//!
//! One slot per deployment, shared by every client: the auto-refresh loop
//! re-executes whatever was accepted last. Concurrent submissions race and
//! the last writer wins — acceptable for a single-operator dashboard and
//! deliberately not papered over with ordering machinery.

use tokio::sync::RwLock;

pub struct SessionState {
    last_sql: RwLock<String>,
}

impl SessionState {
    /// Seed the slot with the (already sanitized) default query so `last`
    /// always has something to re-execute.
    pub fn new(default_query: String) -> Self {
        Self { last_sql: RwLock::new(default_query) }
    }

    /// Unconditionally overwrite the slot. Only sanitized text may be
    /// submitted; rejected queries never reach this point.
    pub async fn submit(&self, sql: String) {
        *self.last_sql.write().await = sql;
    }

    pub async fn last(&self) -> String {
        self.last_sql.read().await.clone()
    }
}

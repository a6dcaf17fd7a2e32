//! Shared application state handed to every handler.
//!
//! # Invariants
//! - Exactly one store connection exists per process; it is opened by the
//!   caller and moved in through `AppState::new`.
//! - Store work runs on the blocking pool while holding the connection lock
//!   for one operation.

use crate::error::ApiError;
use log::info;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Process-wide state: the long-lived store handle.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a migrated connection for sharing across requests.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs one store operation on the blocking pool.
    pub async fn run<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Connection) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| ApiError::Internal("store connection lock poisoned".to_string()))?;
            op(&guard)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("store task failed: {err}")))?
    }

    /// Closes the store connection.
    ///
    /// Fails when other clones of the state are still alive, e.g. while the
    /// server is still draining requests.
    pub fn close(self) -> Result<(), String> {
        let mutex = Arc::try_unwrap(self.conn)
            .map_err(|_| "store connection is still shared".to_string())?;
        let conn = mutex
            .into_inner()
            .map_err(|_| "store connection lock poisoned".to_string())?;
        conn.close()
            .map_err(|(_, err)| format!("failed to close store connection: {err}"))?;
        info!("event=db_close module=api status=ok");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::AppState;
    use datatable_core::db::open_db_in_memory;

    #[tokio::test]
    async fn run_executes_on_shared_connection() {
        let state = AppState::new(open_db_in_memory().unwrap());
        let version: u32 = state
            .run(|conn| {
                Ok(conn
                    .query_row("PRAGMA user_version;", [], |row| row.get(0))
                    .unwrap())
            })
            .await
            .unwrap();
        assert_eq!(version, datatable_core::db::migrations::latest_version());
    }

    #[test]
    fn close_requires_sole_owner() {
        let state = AppState::new(open_db_in_memory().unwrap());
        let clone = state.clone();
        assert!(state.close().is_err());
        assert!(clone.close().is_ok());
    }
}

/// Public library interface for the Strike habit tracker
///
/// This module exports the streak engine, the storage adapters, the tool
/// functions and the MCP server that ties them together.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

// Internal modules
mod domain;
mod storage;
pub mod mcp;
pub mod tools;

// Re-export public modules and types
pub use domain::*;
pub use storage::{HabitStorage, MemoryStorage, SqliteStorage, StorageError};
pub use tools::ToolError;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Habit tracker server state: storage, engine and clock
///
/// Generic over the storage adapter; the binary uses SQLite, tests and
/// embedders may plug in `MemoryStorage`.
pub struct HabitTrackerServer<S: HabitStorage = SqliteStorage> {
    storage: S,
    engine: StreakEngine,
    /// Pinned instant used instead of the system clock
    fixed_now: Option<DateTime<Utc>>,
}

impl HabitTrackerServer<SqliteStorage> {
    /// Create a new habit tracker server with the specified database path
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub async fn new(db_path: PathBuf, window: HistoryWindow) -> Result<Self, ServerError> {
        tracing::info!("Initializing habit tracker with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;
        Ok(Self::with_storage(storage, StreakEngine::new(window)))
    }
}

impl<S: HabitStorage> HabitTrackerServer<S> {
    pub fn with_storage(storage: S, engine: StreakEngine) -> Self {
        Self {
            storage,
            engine,
            fixed_now: None,
        }
    }

    /// Pin the server's clock, so "today" no longer follows the system time
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    /// Current instant, used to stamp new habits
    pub fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }

    /// The calendar day views and toggles apply to
    ///
    /// Days are UTC calendar days, the same boundary `created_at` is
    /// truncated with. The host's local timezone is never consulted, so a
    /// client west of UTC sees "today" roll over in its evening. Pin the
    /// clock with `with_clock` to serve a different day.
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn engine(&self) -> &StreakEngine {
        &self.engine
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// Returns once stdin is closed.
    pub async fn run(self) -> Result<(), ServerError> {
        let habits = self.storage.list_habits()?;
        tracing::info!("Server started, found {} existing habits", habits.len());

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_today_is_the_utc_calendar_day() {
        let server = HabitTrackerServer::with_storage(MemoryStorage::new(), StreakEngine::default())
            .with_clock(Utc.with_ymd_and_hms(2024, 3, 4, 23, 30, 0).unwrap());
        assert_eq!(server.today(), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());

        let server = server.with_clock(Utc.with_ymd_and_hms(2024, 3, 5, 0, 10, 0).unwrap());
        assert_eq!(server.today(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }
}

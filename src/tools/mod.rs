/// MCP tools for habit management
///
/// This module contains the tools that external clients can call to interact
/// with the habit tracker. Each tool is a plain function over any
/// `HabitStorage`, so the same code runs against SQLite or memory.

pub mod create;
pub mod delete;
pub mod list;
pub mod toggle;
pub mod update;

// Re-export tool functions for easy access
pub use create::*;
pub use delete::*;
pub use list::*;
pub use toggle::*;
pub use update::*;

use chrono::{Days, NaiveDate, NaiveTime};
use thiserror::Error;

use crate::domain::{
    DomainError, Habit, HabitId, HabitView, HistoryWindow, StreakEngine, STREAK_WALK_LIMIT,
};
use crate::storage::{HabitStorage, StorageError};

/// Errors returned by tool calls
#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Failed to encode response: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Parse a habit ID supplied by a client
pub(crate) fn parse_habit_id(raw: &str) -> Result<HabitId, ToolError> {
    if raw.trim().is_empty() {
        return Err(ToolError::InvalidParams("habit_id cannot be empty".to_string()));
    }
    HabitId::from_string(raw)
        .map_err(|_| ToolError::InvalidParams(format!("Invalid habit ID format: '{}'", raw)))
}

/// Parse an `HH:MM` reminder; an empty string means no reminder
pub(crate) fn parse_reminder_time(raw: &str) -> Result<Option<NaiveTime>, ToolError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map(Some)
        .map_err(|_| ToolError::InvalidParams(format!("Invalid reminder_time '{}', expected HH:MM", raw)))
}

/// Earliest log date that can influence a habit's view today
///
/// The streak walk stops at its iteration cap and the history set at the
/// window start; neither passes the creation day.
pub(crate) fn log_fetch_start(habit: &Habit, today: NaiveDate, window: HistoryWindow) -> NaiveDate {
    let created_on = habit.created_on();
    let walk_floor = today
        .checked_sub_days(Days::new(u64::from(STREAK_WALK_LIMIT) + 1))
        .unwrap_or(NaiveDate::MIN);
    window.start(today, created_on).min(walk_floor).max(created_on)
}

/// Load a habit's logs and run the engine over them
pub(crate) fn load_view<S: HabitStorage>(
    storage: &S,
    engine: &StreakEngine,
    habit: &Habit,
    today: NaiveDate,
) -> Result<HabitView, ToolError> {
    let since = log_fetch_start(habit, today, engine.window());
    let logs = storage.get_logs_for_habit(&habit.id, Some(since))?;
    Ok(engine.compute(habit, &logs, today)?)
}

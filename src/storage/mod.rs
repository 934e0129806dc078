/// Storage layer for persisting habit data
///
/// This module defines the `HabitStorage` interface the tools are written
/// against, with an embedded SQLite implementation and an in-memory one.
/// Both feed the same streak engine.

pub mod memory;
pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{Habit, HabitId, HabitLog};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Duplicate habit: {habit_id}")]
    DuplicateHabit { habit_id: String },

    #[error("Invalid stored data in column '{column}': {message}")]
    InvalidData { column: String, message: String },

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Trait defining the storage interface for habits and their logs
///
/// Implementations must keep at most one log per `(habit_id, log_date)` and
/// remove a habit's logs along with it.
pub trait HabitStorage {
    /// Create a new habit
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// Replace an existing habit's definition
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Delete a habit and all of its logs
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError>;

    /// List every habit, newest first
    fn list_habits(&self) -> Result<Vec<Habit>, StorageError>;

    /// Logs for one habit, newest first, optionally only from `since` onward
    fn get_logs_for_habit(
        &self,
        habit_id: &HabitId,
        since: Option<NaiveDate>,
    ) -> Result<Vec<HabitLog>, StorageError>;

    /// The log for one habit on one date, if any
    fn get_log(&self, habit_id: &HabitId, date: NaiveDate) -> Result<Option<HabitLog>, StorageError>;

    /// Insert the log or overwrite the count of the existing one
    fn upsert_log(&self, log: &HabitLog) -> Result<(), StorageError>;

    /// Remove the log for one habit on one date; returns whether a row existed
    fn delete_log(&self, habit_id: &HabitId, date: NaiveDate) -> Result<bool, StorageError>;
}

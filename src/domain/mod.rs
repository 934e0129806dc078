/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, HabitLog, HabitView) and the
/// pure computations over them: the streak/history engine and the toggle
/// transition. Nothing in here touches storage or the clock.

pub mod habit;
pub mod log;
pub mod streak;
pub mod toggle;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use log::*;
pub use streak::*;
pub use toggle::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit title: {0}")]
    InvalidTitle(String),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },

    /// The habit's stored configuration cannot be evaluated (e.g. a target
    /// of zero slipped past validation through a hand-edited database).
    #[error("Invalid configuration for habit {habit_id}: {message}")]
    InvalidHabitConfiguration { habit_id: String, message: String },
}

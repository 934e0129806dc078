/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents a user's habit
/// they want to track, along with validation and partial updates.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, FrequencyType, HabitId, HabitType, Schedule, TargetDays};

/// Icon used when none is given
pub const DEFAULT_ICON: &str = "🎯";

/// Color used when none is given
pub const DEFAULT_COLOR: &str = "#3b82f6";

/// Upper bound for `frequency_count` and `target_value`
pub const MAX_DAILY_TARGET: i32 = 10000;

/// A habit represents something the user wants to do regularly
///
/// Only `habit_type`, `frequency_type`, `frequency_count`, `target_value`,
/// `target_days` and `created_at` matter to the streak engine; the remaining
/// fields are carried for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Morning Run", "Read")
    pub title: String,
    /// Optional longer description, empty when unset
    pub description: String,
    /// How a day's log is judged
    #[serde(rename = "type")]
    pub habit_type: HabitType,
    /// Daily or specific weekdays
    pub frequency_type: FrequencyType,
    /// Daily target for regular habits
    pub frequency_count: i32,
    /// Daily target for quantifiable habits
    pub target_value: i32,
    /// Weekday indices used when `frequency_type` is `specific_days`
    pub target_days: TargetDays,
    /// Unit for quantifiable progress (e.g., "pages", "glasses")
    pub unit: String,
    pub icon: String,
    pub color: String,
    /// Time of day to remind the user, if any
    pub reminder_time: Option<NaiveTime>,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
}

/// Everything needed to create a habit; optional fields fall back to defaults
#[derive(Debug, Clone, Default)]
pub struct NewHabit {
    pub title: String,
    pub description: Option<String>,
    pub habit_type: HabitType,
    pub frequency_type: FrequencyType,
    pub frequency_count: Option<i32>,
    pub target_value: Option<i32>,
    pub target_days: TargetDays,
    pub unit: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub reminder_time: Option<NaiveTime>,
}

/// Partial update of a habit's definition; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct HabitChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub habit_type: Option<HabitType>,
    pub frequency_type: Option<FrequencyType>,
    pub frequency_count: Option<i32>,
    pub target_value: Option<i32>,
    pub target_days: Option<TargetDays>,
    pub unit: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    /// `Some(None)` clears the reminder
    pub reminder_time: Option<Option<NaiveTime>>,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// `created_at` is supplied by the caller so that construction stays
    /// independent of the wall clock.
    pub fn new(new: NewHabit, created_at: DateTime<Utc>) -> Result<Self, DomainError> {
        let habit = Self {
            id: HabitId::new(),
            title: new.title.trim().to_string(),
            description: new.description.unwrap_or_default(),
            habit_type: new.habit_type,
            frequency_type: new.frequency_type,
            frequency_count: new.frequency_count.unwrap_or(1),
            target_value: new.target_value.unwrap_or(1),
            target_days: new.target_days,
            unit: new.unit.unwrap_or_default(),
            icon: new.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            color: new.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            reminder_time: new.reminder_time,
            created_at,
        };
        habit.validate()?;
        Ok(habit)
    }

    /// Apply a partial update, validating the result before committing it
    pub fn update(&mut self, changes: HabitChanges) -> Result<(), DomainError> {
        let mut updated = self.clone();

        if let Some(title) = changes.title {
            updated.title = title.trim().to_string();
        }
        if let Some(description) = changes.description {
            updated.description = description;
        }
        if let Some(habit_type) = changes.habit_type {
            updated.habit_type = habit_type;
        }
        if let Some(frequency_type) = changes.frequency_type {
            updated.frequency_type = frequency_type;
        }
        if let Some(frequency_count) = changes.frequency_count {
            updated.frequency_count = frequency_count;
        }
        if let Some(target_value) = changes.target_value {
            updated.target_value = target_value;
        }
        if let Some(target_days) = changes.target_days {
            updated.target_days = target_days;
        }
        if let Some(unit) = changes.unit {
            updated.unit = unit;
        }
        if let Some(icon) = changes.icon {
            updated.icon = icon;
        }
        if let Some(color) = changes.color {
            updated.color = color;
        }
        if let Some(reminder_time) = changes.reminder_time {
            updated.reminder_time = reminder_time;
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Daily target that decides whether a day counts as completed
    ///
    /// Inverse habits have no numeric target; they report the regular
    /// `frequency_count` here but the engine never compares against it.
    pub fn daily_target(&self) -> i32 {
        match self.habit_type {
            HabitType::Quantifiable => self.target_value,
            HabitType::Regular | HabitType::Inverse => self.frequency_count,
        }
    }

    /// Calendar day the habit was created on
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// The habit's weekly schedule
    pub fn schedule(&self) -> Schedule<'_> {
        Schedule::new(self.frequency_type, &self.target_days)
    }

    /// Check every field against the habit rules
    pub fn validate(&self) -> Result<(), DomainError> {
        Self::validate_title(&self.title)?;
        Self::validate_description(&self.description)?;
        Self::validate_target("frequency_count", self.frequency_count)?;
        Self::validate_target("target_value", self.target_value)?;
        Self::validate_unit(&self.unit)?;
        Ok(())
    }

    // Validation helper methods

    fn validate_title(title: &str) -> Result<(), DomainError> {
        let trimmed = title.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidTitle(
                "Habit title cannot be empty".to_string(),
            ));
        }

        if trimmed.chars().count() > 100 {
            return Err(DomainError::InvalidTitle(
                "Habit title cannot be longer than 100 characters".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_description(description: &str) -> Result<(), DomainError> {
        if description.chars().count() > 500 {
            return Err(DomainError::Validation {
                message: "Description cannot be longer than 500 characters".to_string(),
            });
        }
        Ok(())
    }

    fn validate_target(field: &str, value: i32) -> Result<(), DomainError> {
        if value < 1 {
            return Err(DomainError::InvalidValue {
                message: format!("{} must be at least 1, got {}", field, value),
            });
        }
        if value > MAX_DAILY_TARGET {
            return Err(DomainError::InvalidValue {
                message: format!("{} cannot exceed {}", field, MAX_DAILY_TARGET),
            });
        }
        Ok(())
    }

    fn validate_unit(unit: &str) -> Result<(), DomainError> {
        if unit.trim().chars().count() > 20 {
            return Err(DomainError::InvalidValue {
                message: "Unit cannot be longer than 20 characters".to_string(),
            });
        }
        Ok(())
    }
}

/// Toggle transition for today's log
///
/// A toggle is the only write the user makes against logs. This module
/// decides what the toggle does to the existing row, leaving the actual
/// write to the storage layer.

use serde::Serialize;

use crate::domain::{Habit, HabitLog, HabitType, INVERSE_FAILED};

/// What should happen to the day's log row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "completed_count", rename_all = "snake_case")]
pub enum ToggleAction {
    /// Create the row with this count
    Insert(i32),
    /// Overwrite the existing row's count
    Update(i32),
    /// Remove the existing row
    Delete,
    /// Leave storage untouched
    Noop,
}

impl ToggleAction {
    /// Count stored for the day after the action, 0 when no row remains
    pub fn resulting_count(&self) -> i32 {
        match self {
            ToggleAction::Insert(count) | ToggleAction::Update(count) => *count,
            ToggleAction::Delete | ToggleAction::Noop => 0,
        }
    }
}

/// Decide the effect of toggling a habit for the day of `existing`
///
/// Inverse habits flip between a failure marker and no row. Counted habits
/// add one per toggle and wrap back to zero once the target was already
/// reached; quantifiable habits add an explicit `amount` instead, which may
/// be negative. Any count that ends at or below zero removes the row.
pub fn plan_toggle(habit: &Habit, existing: Option<&HabitLog>, amount: Option<i32>) -> ToggleAction {
    match (habit.habit_type, existing) {
        (HabitType::Inverse, None) => ToggleAction::Insert(INVERSE_FAILED),
        (HabitType::Inverse, Some(_)) => ToggleAction::Delete,
        (_, None) => {
            let initial = amount.unwrap_or(1);
            if initial <= 0 {
                ToggleAction::Noop
            } else {
                ToggleAction::Insert(initial)
            }
        }
        (habit_type, Some(log)) => {
            let current = log.completed_count;
            let next = match (habit_type, amount) {
                (HabitType::Quantifiable, Some(delta)) => current.saturating_add(delta),
                _ if current >= habit.daily_target() => 0,
                _ => current.saturating_add(1),
            };

            if next <= 0 {
                ToggleAction::Delete
            } else {
                ToggleAction::Update(next)
            }
        }
    }
}

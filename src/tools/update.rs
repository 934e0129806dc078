/// Tool for updating existing habits
///
/// This module implements the habit_update MCP tool to modify
/// existing habit properties like title, type, schedule and targets.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{FrequencyType, Habit, HabitChanges, HabitType, TargetDays};
use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, parse_reminder_time, ToolError};

/// Parameters for updating an existing habit
///
/// Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct UpdateHabitParams {
    /// ID of the habit to update
    pub habit_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// regular, quantifiable or inverse
    #[serde(rename = "type")]
    pub habit_type: Option<HabitType>,
    /// daily or specific_days
    pub frequency_type: Option<FrequencyType>,
    pub frequency_count: Option<i32>,
    pub target_value: Option<i32>,
    /// Weekday indices, 0 = Sunday .. 6 = Saturday
    pub target_days: Option<Vec<u8>>,
    pub unit: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    /// Reminder time as HH:MM; an empty string removes the reminder
    pub reminder_time: Option<String>,
    /// Older clients send this flag instead of type=quantifiable
    pub is_quantifiable: Option<bool>,
}

/// Response from updating a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub success: bool,
    pub message: String,
    pub habit: Habit,
}

/// Update an existing habit using the provided storage
pub fn update_habit<S: HabitStorage>(
    storage: &S,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let mut habit = storage.get_habit(&habit_id)?;

    let habit_type = match params.is_quantifiable {
        Some(true) => Some(HabitType::Quantifiable),
        _ => params.habit_type,
    };

    let target_days = params.target_days.map(TargetDays::new).transpose()?;

    let reminder_time = params
        .reminder_time
        .as_deref()
        .map(parse_reminder_time)
        .transpose()?;

    habit.update(HabitChanges {
        title: params.title,
        description: params.description,
        habit_type,
        frequency_type: params.frequency_type,
        frequency_count: params.frequency_count,
        target_value: params.target_value,
        target_days,
        unit: params.unit,
        icon: params.icon,
        color: params.color,
        reminder_time,
    })?;

    storage.update_habit(&habit)?;
    tracing::info!("Updated habit '{}' ({})", habit.title, habit.id);

    Ok(UpdateHabitResponse {
        success: true,
        message: format!("✅ Updated habit '{}'", habit.title),
        habit,
    })
}

/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{FrequencyType, Habit, HabitType, NewHabit, TargetDays};
use crate::storage::HabitStorage;
use crate::tools::{parse_reminder_time, ToolError};

/// Parameters for creating a new habit
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Name of the habit
    pub title: String,
    /// Optional longer description
    pub description: Option<String>,
    /// regular (default), quantifiable or inverse
    #[serde(rename = "type")]
    pub habit_type: Option<HabitType>,
    /// daily (default) or specific_days
    pub frequency_type: Option<FrequencyType>,
    /// Times per day for regular habits (default 1)
    pub frequency_count: Option<i32>,
    /// Daily amount for quantifiable habits (default 1)
    pub target_value: Option<i32>,
    /// Weekday indices, 0 = Sunday .. 6 = Saturday, for specific_days
    pub target_days: Option<Vec<u8>>,
    /// Unit for quantifiable progress, e.g. "pages"
    pub unit: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    /// Reminder time as HH:MM
    pub reminder_time: Option<String>,
    /// Older clients send this flag instead of type=quantifiable
    pub is_quantifiable: Option<bool>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit_id: String,
    pub message: String,
    pub habit: Habit,
}

/// Create a new habit using the provided storage
pub fn create_habit<S: HabitStorage>(
    storage: &S,
    params: CreateHabitParams,
    now: DateTime<Utc>,
) -> Result<CreateHabitResponse, ToolError> {
    let habit_type = if params.is_quantifiable == Some(true) {
        HabitType::Quantifiable
    } else {
        params.habit_type.unwrap_or_default()
    };

    let reminder_time = match params.reminder_time.as_deref() {
        Some(raw) => parse_reminder_time(raw)?,
        None => None,
    };

    let habit = Habit::new(
        NewHabit {
            title: params.title,
            description: params.description,
            habit_type,
            frequency_type: params.frequency_type.unwrap_or_default(),
            frequency_count: params.frequency_count,
            target_value: params.target_value,
            target_days: TargetDays::new(params.target_days.unwrap_or_default())?,
            unit: params.unit,
            icon: params.icon,
            color: params.color,
            reminder_time,
        },
        now,
    )?;

    storage.create_habit(&habit)?;
    tracing::info!("Created {} habit '{}' ({})", habit.habit_type, habit.title, habit.id);

    Ok(CreateHabitResponse {
        success: true,
        habit_id: habit.id.to_string(),
        message: format!("✅ Created {} habit '{}'", habit.habit_type, habit.title),
        habit,
    })
}

/// Tool for toggling today's progress on a habit
///
/// This module implements the habit_toggle MCP tool. The transition itself
/// is decided by `plan_toggle`; this tool applies it to storage and returns
/// the recomputed view.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{plan_toggle, HabitLog, HabitType, HabitView, StreakEngine, ToggleAction};
use crate::storage::HabitStorage;
use crate::tools::{load_view, parse_habit_id, ToolError};

/// Parameters for toggling a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ToggleHabitParams {
    /// ID of the habit to toggle
    pub habit_id: String,
    /// Amount to add for quantifiable habits; may be negative
    pub amount: Option<i32>,
}

/// Response from toggling a habit
#[derive(Debug, Serialize)]
pub struct ToggleHabitResponse {
    pub success: bool,
    pub habit_id: String,
    pub date: NaiveDate,
    pub action: ToggleAction,
    /// Count stored for today after the toggle
    pub completed_count: i32,
    pub view: HabitView,
    pub message: String,
}

/// Toggle a habit for `today` and return its updated view
pub fn toggle_habit<S: HabitStorage>(
    storage: &S,
    engine: &StreakEngine,
    params: ToggleHabitParams,
    today: NaiveDate,
) -> Result<ToggleHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let habit = storage.get_habit(&habit_id)?;
    let existing = storage.get_log(&habit_id, today)?;

    let action = plan_toggle(&habit, existing.as_ref(), params.amount);
    match action {
        ToggleAction::Insert(count) | ToggleAction::Update(count) => {
            storage.upsert_log(&HabitLog::new(habit_id.clone(), today, count))?;
        }
        ToggleAction::Delete => {
            storage.delete_log(&habit_id, today)?;
        }
        ToggleAction::Noop => {}
    }
    tracing::debug!("Toggled habit {} on {}: {:?}", habit_id, today, action);

    let view = load_view(storage, engine, &habit, today)?;
    let message = toggle_message(&habit.title, habit.habit_type, &view, action);

    Ok(ToggleHabitResponse {
        success: true,
        habit_id: habit_id.to_string(),
        date: today,
        action,
        completed_count: action.resulting_count(),
        view,
        message,
    })
}

fn toggle_message(title: &str, habit_type: HabitType, view: &HabitView, action: ToggleAction) -> String {
    if action == ToggleAction::Noop {
        return format!("ℹ️ Nothing to record for '{}'", title);
    }

    let streak_text = match view.current_streak {
        0 => String::new(),
        1 => " 🔥 1 day streak".to_string(),
        n => format!(" 🔥 {} day streak", n),
    };

    match (habit_type, view.is_completed_today) {
        (HabitType::Inverse, false) => format!("❌ Marked '{}' as slipped today", title),
        (HabitType::Inverse, true) => format!("✅ '{}' is back on track today{}", title, streak_text),
        (_, true) => format!("✅ Completed '{}' today{}", title, streak_text),
        (_, false) => format!(
            "📝 '{}' at {} today{}",
            title, view.completed_count_today, streak_text
        ),
    }
}

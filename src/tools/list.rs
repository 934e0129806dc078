/// Tool for listing all habits
///
/// This module implements the habit_list MCP tool. Every habit is returned
/// with its computed view for the given day.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Habit, HabitView, HistoryWindow, StreakEngine};
use crate::storage::HabitStorage;
use crate::tools::{load_view, ToolError};

/// Parameters for listing habits
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    /// Days of history to include, overriding the server default (at most 36500)
    pub lookback_days: Option<u32>,
    /// Future days to include in the history range (at most 366)
    pub lookahead_days: Option<u32>,
}

/// A habit together with its computed view
#[derive(Debug, Clone, Serialize)]
pub struct HabitWithView {
    #[serde(flatten)]
    pub habit: Habit,
    #[serde(flatten)]
    pub view: HabitView,
}

/// Summary statistics for all habits
#[derive(Debug, Serialize)]
pub struct HabitListSummary {
    pub total_habits: usize,
    pub completed_today: usize,
    pub longest_current_streak: u32,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub date: NaiveDate,
    pub habits: Vec<HabitWithView>,
    pub summary: HabitListSummary,
}

/// List habits, newest first, with their views as of `today`
///
/// A habit whose definition the engine rejects fails the whole call.
pub fn list_habits<S: HabitStorage>(
    storage: &S,
    engine: &StreakEngine,
    params: ListHabitsParams,
    today: NaiveDate,
) -> Result<ListHabitsResponse, ToolError> {
    let defaults = engine.window();
    let window = HistoryWindow::bounded(
        params.lookback_days.unwrap_or(defaults.lookback_days),
        params.lookahead_days.unwrap_or(defaults.lookahead_days),
    )
    .map_err(|e| ToolError::InvalidParams(e.to_string()))?;
    let engine = StreakEngine::new(window);

    let habits = storage.list_habits()?;
    let mut entries = Vec::with_capacity(habits.len());

    for habit in habits {
        let view = load_view(storage, &engine, &habit, today).map_err(|e| {
            tracing::error!("Failed to compute view for habit {}: {}", habit.id, e);
            e
        })?;
        entries.push(HabitWithView { habit, view });
    }

    let summary = HabitListSummary {
        total_habits: entries.len(),
        completed_today: entries.iter().filter(|e| e.view.is_completed_today).count(),
        longest_current_streak: entries
            .iter()
            .map(|e| e.view.current_streak)
            .max()
            .unwrap_or(0),
    };

    tracing::debug!("Listed {} habits for {}", summary.total_habits, today);

    Ok(ListHabitsResponse {
        date: today,
        habits: entries,
        summary,
    })
}

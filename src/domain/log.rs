/// HabitLog entity for per-day progress records
///
/// Each habit has at most one log row per calendar date. Regular and
/// quantifiable habits store a positive count; inverse habits store the
/// `INVERSE_FAILED` sentinel on days the user gave in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::HabitId;

/// Count stored on an inverse habit's log to mark the day as failed
pub const INVERSE_FAILED: i32 = -1;

/// A record of progress on a habit for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitLog {
    /// Which habit this log is for
    pub habit_id: HabitId,
    /// Which day the progress belongs to
    pub log_date: NaiveDate,
    /// Progress units, or `INVERSE_FAILED`
    pub completed_count: i32,
}

impl HabitLog {
    pub fn new(habit_id: HabitId, log_date: NaiveDate, completed_count: i32) -> Self {
        Self {
            habit_id,
            log_date,
            completed_count,
        }
    }

    /// Whether this row records an explicit failure of an inverse habit
    pub fn is_failure_marker(&self) -> bool {
        self.completed_count == INVERSE_FAILED
    }
}

/// Streak and history reconstruction
///
/// This module turns a habit's definition and its raw per-day logs into the
/// view the user sees: today's progress, the current streak, and the set of
/// dates shown as completed on the calendar. Everything here is pure; the
/// caller supplies "today" and an immutable snapshot of the logs.

use std::collections::{BTreeSet, HashMap};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Habit, HabitLog, HabitType, Schedule};

/// Maximum number of days the streak walk looks back past today
///
/// This is a hard design limit: streaks older than roughly ten years are
/// reported as `STREAK_WALK_LIMIT + 1` at most.
pub const STREAK_WALK_LIMIT: u32 = 3650;

/// Default number of days of history the calendar shows
pub const DEFAULT_LOOKBACK_DAYS: u32 = 90;

/// Largest accepted lookback, about a century
pub const MAX_LOOKBACK_DAYS: u32 = 36_500;

/// Largest accepted lookahead, one leap year
pub const MAX_LOOKAHEAD_DAYS: u32 = 366;

/// Range of dates the history set is built over, relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryWindow {
    /// Days before today included in the history set
    pub lookback_days: u32,
    /// Days after today included, for calendars that prefill future dates
    pub lookahead_days: u32,
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            lookahead_days: 0,
        }
    }
}

impl HistoryWindow {
    pub fn new(lookback_days: u32, lookahead_days: u32) -> Self {
        Self {
            lookback_days,
            lookahead_days,
        }
    }

    /// Build a window, rejecting ranges beyond the accepted limits
    pub fn bounded(lookback_days: u32, lookahead_days: u32) -> Result<Self, DomainError> {
        if lookback_days > MAX_LOOKBACK_DAYS {
            return Err(DomainError::InvalidValue {
                message: format!(
                    "lookback_days cannot exceed {}, got {}",
                    MAX_LOOKBACK_DAYS, lookback_days
                ),
            });
        }
        if lookahead_days > MAX_LOOKAHEAD_DAYS {
            return Err(DomainError::InvalidValue {
                message: format!(
                    "lookahead_days cannot exceed {}, got {}",
                    MAX_LOOKAHEAD_DAYS, lookahead_days
                ),
            });
        }
        Ok(Self::new(lookback_days, lookahead_days))
    }

    /// First date of the window, never earlier than `floor`
    pub fn start(&self, today: NaiveDate, floor: NaiveDate) -> NaiveDate {
        let start = today
            .checked_sub_days(Days::new(u64::from(self.lookback_days)))
            .unwrap_or(NaiveDate::MIN);
        start.max(floor)
    }

    /// Last date of the window (inclusive)
    pub fn end(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_add_days(Days::new(u64::from(self.lookahead_days)))
            .unwrap_or(NaiveDate::MAX)
    }
}

/// What the engine derives for one habit
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitView {
    /// Today's progress; a 0/1 flag for inverse habits
    pub completed_count_today: i32,
    pub is_completed_today: bool,
    /// Consecutive completed target days ending today (or yesterday)
    pub current_streak: u32,
    /// Dates drawn as completed on the calendar, ascending
    pub history_dates: BTreeSet<NaiveDate>,
}

/// How a single day's log is judged, chosen once per habit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionRule {
    /// The day's count must reach the target
    Threshold(i32),
    /// The day passes unless it carries the failure marker
    Inverse,
}

impl CompletionRule {
    /// Select the rule for a habit, rejecting targets below one
    pub fn for_habit(habit: &Habit) -> Result<Self, DomainError> {
        match habit.habit_type {
            HabitType::Inverse => Ok(CompletionRule::Inverse),
            HabitType::Regular | HabitType::Quantifiable => {
                let target = habit.daily_target();
                if target < 1 {
                    return Err(DomainError::InvalidHabitConfiguration {
                        habit_id: habit.id.to_string(),
                        message: format!(
                            "{} habit needs a daily target of at least 1, got {}",
                            habit.habit_type, target
                        ),
                    });
                }
                Ok(CompletionRule::Threshold(target))
            }
        }
    }

    /// Whether a day with this log (or none) counts as completed
    pub fn is_completed(&self, log: Option<&HabitLog>) -> bool {
        match self {
            CompletionRule::Threshold(target) => {
                log.map_or(false, |l| l.completed_count >= *target)
            }
            CompletionRule::Inverse => !log.map_or(false, HabitLog::is_failure_marker),
        }
    }

    /// Count reported for today, never negative
    pub fn displayed_count(&self, log: Option<&HabitLog>) -> i32 {
        match self {
            CompletionRule::Threshold(_) => log.map_or(0, |l| l.completed_count.max(0)),
            CompletionRule::Inverse => i32::from(self.is_completed(log)),
        }
    }
}

/// The streak and history engine
///
/// Holds only the history window; each call is independent, so one engine
/// can serve any number of habits, concurrently if need be.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakEngine {
    window: HistoryWindow,
}

impl StreakEngine {
    pub fn new(window: HistoryWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> HistoryWindow {
        self.window
    }

    /// Compute the view of a habit as of `today`
    ///
    /// Logs belonging to other habits are ignored. If a date appears more
    /// than once the last row wins, although storage never produces that.
    pub fn compute(
        &self,
        habit: &Habit,
        logs: &[HabitLog],
        today: NaiveDate,
    ) -> Result<HabitView, DomainError> {
        let rule = CompletionRule::for_habit(habit)?;
        let schedule = habit.schedule();
        let created_on = habit.created_on();

        let by_date: HashMap<NaiveDate, &HabitLog> = logs
            .iter()
            .filter(|l| l.habit_id == habit.id)
            .map(|l| (l.log_date, l))
            .collect();

        let today_log = by_date.get(&today).copied();

        Ok(HabitView {
            completed_count_today: rule.displayed_count(today_log),
            is_completed_today: rule.is_completed(today_log),
            current_streak: current_streak(rule, &schedule, &by_date, today, created_on),
            history_dates: history_dates(rule, &schedule, &by_date, today, created_on, self.window),
        })
    }
}

/// Compute a habit view with an explicit window
pub fn compute_habit_view(
    habit: &Habit,
    logs: &[HabitLog],
    today: NaiveDate,
    window: HistoryWindow,
) -> Result<HabitView, DomainError> {
    StreakEngine::new(window).compute(habit, logs, today)
}

/// Walk backward from today counting completed target days
///
/// An incomplete today is not a break, it simply isn't counted. Non-target
/// days are stepped over. The walk stops at the first failed target day,
/// at the creation date, or after `STREAK_WALK_LIMIT` days.
fn current_streak(
    rule: CompletionRule,
    schedule: &Schedule<'_>,
    by_date: &HashMap<NaiveDate, &HabitLog>,
    today: NaiveDate,
    created_on: NaiveDate,
) -> u32 {
    if today < created_on {
        return 0;
    }

    let mut streak = 0;
    if schedule.is_target_day(today) && rule.is_completed(by_date.get(&today).copied()) {
        streak = 1;
    }

    let mut cursor = today.pred_opt();
    for _ in 0..STREAK_WALK_LIMIT {
        let day = match cursor {
            Some(day) if day >= created_on => day,
            _ => break,
        };

        if schedule.is_target_day(day) {
            if rule.is_completed(by_date.get(&day).copied()) {
                streak += 1;
            } else {
                break;
            }
        }

        cursor = day.pred_opt();
    }

    streak
}

/// Dates drawn as completed on the calendar
///
/// Regular and quantifiable habits take every logged date that met the
/// target, target day or not. Inverse habits take every target day in the
/// window without a failure marker. The asymmetry is long-standing client
/// behaviour and is kept as is.
fn history_dates(
    rule: CompletionRule,
    schedule: &Schedule<'_>,
    by_date: &HashMap<NaiveDate, &HabitLog>,
    today: NaiveDate,
    created_on: NaiveDate,
    window: HistoryWindow,
) -> BTreeSet<NaiveDate> {
    let start = window.start(today, created_on);
    let end = window.end(today);

    match rule {
        CompletionRule::Threshold(_) => by_date
            .iter()
            .filter(|(date, _)| **date >= start && **date <= end)
            .filter(|(_, log)| rule.is_completed(Some(**log)))
            .map(|(date, _)| *date)
            .collect(),
        CompletionRule::Inverse => start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| schedule.is_target_day(*day))
            .filter(|day| rule.is_completed(by_date.get(day).copied()))
            .collect(),
    }
}

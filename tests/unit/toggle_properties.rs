/// Toggle transition checked against the engine's view of the result
use chrono::{NaiveDate, TimeZone, Utc};
use strike_habits::*;

#[cfg(test)]
mod toggle_property_tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 14).unwrap()
    }

    fn habit(habit_type: HabitType, target: i32) -> Habit {
        Habit::new(
            NewHabit {
                title: "Toggle".to_string(),
                habit_type,
                frequency_count: Some(target),
                target_value: Some(target),
                ..Default::default()
            },
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    /// Apply one toggle to today's row the way storage would
    fn apply(habit: &Habit, row: &mut Option<HabitLog>, amount: Option<i32>) -> ToggleAction {
        let action = plan_toggle(habit, row.as_ref(), amount);
        match action {
            ToggleAction::Insert(count) | ToggleAction::Update(count) => {
                *row = Some(HabitLog::new(habit.id.clone(), today(), count));
            }
            ToggleAction::Delete => *row = None,
            ToggleAction::Noop => {}
        }
        action
    }

    fn view(habit: &Habit, row: &Option<HabitLog>) -> HabitView {
        let logs: Vec<HabitLog> = row.iter().cloned().collect();
        StreakEngine::default().compute(habit, &logs, today()).unwrap()
    }

    #[test]
    fn test_toggle_at_target_unmarks_the_day() {
        let habit = habit(HabitType::Regular, 3);
        let mut row = Some(HabitLog::new(habit.id.clone(), today(), 3));
        assert!(view(&habit, &row).is_completed_today);

        assert_eq!(apply(&habit, &mut row, None), ToggleAction::Delete);
        let after = view(&habit, &row);
        assert_eq!(after.completed_count_today, 0);
        assert!(!after.is_completed_today);
    }

    #[test]
    fn test_inverse_toggle_sequence() {
        let habit = habit(HabitType::Inverse, 1);
        let mut row = None;
        assert!(view(&habit, &row).is_completed_today);

        apply(&habit, &mut row, None);
        assert_eq!(row.as_ref().map(|l| l.completed_count), Some(INVERSE_FAILED));
        assert!(!view(&habit, &row).is_completed_today);

        apply(&habit, &mut row, None);
        assert!(row.is_none());
        assert!(view(&habit, &row).is_completed_today);
    }

    #[test]
    fn test_quantifiable_amounts_accumulate() {
        let habit = habit(HabitType::Quantifiable, 10);
        let mut row = None;

        apply(&habit, &mut row, Some(4));
        apply(&habit, &mut row, Some(6));
        let done = view(&habit, &row);
        assert_eq!(done.completed_count_today, 10);
        assert!(done.is_completed_today);

        assert_eq!(apply(&habit, &mut row, Some(-10)), ToggleAction::Delete);
        assert!(row.is_none());
    }

    #[test]
    fn test_non_positive_first_amount_is_ignored() {
        let habit = habit(HabitType::Quantifiable, 10);
        let mut row = None;

        assert_eq!(apply(&habit, &mut row, Some(0)), ToggleAction::Noop);
        assert_eq!(apply(&habit, &mut row, Some(-2)), ToggleAction::Noop);
        assert!(row.is_none());
    }

    #[test]
    fn test_regular_cycles_through_target() {
        let habit = habit(HabitType::Regular, 2);
        let mut row = None;

        let counts: Vec<i32> = (0..5)
            .map(|_| apply(&habit, &mut row, None).resulting_count())
            .collect();
        assert_eq!(counts, vec![1, 2, 0, 1, 2]);
    }
}

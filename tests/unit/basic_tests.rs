/// Basic unit tests to verify core functionality
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use strike_habits::*;

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn morning(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 6, 30, 0).unwrap()
    }

    fn mon_wed_habit() -> Habit {
        // 2024-01-01 is a Monday
        Habit::new(
            NewHabit {
                title: "Gym".to_string(),
                frequency_type: FrequencyType::SpecificDays,
                target_days: TargetDays::new([1, 3]).unwrap(),
                ..Default::default()
            },
            morning(1),
        )
        .unwrap()
    }

    #[test]
    fn test_habit_creation() {
        let habit = Habit::new(
            NewHabit {
                title: "Test Habit".to_string(),
                description: Some("A test habit".to_string()),
                habit_type: HabitType::Quantifiable,
                target_value: Some(30),
                unit: Some("minutes".to_string()),
                ..Default::default()
            },
            morning(1),
        );

        assert!(habit.is_ok());
        let habit = habit.unwrap();
        assert_eq!(habit.title, "Test Habit");
        assert_eq!(habit.daily_target(), 30);
        assert_eq!(habit.created_on(), date(1));
    }

    #[test]
    fn test_habit_id_round_trip() {
        let id = HabitId::new();
        let parsed = HabitId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
        assert!(HabitId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_regular_habit_without_log_today() {
        let habit = Habit::new(
            NewHabit {
                title: "Water".to_string(),
                frequency_count: Some(3),
                ..Default::default()
            },
            morning(1),
        )
        .unwrap();

        let view = StreakEngine::default().compute(&habit, &[], date(5)).unwrap();
        assert_eq!(view.completed_count_today, 0);
        assert!(!view.is_completed_today);
        assert_eq!(view.current_streak, 0);
    }

    #[test]
    fn test_specific_days_streak_skips_off_days() {
        let habit = mon_wed_habit();
        let logs: Vec<HabitLog> = [1, 3, 8, 10]
            .into_iter()
            .map(|d| HabitLog::new(habit.id.clone(), date(d), 1))
            .collect();

        let view = StreakEngine::default().compute(&habit, &logs, date(10)).unwrap();
        assert_eq!(view.current_streak, 4);
        assert!(view.is_completed_today);
    }

    #[test]
    fn test_missed_target_day_stops_streak() {
        let habit = mon_wed_habit();
        let logs: Vec<HabitLog> = [1, 3, 10]
            .into_iter()
            .map(|d| HabitLog::new(habit.id.clone(), date(d), 1))
            .collect();

        // Monday the 8th was missed
        let view = StreakEngine::default().compute(&habit, &logs, date(10)).unwrap();
        assert_eq!(view.current_streak, 1);
    }

    #[test]
    fn test_unreadable_target_days_mean_no_target_days() {
        let target_days = TargetDays::parse_lenient("not json");
        assert!(target_days.is_empty());

        let mut habit = mon_wed_habit();
        habit.target_days = target_days;
        let logs = vec![HabitLog::new(habit.id.clone(), date(8), 1)];

        let view = StreakEngine::default().compute(&habit, &logs, date(10)).unwrap();
        assert_eq!(view.current_streak, 0);
        // Logged dates still show up for counted habits
        assert!(view.history_dates.contains(&date(8)));

        habit.habit_type = HabitType::Inverse;
        let view = StreakEngine::default().compute(&habit, &[], date(10)).unwrap();
        assert_eq!(view.current_streak, 0);
        assert!(view.history_dates.is_empty());
    }

    #[test]
    fn test_lenient_parse_drops_out_of_range_days() {
        let days = TargetDays::parse_lenient("[0, 6, 7, -1, 3]");
        assert_eq!(days.iter().collect::<Vec<_>>(), vec![0, 3, 6]);
        assert!(TargetDays::new([7]).is_err());
    }

    #[test]
    fn test_history_never_precedes_creation() {
        let habit = mon_wed_habit();
        let logs = vec![
            HabitLog::new(habit.id.clone(), NaiveDate::from_ymd_opt(2023, 12, 27).unwrap(), 1),
            HabitLog::new(habit.id.clone(), date(3), 1),
        ];

        let view = compute_habit_view(&habit, &logs, date(4), HistoryWindow::default()).unwrap();
        assert_eq!(view.history_dates.into_iter().collect::<Vec<_>>(), vec![date(3)]);
        assert_eq!(view.current_streak, 1);
    }
}

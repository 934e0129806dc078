/// Basic integration tests
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use strike_habits::tools::{self, CreateHabitParams, DeleteHabitParams, ListHabitsParams, ToggleHabitParams};
use strike_habits::*;
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn create<S: HabitStorage>(storage: &S, title: &str, habit_type: HabitType) -> HabitId {
        tools::create_habit(
            storage,
            CreateHabitParams {
                title: title.to_string(),
                habit_type: Some(habit_type),
                target_value: Some(5),
                ..Default::default()
            },
            created_at(),
        )
        .expect("Failed to create habit")
        .habit
        .id
    }

    fn toggle<S: HabitStorage>(storage: &S, habit_id: &HabitId, amount: Option<i32>, today: NaiveDate) {
        tools::toggle_habit(
            storage,
            &StreakEngine::default(),
            ToggleHabitParams {
                habit_id: habit_id.to_string(),
                amount,
            },
            today,
        )
        .expect("Failed to toggle habit");
    }

    #[tokio::test]
    async fn test_server_basic_workflow() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = HabitTrackerServer::new(temp_file.path().to_path_buf(), HistoryWindow::default())
            .await
            .expect("Failed to create server");

        assert!(server.storage().list_habits().unwrap().is_empty());
        assert_eq!(server.engine().window(), HistoryWindow::default());
    }

    #[tokio::test]
    async fn test_database_persistence() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        let habit_id = {
            let server = HabitTrackerServer::new(db_path.clone(), HistoryWindow::default())
                .await
                .expect("Failed to create first server");
            let habit_id = create(server.storage(), "Read", HabitType::Regular);
            toggle(server.storage(), &habit_id, None, day(2));
            toggle(server.storage(), &habit_id, None, day(3));
            habit_id
        };

        let server = HabitTrackerServer::new(db_path, HistoryWindow::default())
            .await
            .expect("Failed to create second server");

        let listed = tools::list_habits(
            server.storage(),
            server.engine(),
            ListHabitsParams::default(),
            day(3),
        )
        .unwrap();

        assert_eq!(listed.habits.len(), 1);
        let entry = &listed.habits[0];
        assert_eq!(entry.habit.id, habit_id);
        assert_eq!(entry.habit.created_at, created_at());
        assert_eq!(entry.view.current_streak, 2);
        assert_eq!(entry.view.history_dates.len(), 2);
    }

    #[test]
    fn test_storage_interface() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf()).expect("Failed to create storage");

        let _: &dyn HabitStorage = &storage;
        let _: &dyn HabitStorage = &MemoryStorage::new();
    }

    #[test]
    fn test_adapters_produce_identical_views() {
        let sqlite = SqliteStorage::open_in_memory().expect("Failed to open SQLite");
        let memory = MemoryStorage::new();

        // Same habit rows in both adapters
        let habits: Vec<Habit> = [
            ("Run", HabitType::Regular),
            ("Pages", HabitType::Quantifiable),
            ("No soda", HabitType::Inverse),
        ]
        .into_iter()
        .map(|(title, habit_type)| {
            Habit::new(
                NewHabit {
                    title: title.to_string(),
                    habit_type,
                    target_value: Some(5),
                    ..Default::default()
                },
                created_at(),
            )
            .unwrap()
        })
        .collect();

        for habit in &habits {
            sqlite.create_habit(habit).unwrap();
            memory.create_habit(habit).unwrap();
        }

        let script: [(usize, u32, Option<i32>); 8] = [
            (0, 2, None),
            (0, 3, None),
            (0, 5, None),
            (1, 4, Some(3)),
            (1, 5, Some(5)),
            (1, 5, Some(1)),
            (2, 3, None),
            (2, 4, None),
        ];
        for (index, d, amount) in script {
            toggle(&sqlite, &habits[index].id, amount, day(d));
            toggle(&memory, &habits[index].id, amount, day(d));
        }

        let engine = StreakEngine::default();
        let from_sqlite = tools::list_habits(&sqlite, &engine, ListHabitsParams::default(), day(5)).unwrap();
        let from_memory = tools::list_habits(&memory, &engine, ListHabitsParams::default(), day(5)).unwrap();

        let views = |response: &tools::ListHabitsResponse| -> Vec<(HabitId, HabitView)> {
            let mut views: Vec<_> = response
                .habits
                .iter()
                .map(|h| (h.habit.id.clone(), h.view.clone()))
                .collect();
            views.sort_by(|a, b| a.0.cmp(&b.0));
            views
        };
        assert_eq!(views(&from_sqlite), views(&from_memory));

        let pages = from_sqlite
            .habits
            .iter()
            .find(|h| h.habit.title == "Pages")
            .unwrap();
        assert_eq!(pages.view.completed_count_today, 6);
        assert!(pages.view.is_completed_today);
    }

    #[test]
    fn test_delete_cascades_in_sqlite() {
        let storage = SqliteStorage::open_in_memory().expect("Failed to open SQLite");
        let habit_id = create(&storage, "Stretch", HabitType::Regular);
        toggle(&storage, &habit_id, None, day(2));

        tools::delete_habit(
            &storage,
            DeleteHabitParams {
                habit_id: habit_id.to_string(),
            },
        )
        .unwrap();

        assert!(storage.get_logs_for_habit(&habit_id, None).unwrap().is_empty());
        assert!(matches!(
            storage.get_habit(&habit_id),
            Err(StorageError::HabitNotFound { .. })
        ));
    }
}

/// In-memory implementation of the habit storage interface
///
/// Keeps habits and logs in maps behind a single lock. Used for tests and
/// for embedding the tracker where no database file is wanted; it shares
/// the exact storage contract with `SqliteStorage`.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;

use crate::domain::{Habit, HabitId, HabitLog};
use crate::storage::{HabitStorage, StorageError};

#[derive(Default)]
struct State {
    habits: HashMap<HabitId, Habit>,
    /// Keyed by habit then date, so one row per day is structural
    logs: BTreeMap<(HabitId, NaiveDate), i32>,
}

/// Storage that lives for the lifetime of the process
#[derive(Default)]
pub struct MemoryStorage {
    state: RwLock<State>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StorageError> {
        self.state.read().map_err(|_| StorageError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StorageError> {
        self.state.write().map_err(|_| StorageError::Poisoned)
    }

    fn not_found(habit_id: &HabitId) -> StorageError {
        StorageError::HabitNotFound {
            habit_id: habit_id.to_string(),
        }
    }
}

impl HabitStorage for MemoryStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let mut state = self.write()?;
        if state.habits.contains_key(&habit.id) {
            return Err(StorageError::DuplicateHabit {
                habit_id: habit.id.to_string(),
            });
        }
        state.habits.insert(habit.id.clone(), habit.clone());
        tracing::debug!("Created habit in memory: {} ({})", habit.title, habit.id);
        Ok(())
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        self.read()?
            .habits
            .get(habit_id)
            .cloned()
            .ok_or_else(|| Self::not_found(habit_id))
    }

    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let mut state = self.write()?;
        match state.habits.get_mut(&habit.id) {
            Some(existing) => {
                // created_at is fixed at creation, as in the SQL adapter
                let created_at = existing.created_at;
                *existing = habit.clone();
                existing.created_at = created_at;
                Ok(())
            }
            None => Err(Self::not_found(&habit.id)),
        }
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let mut state = self.write()?;
        if state.habits.remove(habit_id).is_none() {
            return Err(Self::not_found(habit_id));
        }
        state.logs.retain(|(id, _), _| id != habit_id);
        Ok(())
    }

    fn list_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let mut habits: Vec<Habit> = self.read()?.habits.values().cloned().collect();
        habits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(habits)
    }

    fn get_logs_for_habit(
        &self,
        habit_id: &HabitId,
        since: Option<NaiveDate>,
    ) -> Result<Vec<HabitLog>, StorageError> {
        let state = self.read()?;
        let from = since.unwrap_or(NaiveDate::MIN);

        Ok(state
            .logs
            .range((habit_id.clone(), from)..=(habit_id.clone(), NaiveDate::MAX))
            .rev()
            .map(|((id, date), count)| HabitLog::new(id.clone(), *date, *count))
            .collect())
    }

    fn get_log(&self, habit_id: &HabitId, date: NaiveDate) -> Result<Option<HabitLog>, StorageError> {
        Ok(self
            .read()?
            .logs
            .get(&(habit_id.clone(), date))
            .map(|count| HabitLog::new(habit_id.clone(), date, *count)))
    }

    fn upsert_log(&self, log: &HabitLog) -> Result<(), StorageError> {
        let mut state = self.write()?;
        if !state.habits.contains_key(&log.habit_id) {
            return Err(Self::not_found(&log.habit_id));
        }
        state
            .logs
            .insert((log.habit_id.clone(), log.log_date), log.completed_count);
        Ok(())
    }

    fn delete_log(&self, habit_id: &HabitId, date: NaiveDate) -> Result<bool, StorageError> {
        Ok(self.write()?.logs.remove(&(habit_id.clone(), date)).is_some())
    }
}

/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habits and their daily logs. It handles all SQL queries
/// and conversion between rows and domain types.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use crate::domain::{FrequencyType, Habit, HabitId, HabitLog, HabitType, TargetDays};
use crate::storage::{migrations, HabitStorage, StorageError};

const HABIT_COLUMNS: &str = "id, title, description, type, frequency_type, frequency_count, \
     target_value, target_days, unit, icon, color, reminder_time, created_at";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

/// Raw column values of a `habits` row, before domain conversion
struct HabitRow {
    id: String,
    title: String,
    description: String,
    habit_type: String,
    frequency_type: String,
    frequency_count: i32,
    target_value: i32,
    target_days: String,
    unit: String,
    icon: String,
    color: String,
    reminder_time: Option<String>,
    created_at: String,
}

impl HabitRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            habit_type: row.get(3)?,
            frequency_type: row.get(4)?,
            frequency_count: row.get(5)?,
            target_value: row.get(6)?,
            target_days: row.get(7)?,
            unit: row.get(8)?,
            icon: row.get(9)?,
            color: row.get(10)?,
            reminder_time: row.get(11)?,
            created_at: row.get(12)?,
        })
    }

    /// Convert into a Habit; malformed `target_days` degrade to no days
    fn into_habit(self) -> Result<Habit, StorageError> {
        let id = HabitId::from_string(&self.id).map_err(|e| invalid("id", e))?;
        let habit_type = self
            .habit_type
            .parse::<HabitType>()
            .map_err(|e| invalid("type", e))?;
        let frequency_type = self
            .frequency_type
            .parse::<FrequencyType>()
            .map_err(|e| invalid("frequency_type", e))?;
        let reminder_time = self
            .reminder_time
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(parse_time)
            .transpose()?;

        Ok(Habit {
            id,
            title: self.title,
            description: self.description,
            habit_type,
            frequency_type,
            frequency_count: self.frequency_count,
            target_value: self.target_value,
            target_days: TargetDays::parse_lenient(&self.target_days),
            unit: self.unit,
            icon: self.icon,
            color: self.color,
            reminder_time,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

fn invalid(column: &str, err: impl std::fmt::Display) -> StorageError {
    StorageError::InvalidData {
        column: column.to_string(),
        message: err.to_string(),
    }
}

/// Parse a stored timestamp
///
/// Rows written by this crate use RFC 3339; SQLite's own
/// `CURRENT_TIMESTAMP` format is accepted as UTC too.
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, StorageError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| invalid("created_at", e))
}

fn parse_time(s: &str) -> Result<NaiveTime, StorageError> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| invalid("reminder_time", e))
}

fn parse_date(s: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| invalid("log_date", e))
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::with_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open a private in-memory database, mostly for tests
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        // Log rows cascade with their habit
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }

    fn log_from_row(row: &Row<'_>) -> rusqlite::Result<(String, String, i32)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
    }

    fn into_log((habit_id, log_date, completed_count): (String, String, i32)) -> Result<HabitLog, StorageError> {
        Ok(HabitLog {
            habit_id: HabitId::from_string(&habit_id).map_err(|e| invalid("habit_id", e))?,
            log_date: parse_date(&log_date)?,
            completed_count,
        })
    }
}

impl HabitStorage for SqliteStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let result = self.conn.execute(
            "INSERT INTO habits (
                id, title, description, type, frequency_type, frequency_count,
                target_value, target_days, unit, icon, color, reminder_time, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                habit.id.to_string(),
                habit.title,
                habit.description,
                habit.habit_type.as_str(),
                habit.frequency_type.as_str(),
                habit.frequency_count,
                habit.target_value,
                habit.target_days.to_json(),
                habit.unit,
                habit.icon,
                habit.color,
                habit.reminder_time.map(|t| t.format("%H:%M").to_string()),
                habit.created_at.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => {
                tracing::debug!("Created habit: {} ({})", habit.title, habit.id);
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StorageError::DuplicateHabit {
                    habit_id: habit.id.to_string(),
                })
            }
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS),
                params![habit_id.to_string()],
                HabitRow::from_row,
            )
            .optional()?;

        match row {
            Some(row) => row.into_habit(),
            None => Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            }),
        }
    }

    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET
                title = ?2,
                description = ?3,
                type = ?4,
                frequency_type = ?5,
                frequency_count = ?6,
                target_value = ?7,
                target_days = ?8,
                unit = ?9,
                icon = ?10,
                color = ?11,
                reminder_time = ?12
             WHERE id = ?1",
            params![
                habit.id.to_string(),
                habit.title,
                habit.description,
                habit.habit_type.as_str(),
                habit.frequency_type.as_str(),
                habit.frequency_count,
                habit.target_value,
                habit.target_days.to_json(),
                habit.unit,
                habit.icon,
                habit.color,
                habit.reminder_time.map(|t| t.format("%H:%M").to_string()),
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        tracing::debug!("Updated habit: {} ({})", habit.title, habit.id);
        Ok(())
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        let id = habit_id.to_string();

        tx.execute("DELETE FROM habit_logs WHERE habit_id = ?1", params![id])?;
        let rows_affected = tx.execute("DELETE FROM habits WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound { habit_id: id });
        }
        tx.commit()?;

        tracing::debug!("Deleted habit and its logs: {}", id);
        Ok(())
    }

    fn list_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM habits ORDER BY created_at DESC",
            HABIT_COLUMNS
        ))?;

        let rows = stmt
            .query_map([], HabitRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(HabitRow::into_habit).collect()
    }

    fn get_logs_for_habit(
        &self,
        habit_id: &HabitId,
        since: Option<NaiveDate>,
    ) -> Result<Vec<HabitLog>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT habit_id, log_date, completed_count
             FROM habit_logs
             WHERE habit_id = ?1 AND (?2 IS NULL OR log_date >= ?2)
             ORDER BY log_date DESC",
        )?;

        let rows = stmt
            .query_map(
                params![habit_id.to_string(), since.map(|d| d.to_string())],
                Self::log_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(Self::into_log).collect()
    }

    fn get_log(&self, habit_id: &HabitId, date: NaiveDate) -> Result<Option<HabitLog>, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT habit_id, log_date, completed_count
                 FROM habit_logs WHERE habit_id = ?1 AND log_date = ?2",
                params![habit_id.to_string(), date.to_string()],
                Self::log_from_row,
            )
            .optional()?;

        row.map(Self::into_log).transpose()
    }

    fn upsert_log(&self, log: &HabitLog) -> Result<(), StorageError> {
        let result = self.conn.execute(
            "INSERT INTO habit_logs (habit_id, log_date, completed_count)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (habit_id, log_date)
             DO UPDATE SET completed_count = excluded.completed_count",
            params![log.habit_id.to_string(), log.log_date.to_string(), log.completed_count],
        );

        match result {
            Ok(_) => {
                tracing::debug!(
                    "Stored log for habit {} on {}: {}",
                    log.habit_id,
                    log.log_date,
                    log.completed_count
                );
                Ok(())
            }
            // The foreign key is the only constraint left once the conflict is handled
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StorageError::HabitNotFound {
                    habit_id: log.habit_id.to_string(),
                })
            }
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn delete_log(&self, habit_id: &HabitId, date: NaiveDate) -> Result<bool, StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM habit_logs WHERE habit_id = ?1 AND log_date = ?2",
            params![habit_id.to_string(), date.to_string()],
        )?;

        tracing::debug!("Deleted {} log(s) for habit {} on {}", rows_affected, habit_id, date);
        Ok(rows_affected > 0)
    }
}

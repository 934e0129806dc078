/// Core types and enums used throughout the domain layer
///
/// This module defines the fundamental types like HabitType, FrequencyType,
/// TargetDays and the HabitId wrapper used by Habit, HabitLog and the engine.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// This is a wrapper around UUID to provide type safety - you can't accidentally
/// pass an arbitrary string where a habit ID is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a habit ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The kind of habit, which decides how a day's log is judged
///
/// Regular habits count repetitions against `frequency_count`, quantifiable
/// habits accumulate units against `target_value`, and inverse habits are
/// successful by default until a failure is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum HabitType {
    #[default]
    Regular,
    Quantifiable,
    Inverse,
}

impl HabitType {
    /// Text used for storage and the tool surface
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitType::Regular => "regular",
            HabitType::Quantifiable => "quantifiable",
            HabitType::Inverse => "inverse",
        }
    }
}

impl fmt::Display for HabitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "regular" => Ok(HabitType::Regular),
            "quantifiable" => Ok(HabitType::Quantifiable),
            "inverse" => Ok(HabitType::Inverse),
            other => Err(DomainError::Validation {
                message: format!(
                    "Invalid habit type '{}'. Valid options: regular, quantifiable, inverse",
                    other
                ),
            }),
        }
    }
}

/// How the habit is scheduled across the week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyType {
    /// Every day is a target day
    #[default]
    Daily,
    /// Only the weekdays listed in `target_days` are target days
    SpecificDays,
}

impl FrequencyType {
    /// Text used for storage and the tool surface
    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyType::Daily => "daily",
            FrequencyType::SpecificDays => "specific_days",
        }
    }
}

impl fmt::Display for FrequencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrequencyType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(FrequencyType::Daily),
            "specific_days" => Ok(FrequencyType::SpecificDays),
            other => Err(DomainError::InvalidFrequency(format!(
                "'{}'. Valid options: daily, specific_days",
                other
            ))),
        }
    }
}

/// Set of weekday indices, 0 = Sunday through 6 = Saturday
///
/// Serialized as a plain list of integers, which is also the format kept in
/// the `target_days` column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct TargetDays(BTreeSet<u8>);

impl TargetDays {
    /// Highest valid weekday index (Saturday)
    pub const MAX_INDEX: u8 = 6;

    /// Build a set from indices, rejecting anything outside 0..=6
    pub fn new<I: IntoIterator<Item = u8>>(days: I) -> Result<Self, DomainError> {
        let mut set = BTreeSet::new();
        for day in days {
            if day > Self::MAX_INDEX {
                return Err(DomainError::InvalidFrequency(format!(
                    "Target day index must be 0 (Sunday) to 6 (Saturday), got {}",
                    day
                )));
            }
            set.insert(day);
        }
        Ok(Self(set))
    }

    /// Parse the stored JSON list, degrading to an empty set
    ///
    /// Unparseable text yields no target days at all; entries outside the
    /// weekday range are dropped individually.
    pub fn parse_lenient(raw: &str) -> Self {
        match serde_json::from_str::<Vec<i64>>(raw) {
            Ok(values) => Self(
                values
                    .into_iter()
                    .filter_map(|v| u8::try_from(v).ok())
                    .filter(|v| *v <= Self::MAX_INDEX)
                    .collect(),
            ),
            Err(e) => {
                tracing::warn!("Ignoring malformed target_days {:?}: {}", raw, e);
                Self::default()
            }
        }
    }

    /// JSON list representation for storage
    pub fn to_json(&self) -> String {
        let days: Vec<u8> = self.0.iter().copied().collect();
        // A Vec<u8> always serializes
        serde_json::to_string(&days).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn contains(&self, index: u8) -> bool {
        self.0.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }
}

/// Index of a date's weekday with Sunday as 0
pub fn weekday_index(date: NaiveDate) -> u8 {
    // num_days_from_sunday is always 0..=6
    date.weekday().num_days_from_sunday() as u8
}

/// A habit's weekly schedule, deciding which calendar days are target days
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule<'a> {
    frequency_type: FrequencyType,
    target_days: &'a TargetDays,
}

impl<'a> Schedule<'a> {
    pub fn new(frequency_type: FrequencyType, target_days: &'a TargetDays) -> Self {
        Self {
            frequency_type,
            target_days,
        }
    }

    /// Check if the habit expects action on the given date
    ///
    /// An empty `specific_days` schedule never has a target day.
    pub fn is_target_day(&self, date: NaiveDate) -> bool {
        match self.frequency_type {
            FrequencyType::Daily => true,
            FrequencyType::SpecificDays => self.target_days.contains(weekday_index(date)),
        }
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::weekday::Weekday;

/// A local time-of-day range within one day, stored as `HH:MM` or
/// `HH:MM:SS` strings in the practitioner's location timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: String,
    pub end: String,
}

impl TimeWindow {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }
}

/// Recurring weekly working hours for one practitioner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklyTemplate {
    pub days: BTreeMap<Weekday, Vec<TimeWindow>>,
}

impl WeeklyTemplate {
    pub fn windows_for(&self, day: Weekday) -> &[TimeWindow] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn with_day(mut self, day: Weekday, windows: Vec<TimeWindow>) -> Self {
        self.days.insert(day, windows);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideKind {
    Unavailable,
    Blocked,
    Available,
}

impl fmt::Display for OverrideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideKind::Unavailable => write!(f, "unavailable"),
            OverrideKind::Blocked => write!(f, "blocked"),
            OverrideKind::Available => write!(f, "available"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideRecurrence {
    None,
    Weekly,
    Biweekly,
    Monthly,
}

/// A date-ranged exception to the weekly template: vacation, a blocked
/// afternoon, or extra ad-hoc hours.
///
/// A missing time range on a blocking override covers the whole day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityOverride {
    pub id: Uuid,
    pub date_range_start: NaiveDate,
    pub date_range_end: NaiveDate,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    pub kind: OverrideKind,
    pub recurrence: OverrideRecurrence,
    pub recurring_weekdays: Option<Vec<Weekday>>,
    pub created_at: DateTime<Utc>,
}

impl AvailabilityOverride {
    /// Whether this override is in force on the given date. Recurring
    /// overrides with a weekday list only apply on the listed weekdays;
    /// without a list they apply to every date in the range.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        if date < self.date_range_start || date > self.date_range_end {
            return false;
        }

        match self.recurrence {
            OverrideRecurrence::None => true,
            _ => match &self.recurring_weekdays {
                Some(days) => days.contains(&Weekday::from_date(date)),
                None => true,
            },
        }
    }

    pub fn is_all_day(&self) -> bool {
        self.time_start.is_none() || self.time_end.is_none()
    }
}

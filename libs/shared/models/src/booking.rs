// libs/shared/models/src/booking.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::weekday::Weekday;

/// A scheduled therapy session. Times are local `HH:MM` / `HH:MM:SS`
/// strings on `date`; the half-open range `[start_time, end_time)` holds
/// the practitioner's calendar while the status is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub practitioner_id: Uuid,
    pub client_id: Uuid,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: BookingStatus,
    pub is_recurring: bool,
    pub recurrence_rule: Option<RecurrenceRule>,
    pub parent_booking_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Scheduled,
    Confirmed,
    CheckedIn,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    /// Active bookings hold the practitioner's time and participate in
    /// conflict detection.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            BookingStatus::Scheduled
                | BookingStatus::Confirmed
                | BookingStatus::CheckedIn
                | BookingStatus::InProgress
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::NoShow
        )
    }

    pub fn can_transition_to(&self, target: &BookingStatus) -> bool {
        use BookingStatus::*;
        match (self, target) {
            // Forward through the session lifecycle, skips allowed
            (Scheduled, Confirmed) => true,
            (Scheduled, CheckedIn) | (Confirmed, CheckedIn) => true,
            (Scheduled, InProgress) | (Confirmed, InProgress) | (CheckedIn, InProgress) => true,
            (Scheduled, Completed)
            | (Confirmed, Completed)
            | (CheckedIn, Completed)
            | (InProgress, Completed) => true,
            // A client can fail to show up until the session starts
            (Scheduled, NoShow) | (Confirmed, NoShow) => true,
            (_, Cancelled) => !self.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Scheduled => write!(f, "scheduled"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::CheckedIn => write!(f, "checked_in"),
            BookingStatus::InProgress => write!(f, "in_progress"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::NoShow => write!(f, "no_show"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceFrequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

/// How a recurring series repeats. The rule is immutable once the series
/// is created; occurrence dates are always derived from it, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: RecurrenceFrequency,
    /// Every N days/weeks/months. Biweekly doubles the week step.
    pub interval: u32,
    /// Weekly and biweekly only; absent means the series start's weekday.
    pub days_of_week: Option<Vec<Weekday>>,
    pub end_date: NaiveDate,
}

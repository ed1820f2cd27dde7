use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::booking::BookingStatus;

/// An existing booking that overlaps a requested time range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictEntry {
    pub booking_id: Uuid,
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
}

/// Every conflict found on a single candidate date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateConflict {
    pub date: NaiveDate,
    pub entries: Vec<ConflictEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum SchedulingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Schedule conflict on {count} date(s)", count = .conflicts.len())]
    Conflict { conflicts: Vec<DateConflict> },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Storage error: {0}")]
    Store(String),

    #[error("Notification error: {0}")]
    Notify(String),
}

impl SchedulingError {
    /// Convenience constructor for the single-date conflict case.
    pub fn conflict_on(date: NaiveDate, entries: Vec<ConflictEntry>) -> Self {
        SchedulingError::Conflict {
            conflicts: vec![DateConflict { date, entries }],
        }
    }
}

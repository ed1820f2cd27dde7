// libs/booking-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::{Booking, ConflictEntry};

/// Outcome of checking a candidate time range against a practitioner's
/// calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCheckResult {
    pub has_conflict: bool,
    pub conflicts: Vec<ConflictEntry>,
}

/// What a caller supplies to book a session. Identifiers and timestamps
/// are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub practitioner_id: Uuid,
    pub client_id: Uuid,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}

/// An occurrence that cleared the conflict pre-check but could not be
/// written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedOccurrence {
    pub date: NaiveDate,
    pub reason: String,
}

/// Result of creating a recurring series: the parent booking, every
/// child that was written, and the occurrences that failed at storage
/// time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringBookingOutcome {
    pub parent: Booking,
    pub children: Vec<Booking>,
    pub failed_occurrences: Vec<FailedOccurrence>,
}

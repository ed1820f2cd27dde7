// libs/waitlist-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use availability_cell::models::Slot;
use shared_models::{TimeWindow, WaitlistEntry, WaitlistPriority};

/// What a client asks for when joining the waitlist. Absent preference
/// lists accept any date or time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddToWaitlistRequest {
    pub client_id: Uuid,
    pub practitioner_id: Uuid,
    pub preferred_dates: Option<Vec<NaiveDate>>,
    pub preferred_times: Option<Vec<TimeWindow>>,
    pub priority: WaitlistPriority,
}

/// A freed slot paired with the entry chosen for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistMatch {
    pub entry: WaitlistEntry,
    pub slot: Slot,
}

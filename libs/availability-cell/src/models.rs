// libs/availability-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::TimeWindow;

/// What a practitioner's calendar actually offers on one date after the
/// weekly template and every override have been applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveAvailability {
    pub is_available: bool,
    pub time_windows: Vec<TimeWindow>,
}

/// A bookable slice of a working window. Derived on demand and never
/// persisted; times are local to the location's timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start_time: String,
    pub end_time: String,
    pub practitioner_id: Uuid,
    pub location_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotQuery {
    pub date: NaiveDate,
    /// Falls back to the configured default slot length when absent.
    pub duration_minutes: Option<u32>,
    pub location_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotRangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub duration_minutes: Option<u32>,
    pub location_id: Uuid,
}

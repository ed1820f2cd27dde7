use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::availability::TimeWindow;

/// A client waiting for a slot to open with a practitioner. Absent
/// preference lists match any date or time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub client_id: Uuid,
    pub practitioner_id: Uuid,
    pub preferred_dates: Option<Vec<NaiveDate>>,
    pub preferred_times: Option<Vec<TimeWindow>>,
    pub priority: WaitlistPriority,
    pub status: WaitlistStatus,
    pub added_at: DateTime<Utc>,
    pub notified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitlistPriority {
    Standard,
    Urgent,
}

impl fmt::Display for WaitlistPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitlistPriority::Standard => write!(f, "standard"),
            WaitlistPriority::Urgent => write!(f, "urgent"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitlistStatus {
    Waiting,
    Notified,
    Scheduled,
    Expired,
}

impl WaitlistStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WaitlistStatus::Scheduled | WaitlistStatus::Expired)
    }
}

impl fmt::Display for WaitlistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitlistStatus::Waiting => write!(f, "waiting"),
            WaitlistStatus::Notified => write!(f, "notified"),
            WaitlistStatus::Scheduled => write!(f, "scheduled"),
            WaitlistStatus::Expired => write!(f, "expired"),
        }
    }
}

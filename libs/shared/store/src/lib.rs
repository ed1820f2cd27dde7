//! Port interfaces between the scheduling engine and the hosting platform.
//!
//! The engine never talks to a database or a message bus directly. The
//! platform injects implementations of these traits, and every call is
//! scoped to a tenant so implementors can enforce row-level isolation.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use shared_models::{
    AvailabilityOverride, Booking, BookingStatus, RecurrenceRule, SchedulingError, TimeWindow,
    WaitlistEntry, WaitlistPriority, WaitlistStatus, WeeklyTemplate,
};

pub mod memory;

/// Write shape for a new booking. The store assigns the id and timestamps
/// and stamps the tenant from the call scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub practitioner_id: Uuid,
    pub client_id: Uuid,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: BookingStatus,
    pub is_recurring: bool,
    pub recurrence_rule: Option<RecurrenceRule>,
    pub parent_booking_id: Option<Uuid>,
}

/// Partial update for an existing booking; `None` fields are left as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingChange {
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub status: Option<BookingStatus>,
}

/// Write shape for a new waitlist entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWaitlistEntry {
    pub client_id: Uuid,
    pub practitioner_id: Uuid,
    pub preferred_dates: Option<Vec<NaiveDate>>,
    pub preferred_times: Option<Vec<TimeWindow>>,
    pub priority: WaitlistPriority,
    pub status: WaitlistStatus,
}

/// Partial update for an existing waitlist entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaitlistEntryChange {
    pub status: Option<WaitlistStatus>,
    pub notified_at: Option<DateTime<Utc>>,
}

/// Persistence port for availability, bookings and the waitlist.
///
/// Contract on implementors: the conflict-gate read and the subsequent
/// booking write for the same tenant, practitioner and date must be
/// serialized at the persistence boundary (a uniqueness or exclusion
/// constraint is the usual mechanism). The engine itself takes no locks.
#[async_trait]
pub trait SchedulingStore: Send + Sync {
    /// Weekly availability template for one practitioner. A practitioner
    /// without a template has no working hours.
    async fn get_weekly_template(
        &self,
        tenant_id: Uuid,
        practitioner_id: Uuid,
    ) -> Result<WeeklyTemplate, SchedulingError>;

    /// Overrides whose date range intersects the inclusive `from..=to`
    /// window, in creation order. Later-created overrides win by being
    /// applied last.
    async fn get_overrides(
        &self,
        tenant_id: Uuid,
        practitioner_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AvailabilityOverride>, SchedulingError>;

    /// Bookings holding the practitioner's time on the date. Implementors
    /// may pre-filter by status; callers re-filter regardless.
    async fn get_active_bookings(
        &self,
        tenant_id: Uuid,
        practitioner_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, SchedulingError>;

    async fn get_booking(
        &self,
        tenant_id: Uuid,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, SchedulingError>;

    async fn create_booking(
        &self,
        tenant_id: Uuid,
        booking: NewBooking,
    ) -> Result<Booking, SchedulingError>;

    async fn update_booking(
        &self,
        tenant_id: Uuid,
        booking_id: Uuid,
        change: BookingChange,
    ) -> Result<Booking, SchedulingError>;

    /// IANA timezone name for a practice location, e.g. "America/Chicago".
    /// An empty string means the location has no timezone configured.
    async fn get_location_timezone(
        &self,
        tenant_id: Uuid,
        location_id: Uuid,
    ) -> Result<String, SchedulingError>;

    async fn create_waitlist_entry(
        &self,
        tenant_id: Uuid,
        entry: NewWaitlistEntry,
    ) -> Result<WaitlistEntry, SchedulingError>;

    async fn get_waitlist_entry(
        &self,
        tenant_id: Uuid,
        entry_id: Uuid,
    ) -> Result<Option<WaitlistEntry>, SchedulingError>;

    /// Entries for the practitioner with the given status, oldest first.
    async fn get_waitlist_entries(
        &self,
        tenant_id: Uuid,
        practitioner_id: Uuid,
        status: WaitlistStatus,
    ) -> Result<Vec<WaitlistEntry>, SchedulingError>;

    async fn update_waitlist_entry(
        &self,
        tenant_id: Uuid,
        entry_id: Uuid,
        change: WaitlistEntryChange,
    ) -> Result<WaitlistEntry, SchedulingError>;
}

/// Outbound notification hook. Transport is the platform's concern; the
/// engine treats delivery failures as non-fatal and only logs them.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        client_id: Uuid,
        message: &str,
        metadata: Value,
    ) -> Result<(), SchedulingError>;
}

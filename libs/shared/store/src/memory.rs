//! In-memory `SchedulingStore` and `Notifier` implementations.
//!
//! Used by the integration tests and handy for local development; a real
//! deployment injects database-backed implementations instead.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use shared_models::{
    AvailabilityOverride, Booking, SchedulingError, WaitlistEntry, WaitlistStatus, WeeklyTemplate,
};

use crate::{
    BookingChange, NewBooking, NewWaitlistEntry, Notifier, SchedulingStore, WaitlistEntryChange,
};

#[derive(Default)]
struct MemoryState {
    templates: HashMap<(Uuid, Uuid), WeeklyTemplate>,
    overrides: HashMap<(Uuid, Uuid), Vec<AvailabilityOverride>>,
    bookings: Vec<Booking>,
    waitlist: Vec<WaitlistEntry>,
    timezones: HashMap<(Uuid, Uuid), String>,
    rejected_dates: HashSet<NaiveDate>,
}

/// Mutex-held state keyed by `(tenant_id, owner_id)` where it matters; the
/// single lock also serializes the conflict-gate read against the booking
/// write, satisfying the store contract.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_weekly_template(
        &self,
        tenant_id: Uuid,
        practitioner_id: Uuid,
        template: WeeklyTemplate,
    ) {
        let mut state = self.state.lock().await;
        state.templates.insert((tenant_id, practitioner_id), template);
    }

    pub async fn add_override(
        &self,
        tenant_id: Uuid,
        practitioner_id: Uuid,
        entry: AvailabilityOverride,
    ) {
        let mut state = self.state.lock().await;
        state
            .overrides
            .entry((tenant_id, practitioner_id))
            .or_default()
            .push(entry);
    }

    pub async fn set_location_timezone(&self, tenant_id: Uuid, location_id: Uuid, timezone: &str) {
        let mut state = self.state.lock().await;
        state
            .timezones
            .insert((tenant_id, location_id), timezone.to_string());
    }

    /// Seed a booking directly, bypassing the write path.
    pub async fn insert_booking(&self, booking: Booking) {
        let mut state = self.state.lock().await;
        state.bookings.push(booking);
    }

    /// Force `create_booking` to fail for the given date. Lets tests
    /// exercise partial series creation.
    pub async fn reject_bookings_on(&self, date: NaiveDate) {
        let mut state = self.state.lock().await;
        state.rejected_dates.insert(date);
    }

    /// Snapshot of every stored booking, for assertions.
    pub async fn bookings(&self) -> Vec<Booking> {
        self.state.lock().await.bookings.clone()
    }

    /// Snapshot of every stored waitlist entry, for assertions.
    pub async fn waitlist(&self) -> Vec<WaitlistEntry> {
        self.state.lock().await.waitlist.clone()
    }
}

#[async_trait]
impl SchedulingStore for MemoryStore {
    async fn get_weekly_template(
        &self,
        tenant_id: Uuid,
        practitioner_id: Uuid,
    ) -> Result<WeeklyTemplate, SchedulingError> {
        let state = self.state.lock().await;
        Ok(state
            .templates
            .get(&(tenant_id, practitioner_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn get_overrides(
        &self,
        tenant_id: Uuid,
        practitioner_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AvailabilityOverride>, SchedulingError> {
        let state = self.state.lock().await;
        Ok(state
            .overrides
            .get(&(tenant_id, practitioner_id))
            .map(|entries| {
                entries
                    .iter()
                    .filter(|o| o.date_range_start <= to && o.date_range_end >= from)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_active_bookings(
        &self,
        tenant_id: Uuid,
        practitioner_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, SchedulingError> {
        let state = self.state.lock().await;
        let mut bookings: Vec<Booking> = state
            .bookings
            .iter()
            .filter(|b| {
                b.tenant_id == tenant_id
                    && b.practitioner_id == practitioner_id
                    && b.date == date
                    && b.status.is_active()
            })
            .cloned()
            .collect();
        bookings.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        Ok(bookings)
    }

    async fn get_booking(
        &self,
        tenant_id: Uuid,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, SchedulingError> {
        let state = self.state.lock().await;
        Ok(state
            .bookings
            .iter()
            .find(|b| b.tenant_id == tenant_id && b.id == booking_id)
            .cloned())
    }

    async fn create_booking(
        &self,
        tenant_id: Uuid,
        booking: NewBooking,
    ) -> Result<Booking, SchedulingError> {
        let mut state = self.state.lock().await;
        if state.rejected_dates.contains(&booking.date) {
            return Err(SchedulingError::Store(format!(
                "booking write rejected for {}",
                booking.date
            )));
        }

        let now = Utc::now();
        let stored = Booking {
            id: Uuid::new_v4(),
            tenant_id,
            practitioner_id: booking.practitioner_id,
            client_id: booking.client_id,
            date: booking.date,
            start_time: booking.start_time,
            end_time: booking.end_time,
            status: booking.status,
            is_recurring: booking.is_recurring,
            recurrence_rule: booking.recurrence_rule,
            parent_booking_id: booking.parent_booking_id,
            created_at: now,
            updated_at: now,
        };
        state.bookings.push(stored.clone());
        Ok(stored)
    }

    async fn update_booking(
        &self,
        tenant_id: Uuid,
        booking_id: Uuid,
        change: BookingChange,
    ) -> Result<Booking, SchedulingError> {
        let mut state = self.state.lock().await;
        let booking = state
            .bookings
            .iter_mut()
            .find(|b| b.tenant_id == tenant_id && b.id == booking_id)
            .ok_or_else(|| SchedulingError::NotFound(format!("booking {}", booking_id)))?;

        if let Some(date) = change.date {
            booking.date = date;
        }
        if let Some(start_time) = change.start_time {
            booking.start_time = start_time;
        }
        if let Some(end_time) = change.end_time {
            booking.end_time = end_time;
        }
        if let Some(status) = change.status {
            booking.status = status;
        }
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }

    async fn get_location_timezone(
        &self,
        tenant_id: Uuid,
        location_id: Uuid,
    ) -> Result<String, SchedulingError> {
        let state = self.state.lock().await;
        Ok(state
            .timezones
            .get(&(tenant_id, location_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn create_waitlist_entry(
        &self,
        tenant_id: Uuid,
        entry: NewWaitlistEntry,
    ) -> Result<WaitlistEntry, SchedulingError> {
        let mut state = self.state.lock().await;
        let stored = WaitlistEntry {
            id: Uuid::new_v4(),
            tenant_id,
            client_id: entry.client_id,
            practitioner_id: entry.practitioner_id,
            preferred_dates: entry.preferred_dates,
            preferred_times: entry.preferred_times,
            priority: entry.priority,
            status: entry.status,
            added_at: Utc::now(),
            notified_at: None,
        };
        state.waitlist.push(stored.clone());
        Ok(stored)
    }

    async fn get_waitlist_entry(
        &self,
        tenant_id: Uuid,
        entry_id: Uuid,
    ) -> Result<Option<WaitlistEntry>, SchedulingError> {
        let state = self.state.lock().await;
        Ok(state
            .waitlist
            .iter()
            .find(|e| e.tenant_id == tenant_id && e.id == entry_id)
            .cloned())
    }

    async fn get_waitlist_entries(
        &self,
        tenant_id: Uuid,
        practitioner_id: Uuid,
        status: WaitlistStatus,
    ) -> Result<Vec<WaitlistEntry>, SchedulingError> {
        let state = self.state.lock().await;
        let mut entries: Vec<WaitlistEntry> = state
            .waitlist
            .iter()
            .filter(|e| {
                e.tenant_id == tenant_id
                    && e.practitioner_id == practitioner_id
                    && e.status == status
            })
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.added_at.cmp(&b.added_at));
        Ok(entries)
    }

    async fn update_waitlist_entry(
        &self,
        tenant_id: Uuid,
        entry_id: Uuid,
        change: WaitlistEntryChange,
    ) -> Result<WaitlistEntry, SchedulingError> {
        let mut state = self.state.lock().await;
        let entry = state
            .waitlist
            .iter_mut()
            .find(|e| e.tenant_id == tenant_id && e.id == entry_id)
            .ok_or_else(|| SchedulingError::NotFound(format!("waitlist entry {}", entry_id)))?;

        if let Some(status) = change.status {
            entry.status = status;
        }
        if let Some(notified_at) = change.notified_at {
            entry.notified_at = Some(notified_at);
        }
        Ok(entry.clone())
    }
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone)]
pub struct SentNotification {
    pub client_id: Uuid,
    pub message: String,
    pub metadata: Value,
    pub sent_at: DateTime<Utc>,
}

/// Notifier that records every call instead of delivering anything.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentNotification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        client_id: Uuid,
        message: &str,
        metadata: Value,
    ) -> Result<(), SchedulingError> {
        let mut sent = self.sent.lock().await;
        sent.push(SentNotification {
            client_id,
            message: message.to_string(),
            metadata,
            sent_at: Utc::now(),
        });
        Ok(())
    }
}

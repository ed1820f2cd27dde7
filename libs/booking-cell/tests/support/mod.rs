// Shared fixtures for the booking integration tests.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use booking_cell::models::BookingRequest;
use shared_models::{Booking, BookingStatus, RecurrenceFrequency, RecurrenceRule};
use shared_store::memory::MemoryStore;

pub struct TestSetup {
    pub store: Arc<MemoryStore>,
    pub tenant_id: Uuid,
    pub practitioner_id: Uuid,
    pub client_id: Uuid,
}

impl TestSetup {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            tenant_id: Uuid::new_v4(),
            practitioner_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
        }
    }

    pub fn request(&self, date: NaiveDate, start: &str, end: &str) -> BookingRequest {
        BookingRequest {
            practitioner_id: self.practitioner_id,
            client_id: self.client_id,
            date,
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    pub fn booking(&self, date: NaiveDate, start: &str, end: &str, status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            tenant_id: self.tenant_id,
            practitioner_id: self.practitioner_id,
            client_id: Uuid::new_v4(),
            date,
            start_time: start.to_string(),
            end_time: end.to_string(),
            status,
            is_recurring: false,
            recurrence_rule: None,
            parent_booking_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub async fn seed_booking(
        &self,
        date: NaiveDate,
        start: &str,
        end: &str,
        status: BookingStatus,
    ) -> Booking {
        let booking = self.booking(date, start, end, status);
        self.store.insert_booking(booking.clone()).await;
        booking
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Weekly rule on the series start's weekday, interval one.
pub fn weekly_rule(end_date: NaiveDate) -> RecurrenceRule {
    RecurrenceRule {
        frequency: RecurrenceFrequency::Weekly,
        interval: 1,
        days_of_week: None,
        end_date,
    }
}

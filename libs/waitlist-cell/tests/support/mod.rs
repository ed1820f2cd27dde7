// Shared fixtures for the waitlist integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::{
    Booking, BookingStatus, SchedulingError, TimeWindow, WaitlistPriority, Weekday, WeeklyTemplate,
};
use shared_store::memory::MemoryStore;
use shared_store::Notifier;
use waitlist_cell::models::AddToWaitlistRequest;

pub struct TestSetup {
    pub store: Arc<MemoryStore>,
    pub tenant_id: Uuid,
    pub practitioner_id: Uuid,
    pub location_id: Uuid,
}

impl TestSetup {
    pub async fn new() -> Self {
        let setup = Self {
            store: Arc::new(MemoryStore::new()),
            tenant_id: Uuid::new_v4(),
            practitioner_id: Uuid::new_v4(),
            location_id: Uuid::new_v4(),
        };
        setup
            .store
            .set_location_timezone(setup.tenant_id, setup.location_id, "UTC")
            .await;
        setup
    }

    /// Monday 09:00-11:00 working hours, enough for two hour-long slots.
    pub async fn install_monday_template(&self) {
        self.store
            .set_weekly_template(
                self.tenant_id,
                self.practitioner_id,
                WeeklyTemplate::default()
                    .with_day(Weekday::Monday, vec![TimeWindow::new("09:00", "11:00")]),
            )
            .await;
    }

    /// Seed a confirmed booking that holds `start`-`end` on the date.
    pub async fn block_time(&self, date: NaiveDate, start: &str, end: &str) {
        self.store
            .insert_booking(Booking {
                id: Uuid::new_v4(),
                tenant_id: self.tenant_id,
                practitioner_id: self.practitioner_id,
                client_id: Uuid::new_v4(),
                date,
                start_time: start.to_string(),
                end_time: end.to_string(),
                status: BookingStatus::Confirmed,
                is_recurring: false,
                recurrence_rule: None,
                parent_booking_id: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await;
    }

    pub fn entry_request(&self, priority: WaitlistPriority) -> AddToWaitlistRequest {
        AddToWaitlistRequest {
            client_id: Uuid::new_v4(),
            practitioner_id: self.practitioner_id,
            preferred_dates: None,
            preferred_times: None,
            priority,
        }
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Fixed configuration so the default slot length is a round hour.
pub fn config() -> AppConfig {
    AppConfig {
        default_slot_duration_minutes: 60,
        default_timezone: "UTC".to_string(),
        waitlist_response_window_hours: 24,
    }
}

/// Notifier that refuses every send, for exercising the fire-and-forget
/// delivery contract.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(
        &self,
        _client_id: Uuid,
        _message: &str,
        _metadata: Value,
    ) -> Result<(), SchedulingError> {
        Err(SchedulingError::Notify("sms gateway unavailable".to_string()))
    }
}

// Shared fixtures for the availability integration tests.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use shared_models::{
    AvailabilityOverride, Booking, BookingStatus, OverrideKind, OverrideRecurrence, WeeklyTemplate,
};
use shared_store::memory::MemoryStore;

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

    pub async fn install_template(&self, template: WeeklyTemplate) {
        self.store
            .set_weekly_template(self.tenant_id, self.practitioner_id, template)
            .await;
    }

    pub async fn add_override(&self, entry: AvailabilityOverride) {
        self.store
            .add_override(self.tenant_id, self.practitioner_id, entry)
            .await;
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
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn day_override(
    kind: OverrideKind,
    from: NaiveDate,
    to: NaiveDate,
    times: Option<(&str, &str)>,
) -> AvailabilityOverride {
    AvailabilityOverride {
        id: Uuid::new_v4(),
        date_range_start: from,
        date_range_end: to,
        time_start: times.map(|(start, _)| start.to_string()),
        time_end: times.map(|(_, end)| end.to_string()),
        kind,
        recurrence: OverrideRecurrence::None,
        recurring_weekdays: None,
        created_at: Utc::now(),
    }
}

use chrono::{Duration, LocalResult, NaiveDate, TimeZone};
use chrono_tz::Tz;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::{overlaps, parse_time_of_day, SchedulingError, TimeWindow};
use shared_store::SchedulingStore;

use crate::models::{Slot, SlotQuery, SlotRangeQuery};
use crate::services::resolver::AvailabilityService;

/// Cut one working window into fixed-length slots, anchored to real
/// instants in the location's timezone.
///
/// The walk advances by `duration_minutes` of elapsed time, so on a DST
/// transition day the wall-clock labels jump with the clock change. On an
/// ambiguous local time the earlier instant wins. A slot whose end would
/// pass the window end is dropped.
///
/// Malformed window times, a nonexistent local start or end, and a zero
/// duration all yield an empty list; a calendar read never fails because
/// one row is bad.
pub fn generate_slots(
    window: &TimeWindow,
    date: NaiveDate,
    duration_minutes: u32,
    timezone: Tz,
    practitioner_id: Uuid,
    location_id: Uuid,
) -> Vec<Slot> {
    if duration_minutes == 0 {
        warn!("Slot generation asked for a zero-minute duration, skipping window");
        return Vec::new();
    }

    let (start, end) = match (parse_time_of_day(&window.start), parse_time_of_day(&window.end)) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            warn!(
                "Skipping window with unparseable times {}-{}",
                window.start, window.end
            );
            return Vec::new();
        }
    };

    let start_instant = match timezone.from_local_datetime(&date.and_time(start)) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            warn!(
                "Window start {} does not exist on {} in {}, skipping window",
                window.start, date, timezone
            );
            return Vec::new();
        }
    };
    let end_instant = match timezone.from_local_datetime(&date.and_time(end)) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            warn!(
                "Window end {} does not exist on {} in {}, skipping window",
                window.end, date, timezone
            );
            return Vec::new();
        }
    };

    let step = Duration::minutes(i64::from(duration_minutes));
    let mut slots = Vec::new();
    let mut current = start_instant;

    while current + step <= end_instant {
        let slot_end = current + step;
        slots.push(Slot {
            start_time: current.format("%H:%M").to_string(),
            end_time: slot_end.format("%H:%M").to_string(),
            practitioner_id,
            location_id,
        });
        current = slot_end;
    }

    slots
}

pub struct SlotService {
    store: Arc<dyn SchedulingStore>,
    availability: AvailabilityService,
    default_duration_minutes: u32,
    default_timezone: String,
}

impl SlotService {
    pub fn new(store: Arc<dyn SchedulingStore>, config: &AppConfig) -> Self {
        let availability = AvailabilityService::new(Arc::clone(&store));
        Self {
            store,
            availability,
            default_duration_minutes: config.default_slot_duration_minutes,
            default_timezone: config.default_timezone.clone(),
        }
    }

    /// Open slots for one practitioner on one date: effective windows cut
    /// into slots, minus anything an active booking already holds.
    pub async fn get_available_slots(
        &self,
        tenant_id: Uuid,
        practitioner_id: Uuid,
        query: SlotQuery,
    ) -> Result<Vec<Slot>, SchedulingError> {
        debug!(
            "Calculating available slots for practitioner {} on {}",
            practitioner_id, query.date
        );

        let availability = self
            .availability
            .resolve_effective_availability(tenant_id, practitioner_id, query.date)
            .await?;
        if !availability.is_available {
            return Ok(Vec::new());
        }

        let timezone = match self.location_timezone(tenant_id, query.location_id).await? {
            Some(tz) => tz,
            None => return Ok(Vec::new()),
        };

        let duration = query
            .duration_minutes
            .unwrap_or(self.default_duration_minutes);
        let bookings = self
            .store
            .get_active_bookings(tenant_id, practitioner_id, query.date)
            .await?;

        let mut available_slots = Vec::new();
        for window in &availability.time_windows {
            for slot in generate_slots(
                window,
                query.date,
                duration,
                timezone,
                practitioner_id,
                query.location_id,
            ) {
                let taken = bookings.iter().any(|booking| {
                    booking.status.is_active()
                        && overlaps(
                            slot.start_time.as_str(),
                            slot.end_time.as_str(),
                            booking.start_time.as_str(),
                            booking.end_time.as_str(),
                        )
                });
                if !taken {
                    available_slots.push(slot);
                }
            }
        }

        available_slots.sort_by(|a, b| a.start_time.cmp(&b.start_time));

        debug!("Found {} available slots", available_slots.len());
        Ok(available_slots)
    }

    /// Open slots per date over an inclusive range. Dates with nothing
    /// free are omitted.
    pub async fn get_available_slots_range(
        &self,
        tenant_id: Uuid,
        practitioner_id: Uuid,
        query: SlotRangeQuery,
    ) -> Result<BTreeMap<NaiveDate, Vec<Slot>>, SchedulingError> {
        debug!(
            "Calculating slot availability for practitioner {} from {} to {}",
            practitioner_id, query.from, query.to
        );

        let mut by_date = BTreeMap::new();
        let mut date = query.from;
        while date <= query.to {
            let slots = self
                .get_available_slots(
                    tenant_id,
                    practitioner_id,
                    SlotQuery {
                        date,
                        duration_minutes: query.duration_minutes,
                        location_id: query.location_id,
                    },
                )
                .await?;
            if !slots.is_empty() {
                by_date.insert(date, slots);
            }
            date = match date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        Ok(by_date)
    }

    async fn location_timezone(
        &self,
        tenant_id: Uuid,
        location_id: Uuid,
    ) -> Result<Option<Tz>, SchedulingError> {
        let configured = self
            .store
            .get_location_timezone(tenant_id, location_id)
            .await?;
        let name = if configured.is_empty() {
            debug!(
                "Location {} has no timezone configured, using default {}",
                location_id, self.default_timezone
            );
            self.default_timezone.clone()
        } else {
            configured
        };

        match name.parse() {
            Ok(tz) => Ok(Some(tz)),
            Err(_) => {
                warn!(
                    "Unrecognized timezone '{}' for location {}, returning no slots",
                    name, location_id
                );
                Ok(None)
            }
        }
    }
}

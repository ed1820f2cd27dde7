use chrono::NaiveDate;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::{overlaps, ConflictEntry, SchedulingError};
use shared_store::SchedulingStore;

use crate::models::ConflictCheckResult;

pub struct ConflictService {
    store: Arc<dyn SchedulingStore>,
}

impl ConflictService {
    pub fn new(store: Arc<dyn SchedulingStore>) -> Self {
        Self { store }
    }

    /// Check whether `[start_time, end_time)` collides with any active
    /// booking the practitioner already holds on `date`.
    ///
    /// Cancelled and no-show bookings never conflict. Pass the booking's
    /// own id in `exclude_booking` when rechecking a reschedule so it
    /// does not collide with itself.
    pub async fn check_conflicts(
        &self,
        tenant_id: Uuid,
        practitioner_id: Uuid,
        date: NaiveDate,
        start_time: &str,
        end_time: &str,
        exclude_booking: Option<Uuid>,
    ) -> Result<ConflictCheckResult, SchedulingError> {
        debug!(
            "Checking conflicts for practitioner {} on {} from {} to {}",
            practitioner_id, date, start_time, end_time
        );

        let bookings = self
            .store
            .get_active_bookings(tenant_id, practitioner_id, date)
            .await?;

        let conflicts: Vec<ConflictEntry> = bookings
            .iter()
            .filter(|booking| Some(booking.id) != exclude_booking)
            // The store should pre-filter, but active status is re-checked
            .filter(|booking| booking.status.is_active())
            .filter(|booking| {
                overlaps(
                    start_time,
                    end_time,
                    booking.start_time.as_str(),
                    booking.end_time.as_str(),
                )
            })
            .map(|booking| ConflictEntry {
                booking_id: booking.id,
                start_time: booking.start_time.clone(),
                end_time: booking.end_time.clone(),
                reason: format!(
                    "overlaps a {} session from {} to {}",
                    booking.status, booking.start_time, booking.end_time
                ),
            })
            .collect();

        if !conflicts.is_empty() {
            warn!(
                "Conflict for practitioner {} on {}: {} overlapping booking(s)",
                practitioner_id,
                date,
                conflicts.len()
            );
        }

        Ok(ConflictCheckResult {
            has_conflict: !conflicts.is_empty(),
            conflicts,
        })
    }

    /// Conflict-check the same time range across many dates at once.
    ///
    /// The per-date reads run concurrently so a long recurring series
    /// does not pay one round-trip per occurrence. Results come back in
    /// the order the dates were given.
    pub async fn check_conflicts_batch(
        &self,
        tenant_id: Uuid,
        practitioner_id: Uuid,
        dates: &[NaiveDate],
        start_time: &str,
        end_time: &str,
        exclude_booking: Option<Uuid>,
    ) -> Result<Vec<(NaiveDate, ConflictCheckResult)>, SchedulingError> {
        debug!(
            "Batch conflict check for practitioner {} across {} date(s)",
            practitioner_id,
            dates.len()
        );

        let checks = dates.iter().map(|date| {
            let date = *date;
            async move {
                let result = self
                    .check_conflicts(
                        tenant_id,
                        practitioner_id,
                        date,
                        start_time,
                        end_time,
                        exclude_booking,
                    )
                    .await;
                (date, result)
            }
        });

        join_all(checks)
            .await
            .into_iter()
            .map(|(date, result)| result.map(|check| (date, check)))
            .collect()
    }
}

use chrono::NaiveDate;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_models::{
    parse_time_of_day, Booking, BookingStatus, DateConflict, RecurrenceRule, SchedulingError,
};
use shared_store::{BookingChange, NewBooking, SchedulingStore};

use crate::models::{BookingRequest, FailedOccurrence, RecurringBookingOutcome};
use crate::services::conflict::ConflictService;
use crate::services::recurrence;

pub struct BookingService {
    store: Arc<dyn SchedulingStore>,
    conflicts: ConflictService,
}

impl BookingService {
    pub fn new(store: Arc<dyn SchedulingStore>) -> Self {
        let conflicts = ConflictService::new(Arc::clone(&store));
        Self { store, conflicts }
    }

    /// Book a single session. The conflict check is the gate before the
    /// write; the store serializes the two per practitioner and date.
    pub async fn create_booking(
        &self,
        tenant_id: Uuid,
        request: BookingRequest,
    ) -> Result<Booking, SchedulingError> {
        info!(
            "Booking session for client {} with practitioner {} on {}",
            request.client_id, request.practitioner_id, request.date
        );

        validate_times(&request.start_time, &request.end_time)?;

        let check = self
            .conflicts
            .check_conflicts(
                tenant_id,
                request.practitioner_id,
                request.date,
                &request.start_time,
                &request.end_time,
                None,
            )
            .await?;
        if check.has_conflict {
            return Err(SchedulingError::conflict_on(request.date, check.conflicts));
        }

        let booking = self
            .store
            .create_booking(tenant_id, self.new_booking(&request, request.date, None, None))
            .await?;

        info!("Session {} booked for {}", booking.id, booking.date);
        Ok(booking)
    }

    /// Book a recurring series: the parent on the series start date plus
    /// one child per generated occurrence, all at the same time of day.
    ///
    /// Every date is conflict-checked before anything is written, so a
    /// conflict anywhere aborts the whole series. A child write that
    /// fails after the gate is reported in the outcome instead of rolling
    /// back the rest; a storage hiccup on one occurrence should not
    /// discard an otherwise valid series.
    pub async fn create_recurring_booking(
        &self,
        tenant_id: Uuid,
        request: BookingRequest,
        rule: RecurrenceRule,
    ) -> Result<RecurringBookingOutcome, SchedulingError> {
        info!(
            "Booking recurring series for client {} with practitioner {} starting {}",
            request.client_id, request.practitioner_id, request.date
        );

        // **Step 1: Validate the request and the rule**
        validate_times(&request.start_time, &request.end_time)?;
        recurrence::validate_rule(&rule, request.date)?;

        // **Step 2: Expand the rule into occurrence dates**
        let occurrence_dates = recurrence::expand_occurrence_dates(&rule, request.date);

        // **Step 3: Conflict-check the start date and every occurrence**
        let mut all_dates = Vec::with_capacity(occurrence_dates.len() + 1);
        all_dates.push(request.date);
        all_dates.extend(occurrence_dates.iter().copied());

        let checks = self
            .conflicts
            .check_conflicts_batch(
                tenant_id,
                request.practitioner_id,
                &all_dates,
                &request.start_time,
                &request.end_time,
                None,
            )
            .await?;

        let conflicting: Vec<DateConflict> = checks
            .into_iter()
            .filter(|(_, check)| check.has_conflict)
            .map(|(date, check)| DateConflict {
                date,
                entries: check.conflicts,
            })
            .collect();
        if !conflicting.is_empty() {
            warn!(
                "Recurring series rejected: {} of {} date(s) conflict",
                conflicting.len(),
                all_dates.len()
            );
            return Err(SchedulingError::Conflict {
                conflicts: conflicting,
            });
        }

        // **Step 4: Create the parent booking**
        let parent = self
            .store
            .create_booking(
                tenant_id,
                self.new_booking(&request, request.date, Some(rule), None),
            )
            .await?;

        // **Step 5: Create the children**
        // The batch above already cleared every date, so children skip a
        // second conflict check.
        let creations = occurrence_dates.iter().map(|date| {
            let date = *date;
            let child = self.new_booking(&request, date, None, Some(parent.id));
            async move { (date, self.store.create_booking(tenant_id, child).await) }
        });

        let mut children = Vec::new();
        let mut failed_occurrences = Vec::new();
        for (date, result) in join_all(creations).await {
            match result {
                Ok(child) => children.push(child),
                Err(err) => {
                    warn!(
                        "Occurrence on {} failed to persist for series {}: {}",
                        date, parent.id, err
                    );
                    failed_occurrences.push(FailedOccurrence {
                        date,
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            "Recurring series {} created with {} of {} occurrence(s)",
            parent.id,
            children.len(),
            occurrence_dates.len()
        );

        Ok(RecurringBookingOutcome {
            parent,
            children,
            failed_occurrences,
        })
    }

    pub async fn get_booking(
        &self,
        tenant_id: Uuid,
        booking_id: Uuid,
    ) -> Result<Booking, SchedulingError> {
        self.store
            .get_booking(tenant_id, booking_id)
            .await?
            .ok_or_else(|| SchedulingError::NotFound(format!("booking {}", booking_id)))
    }

    /// Move a booking through its lifecycle. The target must be reachable
    /// from the current status; terminal bookings admit nothing.
    pub async fn update_booking_status(
        &self,
        tenant_id: Uuid,
        booking_id: Uuid,
        new_status: BookingStatus,
    ) -> Result<Booking, SchedulingError> {
        let booking = self.get_booking(tenant_id, booking_id).await?;

        if !booking.status.can_transition_to(&new_status) {
            warn!(
                "Rejected status transition {} to {} for booking {}",
                booking.status, new_status, booking_id
            );
            return Err(SchedulingError::InvalidTransition {
                from: booking.status,
                to: new_status,
            });
        }

        let updated = self
            .store
            .update_booking(
                tenant_id,
                booking_id,
                BookingChange {
                    status: Some(new_status),
                    ..Default::default()
                },
            )
            .await?;

        info!(
            "Booking {} moved from {} to {}",
            booking_id, booking.status, updated.status
        );
        Ok(updated)
    }

    /// Cancel one booking. A child of a recurring series cancels alone;
    /// its siblings and parent keep their dates.
    pub async fn cancel_booking(
        &self,
        tenant_id: Uuid,
        booking_id: Uuid,
    ) -> Result<Booking, SchedulingError> {
        debug!("Cancelling booking {}", booking_id);
        self.update_booking_status(tenant_id, booking_id, BookingStatus::Cancelled)
            .await
    }

    /// Move a booking to a new date or time. The booking's own interval
    /// is excluded from the conflict check so shifting within it is
    /// allowed.
    pub async fn reschedule_booking(
        &self,
        tenant_id: Uuid,
        booking_id: Uuid,
        new_date: NaiveDate,
        new_start: &str,
        new_end: &str,
    ) -> Result<Booking, SchedulingError> {
        debug!(
            "Rescheduling booking {} to {} {}-{}",
            booking_id, new_date, new_start, new_end
        );

        let booking = self.get_booking(tenant_id, booking_id).await?;
        if booking.status.is_terminal() {
            return Err(SchedulingError::Validation(format!(
                "cannot reschedule a {} booking",
                booking.status
            )));
        }

        validate_times(new_start, new_end)?;

        let check = self
            .conflicts
            .check_conflicts(
                tenant_id,
                booking.practitioner_id,
                new_date,
                new_start,
                new_end,
                Some(booking_id),
            )
            .await?;
        if check.has_conflict {
            return Err(SchedulingError::conflict_on(new_date, check.conflicts));
        }

        let updated = self
            .store
            .update_booking(
                tenant_id,
                booking_id,
                BookingChange {
                    date: Some(new_date),
                    start_time: Some(new_start.to_string()),
                    end_time: Some(new_end.to_string()),
                    status: None,
                },
            )
            .await?;

        info!(
            "Booking {} rescheduled to {} {}-{}",
            booking_id, new_date, new_start, new_end
        );
        Ok(updated)
    }

    fn new_booking(
        &self,
        request: &BookingRequest,
        date: NaiveDate,
        rule: Option<RecurrenceRule>,
        parent: Option<Uuid>,
    ) -> NewBooking {
        NewBooking {
            practitioner_id: request.practitioner_id,
            client_id: request.client_id,
            date,
            start_time: request.start_time.clone(),
            end_time: request.end_time.clone(),
            status: BookingStatus::Scheduled,
            is_recurring: rule.is_some(),
            recurrence_rule: rule,
            parent_booking_id: parent,
        }
    }
}

fn validate_times(start: &str, end: &str) -> Result<(), SchedulingError> {
    let start_parsed = parse_time_of_day(start)
        .ok_or_else(|| SchedulingError::Validation(format!("invalid start time '{}'", start)))?;
    let end_parsed = parse_time_of_day(end)
        .ok_or_else(|| SchedulingError::Validation(format!("invalid end time '{}'", end)))?;
    if start_parsed >= end_parsed {
        return Err(SchedulingError::Validation(format!(
            "booking {}-{} must start before it ends",
            start, end
        )));
    }
    Ok(())
}

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use availability_cell::models::{Slot, SlotQuery};
use availability_cell::services::slots::SlotService;
use shared_config::AppConfig;
use shared_models::{overlaps, SchedulingError, WaitlistEntry, WaitlistPriority, WaitlistStatus};
use shared_store::{NewWaitlistEntry, Notifier, SchedulingStore, WaitlistEntryChange};

use crate::models::{AddToWaitlistRequest, WaitlistMatch};

pub struct WaitlistService {
    store: Arc<dyn SchedulingStore>,
    notifier: Arc<dyn Notifier>,
    slots: SlotService,
    response_window_hours: u32,
}

impl WaitlistService {
    pub fn new(
        store: Arc<dyn SchedulingStore>,
        notifier: Arc<dyn Notifier>,
        config: &AppConfig,
    ) -> Self {
        let slots = SlotService::new(Arc::clone(&store), config);
        Self {
            store,
            notifier,
            slots,
            response_window_hours: config.waitlist_response_window_hours,
        }
    }

    pub async fn add_to_waitlist(
        &self,
        tenant_id: Uuid,
        request: AddToWaitlistRequest,
    ) -> Result<WaitlistEntry, SchedulingError> {
        info!(
            "Adding client {} to the waitlist for practitioner {} with {} priority",
            request.client_id, request.practitioner_id, request.priority
        );

        self.store
            .create_waitlist_entry(
                tenant_id,
                NewWaitlistEntry {
                    client_id: request.client_id,
                    practitioner_id: request.practitioner_id,
                    preferred_dates: request.preferred_dates,
                    preferred_times: request.preferred_times,
                    priority: request.priority,
                    status: WaitlistStatus::Waiting,
                },
            )
            .await
    }

    /// Offer freed time on a date to the next waiting client.
    ///
    /// Entries are considered urgent first and oldest first within a
    /// priority; the first whose preferences accept one of the open slots
    /// is marked notified. Nothing waiting, or nothing open, is a quiet
    /// no-op.
    pub async fn process_waitlist(
        &self,
        tenant_id: Uuid,
        practitioner_id: Uuid,
        date: NaiveDate,
        location_id: Uuid,
    ) -> Result<Option<WaitlistMatch>, SchedulingError> {
        debug!(
            "Processing waitlist for practitioner {} on {}",
            practitioner_id, date
        );

        let open_slots = self
            .slots
            .get_available_slots(
                tenant_id,
                practitioner_id,
                SlotQuery {
                    date,
                    duration_minutes: None,
                    location_id,
                },
            )
            .await?;
        if open_slots.is_empty() {
            debug!("No open slots on {}, leaving the waitlist untouched", date);
            return Ok(None);
        }

        let mut entries = self
            .store
            .get_waitlist_entries(tenant_id, practitioner_id, WaitlistStatus::Waiting)
            .await?;
        if entries.is_empty() {
            debug!("No waiting clients for practitioner {}", practitioner_id);
            return Ok(None);
        }
        // The store returns oldest first; the stable sort keeps that order
        // within each priority band.
        entries.sort_by_key(|entry| match entry.priority {
            WaitlistPriority::Urgent => 0,
            WaitlistPriority::Standard => 1,
        });

        for entry in entries {
            let matched = first_matching_slot(&entry, date, &open_slots).cloned();
            if let Some(slot) = matched {
                return self
                    .notify_entry(tenant_id, entry, date, slot)
                    .await
                    .map(Some);
            }
        }

        debug!("No waiting client matched the open slots on {}", date);
        Ok(None)
    }

    /// A notified client accepted the offered slot; the entry leaves the
    /// queue as scheduled.
    pub async fn confirm_entry(
        &self,
        tenant_id: Uuid,
        entry_id: Uuid,
    ) -> Result<WaitlistEntry, SchedulingError> {
        let entry = self
            .store
            .get_waitlist_entry(tenant_id, entry_id)
            .await?
            .ok_or_else(|| SchedulingError::NotFound(format!("waitlist entry {}", entry_id)))?;

        if entry.status.is_terminal() {
            return Err(SchedulingError::Validation(format!(
                "waitlist entry {} is already {}",
                entry_id, entry.status
            )));
        }
        if entry.status != WaitlistStatus::Notified {
            return Err(SchedulingError::Validation(format!(
                "waitlist entry {} is {} and cannot be confirmed",
                entry_id, entry.status
            )));
        }

        let confirmed = self
            .store
            .update_waitlist_entry(
                tenant_id,
                entry_id,
                WaitlistEntryChange {
                    status: Some(WaitlistStatus::Scheduled),
                    notified_at: None,
                },
            )
            .await?;

        info!("Waitlist entry {} confirmed and scheduled", entry_id);
        Ok(confirmed)
    }

    /// Expire notified entries whose response window has lapsed by `now`.
    /// Returns how many entries were expired.
    pub async fn expire_stale_entries(
        &self,
        tenant_id: Uuid,
        practitioner_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<usize, SchedulingError> {
        let window = Duration::hours(i64::from(self.response_window_hours));
        let notified = self
            .store
            .get_waitlist_entries(tenant_id, practitioner_id, WaitlistStatus::Notified)
            .await?;

        let mut expired = 0;
        for entry in notified {
            let stale = entry
                .notified_at
                .map(|at| at + window < now)
                .unwrap_or(false);
            if !stale {
                continue;
            }
            self.store
                .update_waitlist_entry(
                    tenant_id,
                    entry.id,
                    WaitlistEntryChange {
                        status: Some(WaitlistStatus::Expired),
                        notified_at: None,
                    },
                )
                .await?;
            expired += 1;
        }

        if expired > 0 {
            info!(
                "Expired {} stale waitlist entries for practitioner {}",
                expired, practitioner_id
            );
        }
        Ok(expired)
    }

    async fn notify_entry(
        &self,
        tenant_id: Uuid,
        entry: WaitlistEntry,
        date: NaiveDate,
        slot: Slot,
    ) -> Result<WaitlistMatch, SchedulingError> {
        let notified = self
            .store
            .update_waitlist_entry(
                tenant_id,
                entry.id,
                WaitlistEntryChange {
                    status: Some(WaitlistStatus::Notified),
                    notified_at: Some(Utc::now()),
                },
            )
            .await?;

        info!(
            "Notifying client {} about a freed {} slot on {}",
            notified.client_id, slot.start_time, date
        );

        let message = format!(
            "A session on {} from {} to {} has opened up with your practitioner. Reply to claim it.",
            date, slot.start_time, slot.end_time
        );
        let metadata = json!({
            "waitlist_entry_id": notified.id,
            "practitioner_id": notified.practitioner_id,
            "date": date,
            "start_time": slot.start_time,
            "end_time": slot.end_time,
        });
        // Delivery is fire-and-forget; a failed send never unwinds the
        // scheduling side.
        if let Err(err) = self
            .notifier
            .notify(notified.client_id, &message, metadata)
            .await
        {
            warn!(
                "Waitlist notification for entry {} failed: {}",
                notified.id, err
            );
        }

        Ok(WaitlistMatch {
            entry: notified,
            slot,
        })
    }
}

/// First open slot the entry's preferences accept. Missing preference
/// lists accept anything; a preferred time window matches a slot when the
/// two overlap.
fn first_matching_slot<'a>(
    entry: &WaitlistEntry,
    date: NaiveDate,
    slots: &'a [Slot],
) -> Option<&'a Slot> {
    if let Some(dates) = &entry.preferred_dates {
        if !dates.contains(&date) {
            return None;
        }
    }

    slots.iter().find(|slot| match &entry.preferred_times {
        Some(windows) => windows.iter().any(|window| {
            overlaps(
                window.start.as_str(),
                window.end.as_str(),
                slot.start_time.as_str(),
                slot.end_time.as_str(),
            )
        }),
        None => true,
    })
}

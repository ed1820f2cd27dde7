use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use shared_models::{
    overlaps, parse_time_of_day, OverrideKind, SchedulingError, TimeWindow, Weekday, WeeklyTemplate,
};
use shared_store::SchedulingStore;

use crate::models::EffectiveAvailability;

pub struct AvailabilityService {
    store: Arc<dyn SchedulingStore>,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn SchedulingStore>) -> Self {
        Self { store }
    }

    /// Resolve what a practitioner actually offers on a date: the weekly
    /// template for that weekday, reshaped by every override in force.
    ///
    /// Blocking overrides remove each window they overlap in full - a
    /// partially blocked window is withdrawn, never split. `available`
    /// overrides append their range as an extra window without merging.
    /// Overrides apply in creation order, so the latest one wins.
    pub async fn resolve_effective_availability(
        &self,
        tenant_id: Uuid,
        practitioner_id: Uuid,
        date: NaiveDate,
    ) -> Result<EffectiveAvailability, SchedulingError> {
        debug!(
            "Resolving effective availability for practitioner {} on {}",
            practitioner_id, date
        );

        let template = self
            .store
            .get_weekly_template(tenant_id, practitioner_id)
            .await?;
        let weekday = Weekday::from_date(date);
        let mut windows: Vec<TimeWindow> = template.windows_for(weekday).to_vec();

        let overrides = self
            .store
            .get_overrides(tenant_id, practitioner_id, date, date)
            .await?;

        for entry in &overrides {
            if !entry.applies_on(date) {
                continue;
            }

            match entry.kind {
                OverrideKind::Unavailable | OverrideKind::Blocked => {
                    match (entry.time_start.as_deref(), entry.time_end.as_deref()) {
                        (Some(block_start), Some(block_end)) => {
                            windows.retain(|w| {
                                !overlaps(w.start.as_str(), w.end.as_str(), block_start, block_end)
                            });
                        }
                        // No time range blocks the whole day
                        _ => windows.clear(),
                    }
                }
                OverrideKind::Available => {
                    if let (Some(start), Some(end)) =
                        (entry.time_start.as_deref(), entry.time_end.as_deref())
                    {
                        windows.push(TimeWindow::new(start, end));
                    } else {
                        debug!(
                            "Ignoring available override {} without a time range",
                            entry.id
                        );
                    }
                }
            }
        }

        debug!(
            "Practitioner {} has {} effective window(s) on {}",
            practitioner_id,
            windows.len(),
            date
        );

        Ok(EffectiveAvailability {
            is_available: !windows.is_empty(),
            time_windows: windows,
        })
    }

    /// Validate a weekly template before it is persisted: every window
    /// must parse, run forward, and not overlap another window on the
    /// same weekday.
    pub fn validate_template(&self, template: &WeeklyTemplate) -> Result<(), SchedulingError> {
        for (day, windows) in &template.days {
            for window in windows {
                let start = parse_time_of_day(&window.start).ok_or_else(|| {
                    SchedulingError::Validation(format!(
                        "invalid start time '{}' in {} window",
                        window.start, day
                    ))
                })?;
                let end = parse_time_of_day(&window.end).ok_or_else(|| {
                    SchedulingError::Validation(format!(
                        "invalid end time '{}' in {} window",
                        window.end, day
                    ))
                })?;
                if start >= end {
                    return Err(SchedulingError::Validation(format!(
                        "window {}-{} on {} must start before it ends",
                        window.start, window.end, day
                    )));
                }
            }

            for (i, first) in windows.iter().enumerate() {
                for second in windows.iter().skip(i + 1) {
                    if overlaps(
                        first.start.as_str(),
                        first.end.as_str(),
                        second.start.as_str(),
                        second.end.as_str(),
                    ) {
                        return Err(SchedulingError::Validation(format!(
                            "windows {}-{} and {}-{} overlap on {}",
                            first.start, first.end, second.start, second.end, day
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

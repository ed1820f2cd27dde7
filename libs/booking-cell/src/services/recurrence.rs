use chrono::{Days, Months, NaiveDate};
use tracing::warn;

use shared_models::{RecurrenceFrequency, RecurrenceRule, SchedulingError, Weekday};

/// Reject rules that cannot describe a meaningful series.
pub fn validate_rule(rule: &RecurrenceRule, series_start: NaiveDate) -> Result<(), SchedulingError> {
    if rule.interval == 0 {
        return Err(SchedulingError::Validation(
            "recurrence interval must be at least 1".to_string(),
        ));
    }
    if rule.end_date <= series_start {
        return Err(SchedulingError::Validation(format!(
            "recurrence end date {} must be after the series start {}",
            rule.end_date, series_start
        )));
    }
    if rule.days_of_week.is_some()
        && matches!(
            rule.frequency,
            RecurrenceFrequency::Daily | RecurrenceFrequency::Monthly
        )
    {
        return Err(SchedulingError::Validation(format!(
            "weekday lists only apply to weekly and biweekly rules, not {:?}",
            rule.frequency
        )));
    }
    Ok(())
}

/// Expand a rule into every occurrence date after `series_start`, in
/// order, up to and including the rule's end date.
///
/// The start date itself is never emitted; the parent booking owns it.
pub fn expand_occurrence_dates(rule: &RecurrenceRule, series_start: NaiveDate) -> Vec<NaiveDate> {
    if rule.interval == 0 {
        warn!("Recurrence rule with a zero interval expands to no dates");
        return Vec::new();
    }

    match rule.frequency {
        RecurrenceFrequency::Daily => expand_daily(rule, series_start),
        RecurrenceFrequency::Weekly | RecurrenceFrequency::Biweekly => {
            expand_weekly(rule, series_start)
        }
        RecurrenceFrequency::Monthly => expand_monthly(rule, series_start),
    }
}

fn expand_daily(rule: &RecurrenceRule, series_start: NaiveDate) -> Vec<NaiveDate> {
    let step = Days::new(u64::from(rule.interval));
    let mut dates = Vec::new();
    let mut current = series_start;
    while let Some(next) = current.checked_add_days(step) {
        if next > rule.end_date {
            break;
        }
        dates.push(next);
        current = next;
    }
    dates
}

fn expand_weekly(rule: &RecurrenceRule, series_start: NaiveDate) -> Vec<NaiveDate> {
    let week_interval = i64::from(match rule.frequency {
        RecurrenceFrequency::Biweekly => rule.interval.saturating_mul(2),
        _ => rule.interval,
    });
    // Without an explicit weekday list the series repeats on the start
    // date's own weekday.
    let target_days = match &rule.days_of_week {
        Some(days) if !days.is_empty() => days.clone(),
        _ => vec![Weekday::from_date(series_start)],
    };

    let mut dates = Vec::new();
    let mut current = series_start;
    while let Some(next) = current.succ_opt() {
        if next > rule.end_date {
            break;
        }
        current = next;
        let whole_weeks = (current - series_start).num_days() / 7;
        if whole_weeks % week_interval == 0 && target_days.contains(&Weekday::from_date(current)) {
            dates.push(current);
        }
    }
    dates
}

fn expand_monthly(rule: &RecurrenceRule, series_start: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut months_ahead = rule.interval;
    // Always advance from the original start so a day-of-month clamped in
    // a short month (Jan 31 into Feb) is restored in longer ones.
    while let Some(next) = series_start.checked_add_months(Months::new(months_ahead)) {
        if next > rule.end_date {
            break;
        }
        dates.push(next);
        months_ahead = match months_ahead.checked_add(rule.interval) {
            Some(advanced) => advanced,
            None => break,
        };
    }
    dates
}

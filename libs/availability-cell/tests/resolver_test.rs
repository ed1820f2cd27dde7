// libs/availability-cell/tests/resolver_test.rs

mod support;

use assert_matches::assert_matches;

use availability_cell::services::resolver::AvailabilityService;
use shared_models::{
    OverrideKind, OverrideRecurrence, SchedulingError, TimeWindow, Weekday, WeeklyTemplate,
};
use support::{date, day_override, TestSetup};

fn weekday_template() -> WeeklyTemplate {
    WeeklyTemplate::default()
        .with_day(Weekday::Monday, vec![TimeWindow::new("09:00", "12:00")])
        .with_day(
            Weekday::Wednesday,
            vec![
                TimeWindow::new("09:00", "12:00"),
                TimeWindow::new("13:00", "17:00"),
            ],
        )
}

// 2026-01-05 is a Monday, 2026-01-07 a Wednesday.

// ==============================================================================
// TEMPLATE RESOLUTION
// ==============================================================================

#[tokio::test]
async fn template_windows_surface_on_the_matching_weekday() {
    let setup = TestSetup::new().await;
    setup.install_template(weekday_template()).await;
    let service = AvailabilityService::new(setup.store.clone());

    let monday = service
        .resolve_effective_availability(setup.tenant_id, setup.practitioner_id, date(2026, 1, 5))
        .await
        .unwrap();

    assert!(monday.is_available);
    assert_eq!(monday.time_windows, vec![TimeWindow::new("09:00", "12:00")]);
}

#[tokio::test]
async fn day_without_template_windows_is_unavailable() {
    let setup = TestSetup::new().await;
    setup.install_template(weekday_template()).await;
    let service = AvailabilityService::new(setup.store.clone());

    // Friday has no template entry
    let friday = service
        .resolve_effective_availability(setup.tenant_id, setup.practitioner_id, date(2026, 1, 9))
        .await
        .unwrap();

    assert!(!friday.is_available);
    assert!(friday.time_windows.is_empty());
}

// ==============================================================================
// OVERRIDE APPLICATION
// ==============================================================================

#[tokio::test]
async fn all_day_override_clears_every_window() {
    let setup = TestSetup::new().await;
    setup.install_template(weekday_template()).await;
    setup
        .add_override(day_override(
            OverrideKind::Unavailable,
            date(2026, 1, 7),
            date(2026, 1, 7),
            None,
        ))
        .await;
    let service = AvailabilityService::new(setup.store.clone());

    let wednesday = service
        .resolve_effective_availability(setup.tenant_id, setup.practitioner_id, date(2026, 1, 7))
        .await
        .unwrap();

    assert!(!wednesday.is_available);
}

#[tokio::test]
async fn partial_overlap_removes_the_whole_window() {
    let setup = TestSetup::new().await;
    setup.install_template(weekday_template()).await;
    // Blocks 11:00-13:30: overlaps both Wednesday windows partially
    setup
        .add_override(day_override(
            OverrideKind::Blocked,
            date(2026, 1, 7),
            date(2026, 1, 7),
            Some(("11:00", "13:30")),
        ))
        .await;
    let service = AvailabilityService::new(setup.store.clone());

    let wednesday = service
        .resolve_effective_availability(setup.tenant_id, setup.practitioner_id, date(2026, 1, 7))
        .await
        .unwrap();

    // Neither window survives; partially blocked windows are withdrawn, not split
    assert!(!wednesday.is_available);
    assert!(wednesday.time_windows.is_empty());
}

#[tokio::test]
async fn block_outside_the_window_leaves_it_alone() {
    let setup = TestSetup::new().await;
    setup.install_template(weekday_template()).await;
    setup
        .add_override(day_override(
            OverrideKind::Blocked,
            date(2026, 1, 5),
            date(2026, 1, 5),
            Some(("12:00", "13:00")),
        ))
        .await;
    let service = AvailabilityService::new(setup.store.clone());

    let monday = service
        .resolve_effective_availability(setup.tenant_id, setup.practitioner_id, date(2026, 1, 5))
        .await
        .unwrap();

    // The block touches the window boundary only; half-open ranges do not overlap
    assert_eq!(monday.time_windows, vec![TimeWindow::new("09:00", "12:00")]);
}

#[tokio::test]
async fn zero_length_block_removes_nothing() {
    let setup = TestSetup::new().await;
    setup.install_template(weekday_template()).await;
    setup
        .add_override(day_override(
            OverrideKind::Blocked,
            date(2026, 1, 5),
            date(2026, 1, 5),
            Some(("10:00", "10:00")),
        ))
        .await;
    let service = AvailabilityService::new(setup.store.clone());

    let monday = service
        .resolve_effective_availability(setup.tenant_id, setup.practitioner_id, date(2026, 1, 5))
        .await
        .unwrap();

    // An empty range blocks no time, even in the middle of a window
    assert_eq!(monday.time_windows, vec![TimeWindow::new("09:00", "12:00")]);
}

#[tokio::test]
async fn available_override_appends_without_merging() {
    let setup = TestSetup::new().await;
    setup.install_template(weekday_template()).await;
    setup
        .add_override(day_override(
            OverrideKind::Available,
            date(2026, 1, 5),
            date(2026, 1, 5),
            Some(("11:00", "14:00")),
        ))
        .await;
    let service = AvailabilityService::new(setup.store.clone());

    let monday = service
        .resolve_effective_availability(setup.tenant_id, setup.practitioner_id, date(2026, 1, 5))
        .await
        .unwrap();

    assert_eq!(
        monday.time_windows,
        vec![
            TimeWindow::new("09:00", "12:00"),
            TimeWindow::new("11:00", "14:00"),
        ]
    );
}

#[tokio::test]
async fn later_created_override_wins() {
    let setup = TestSetup::new().await;
    setup.install_template(weekday_template()).await;
    setup
        .add_override(day_override(
            OverrideKind::Available,
            date(2026, 1, 5),
            date(2026, 1, 5),
            Some(("13:00", "15:00")),
        ))
        .await;
    // Created afterwards, so it applies last and removes the extra window
    setup
        .add_override(day_override(
            OverrideKind::Blocked,
            date(2026, 1, 5),
            date(2026, 1, 5),
            Some(("13:00", "14:00")),
        ))
        .await;
    let service = AvailabilityService::new(setup.store.clone());

    let monday = service
        .resolve_effective_availability(setup.tenant_id, setup.practitioner_id, date(2026, 1, 5))
        .await
        .unwrap();

    assert_eq!(monday.time_windows, vec![TimeWindow::new("09:00", "12:00")]);
}

#[tokio::test]
async fn recurring_override_applies_only_on_listed_weekdays() {
    let setup = TestSetup::new().await;
    setup.install_template(weekday_template()).await;
    let mut vacation = day_override(
        OverrideKind::Unavailable,
        date(2026, 1, 1),
        date(2026, 1, 31),
        None,
    );
    vacation.recurrence = OverrideRecurrence::Weekly;
    vacation.recurring_weekdays = Some(vec![Weekday::Wednesday]);
    setup.add_override(vacation).await;
    let service = AvailabilityService::new(setup.store.clone());

    let monday = service
        .resolve_effective_availability(setup.tenant_id, setup.practitioner_id, date(2026, 1, 5))
        .await
        .unwrap();
    let wednesday = service
        .resolve_effective_availability(setup.tenant_id, setup.practitioner_id, date(2026, 1, 7))
        .await
        .unwrap();

    assert!(monday.is_available);
    assert!(!wednesday.is_available);
}

#[tokio::test]
async fn multi_day_override_covers_every_date_in_range() {
    let setup = TestSetup::new().await;
    setup.install_template(weekday_template()).await;
    // A week of vacation spanning both template days
    setup
        .add_override(day_override(
            OverrideKind::Unavailable,
            date(2026, 1, 5),
            date(2026, 1, 9),
            None,
        ))
        .await;
    let service = AvailabilityService::new(setup.store.clone());

    for day in [date(2026, 1, 5), date(2026, 1, 7)] {
        let resolved = service
            .resolve_effective_availability(setup.tenant_id, setup.practitioner_id, day)
            .await
            .unwrap();
        assert!(!resolved.is_available, "expected {} to be blocked", day);
    }

    // The Monday after the range reverts to the template
    let next_monday = service
        .resolve_effective_availability(setup.tenant_id, setup.practitioner_id, date(2026, 1, 12))
        .await
        .unwrap();
    assert!(next_monday.is_available);
}

// ==============================================================================
// TEMPLATE VALIDATION
// ==============================================================================

#[tokio::test]
async fn validate_template_accepts_well_formed_windows() {
    let setup = TestSetup::new().await;
    let service = AvailabilityService::new(setup.store.clone());

    assert!(service.validate_template(&weekday_template()).is_ok());
}

#[tokio::test]
async fn validate_template_rejects_reversed_windows() {
    let setup = TestSetup::new().await;
    let service = AvailabilityService::new(setup.store.clone());
    let template = WeeklyTemplate::default()
        .with_day(Weekday::Monday, vec![TimeWindow::new("17:00", "09:00")]);

    assert_matches!(
        service.validate_template(&template),
        Err(SchedulingError::Validation(_))
    );
}

#[tokio::test]
async fn validate_template_rejects_overlapping_windows() {
    let setup = TestSetup::new().await;
    let service = AvailabilityService::new(setup.store.clone());
    let template = WeeklyTemplate::default().with_day(
        Weekday::Monday,
        vec![
            TimeWindow::new("09:00", "12:00"),
            TimeWindow::new("11:00", "14:00"),
        ],
    );

    assert_matches!(
        service.validate_template(&template),
        Err(SchedulingError::Validation(_))
    );
}

#[tokio::test]
async fn validate_template_rejects_unparseable_times() {
    let setup = TestSetup::new().await;
    let service = AvailabilityService::new(setup.store.clone());
    let template = WeeklyTemplate::default()
        .with_day(Weekday::Monday, vec![TimeWindow::new("9am", "5pm")]);

    assert_matches!(
        service.validate_template(&template),
        Err(SchedulingError::Validation(_))
    );
}

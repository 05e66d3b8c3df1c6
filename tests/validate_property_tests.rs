// Property-based tests for the scale job group validation pipeline

use chrono::{Duration, TimeZone, Utc};
use cronhpa_validator::errors::ValidationError;
use cronhpa_validator::models::{OccupancyBounds, ReplicaBounds, ScaleJobGroup};
use cronhpa_validator::validate::validate_scale_job_groups;
use proptest::prelude::*;

fn group(name: &str, up: &str, down: &str) -> ScaleJobGroup {
    ScaleJobGroup {
        name: name.to_string(),
        target_size: 2,
        up_schedule: up.to_string(),
        down_schedule: down.to_string(),
        run_once: false,
    }
}

fn validate(groups: &[ScaleJobGroup]) -> Result<(), ValidationError> {
    validate_scale_job_groups(
        groups,
        ReplicaBounds { min: 1, max: 5 },
        OccupancyBounds::new(Duration::minutes(30), Duration::hours(24)),
        &[],
        Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap(),
    )
}

/// *For any* two everyday groups whose daily windows are strictly
/// ordered and separated, the configuration is accepted.
#[test]
fn property_ordered_disjoint_everyday_accepted() {
    proptest!(|(hours in (0u32..24, 0u32..24, 0u32..24, 0u32..24))| {
        let mut sorted = [hours.0, hours.1, hours.2, hours.3];
        sorted.sort_unstable();
        let [h1, h2, h3, h4] = sorted;
        prop_assume!(h1 < h2 && h2 < h3 && h3 < h4);

        let groups = [
            group("oper-1", &format!("0 {h1} * * *"), &format!("0 {h2} * * *")),
            group("oper-2", &format!("0 {h3} * * *"), &format!("0 {h4} * * *")),
        ];
        prop_assert!(validate(&groups).is_ok());
    });
}

/// *For any* two everyday groups whose daily windows interleave
/// (`h1 < h3 < h2 < h4`), the configuration is rejected as overlapping.
#[test]
fn property_interleaved_everyday_rejected() {
    proptest!(|(hours in (0u32..24, 0u32..24, 0u32..24, 0u32..24))| {
        let mut sorted = [hours.0, hours.1, hours.2, hours.3];
        sorted.sort_unstable();
        let [h1, h3, h2, h4] = sorted;
        prop_assume!(h1 < h3 && h3 < h2 && h2 < h4);

        let groups = [
            group("oper-1", &format!("0 {h1} * * *"), &format!("0 {h2} * * *")),
            group("oper-2", &format!("0 {h3} * * *"), &format!("0 {h4} * * *")),
        ];
        prop_assert!(matches!(
            validate(&groups),
            Err(ValidationError::OverlappingSchedules)
        ));
    });
}

/// *For any* group name, a set containing that name twice is rejected
/// before any schedule is evaluated.
#[test]
fn property_duplicate_names_always_rejected() {
    proptest!(|(name in "[a-z][a-z0-9-]{0,20}")| {
        let groups = [
            group(&name, "0 1 * * *", "0 3 * * *"),
            group(&name, "0 4 * * *", "0 6 * * *"),
        ];
        prop_assert!(matches!(
            validate(&groups),
            Err(ValidationError::DuplicateGroupName(_))
        ));
    });
}

/// *For any* target size outside the replica window, the group is
/// rejected whatever its schedules look like.
#[test]
fn property_target_size_bounds_enforced() {
    proptest!(|(target in -10i32..20)| {
        prop_assume!(!(1..=5).contains(&target));
        let mut g = group("oper-1", "0 1 * * *", "0 3 * * *");
        g.target_size = target;
        prop_assert!(
            matches!(validate(&[g]), Err(ValidationError::TargetSizeOutOfRange { .. })),
            "expected TargetSizeOutOfRange"
        );
    });
}

/// *For any* everyday window narrower than 30 minutes, the group is
/// rejected for its occupancy, not for overlap.
#[test]
fn property_narrow_everyday_window_rejected() {
    proptest!(|(hour in 0u32..23, width in 1u32..30)| {
        let groups = [group(
            "oper-1",
            &format!("0 {hour} * * *"),
            &format!("{width} {hour} * * *"),
        )];
        prop_assert!(
            matches!(validate(&groups), Err(ValidationError::ScheduleIntervalInvalid { .. })),
            "expected ScheduleIntervalInvalid"
        );
    });
}

// Scale job group validation pipeline
//
// Runs every check a set of cron scale job groups must pass before it is
// applied: duplicate names, replica bounds, shape classification, and the
// per-shape cross checks that feed representative windows into the
// overlap detector. All checks are pure; the caller supplies the anchor
// instant the windows are resolved against.

use crate::errors::ValidationError;
use crate::models::{NamedInterval, OccupancyBounds, ReplicaBounds, ScaleJobGroup, ScheduleShape};
use crate::overlap::has_overlap;
use crate::schedule::next_occurrence;
use crate::shape::classify_shape;
use chrono::{DateTime, Datelike, Duration, Utc};
use std::collections::HashSet;
use tracing::debug;

/// Cap on materialized occurrences per exclude-date expression and on
/// active days per group when intersecting month-restricted schedules
const MAX_RESOLVED_DATES: usize = 100;

/// Groups partitioned by recurrence shape
#[derive(Debug, Default)]
struct GroupedSchedules<'a> {
    everyday: Vec<&'a ScaleJobGroup>,
    certain_month: Vec<&'a ScaleJobGroup>,
    certain_week: Vec<&'a ScaleJobGroup>,
    once_day: Vec<&'a ScaleJobGroup>,
}

/// A day on which a month-restricted group is active: from one firing of
/// its up schedule to the next
#[derive(Debug, Clone, Copy)]
struct ActiveDay {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Validate a whole set of scale job groups for one workload.
///
/// `occupancy` bounds the active-window width of month-restricted
/// groups; everyday groups are always held to 30 minutes-24 hours, and
/// weekly/one-shot windows to at most 7 days. `exclude_dates` are
/// cron-shaped date expressions naming days on which month-group
/// conflicts are tolerated.
pub fn validate_scale_job_groups(
    groups: &[ScaleJobGroup],
    replicas: ReplicaBounds,
    occupancy: OccupancyBounds,
    exclude_dates: &[String],
    anchor: DateTime<Utc>,
) -> Result<(), ValidationError> {
    debug!(groups = groups.len(), %anchor, "validating cron scale job groups");

    check_duplicate_names(groups)?;
    let grouped = partition_by_shape(groups, replicas)?;

    check_everyday_jobs(&grouped.everyday, anchor)?;
    check_certain_month_jobs(
        &grouped.certain_month,
        &grouped.everyday,
        occupancy,
        exclude_dates,
        anchor,
    )?;
    check_certain_week_jobs(
        &grouped.certain_week,
        &grouped.certain_month,
        &grouped.everyday,
        anchor,
    )?;
    check_once_day_jobs(&grouped, anchor)?;

    Ok(())
}

/// Materialize every `[up, down)` occurrence of each group inside
/// `[anchor, deadline)` as a named interval
pub fn build_named_intervals<'a, I>(
    groups: I,
    anchor: DateTime<Utc>,
    deadline: DateTime<Utc>,
) -> Result<Vec<NamedInterval>, ValidationError>
where
    I: IntoIterator<Item = &'a ScaleJobGroup>,
{
    let mut intervals = Vec::new();
    for group in groups {
        let mut cursor = anchor;
        while cursor < deadline {
            let start = next_occurrence(&group.up_schedule, cursor)?;
            let end = next_occurrence(&group.down_schedule, start)?;
            intervals.push(NamedInterval {
                name: group.name.clone(),
                start,
                end,
            });
            cursor = end;
        }
    }
    Ok(intervals)
}

fn check_duplicate_names(groups: &[ScaleJobGroup]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for group in groups {
        if !seen.insert(group.name.as_str()) {
            return Err(ValidationError::DuplicateGroupName(group.name.clone()));
        }
    }
    Ok(())
}

fn partition_by_shape(
    groups: &[ScaleJobGroup],
    replicas: ReplicaBounds,
) -> Result<GroupedSchedules<'_>, ValidationError> {
    let mut grouped = GroupedSchedules::default();
    for group in groups {
        if group.target_size < replicas.min || group.target_size > replicas.max {
            return Err(ValidationError::TargetSizeOutOfRange {
                group: group.name.clone(),
                target: group.target_size,
                min: replicas.min,
                max: replicas.max,
            });
        }
        match classify_shape(group) {
            ScheduleShape::Unsupported => {
                return Err(ValidationError::UnsupportedSchedule(group.name.clone()))
            }
            ScheduleShape::Everyday => grouped.everyday.push(group),
            ScheduleShape::EveryDayInCertainMonth => grouped.certain_month.push(group),
            ScheduleShape::CertainWeek => grouped.certain_week.push(group),
            ScheduleShape::OnceDay => grouped.once_day.push(group),
        }
    }
    Ok(grouped)
}

/// Resolve each group's representative window from `start`, enforce the
/// occupancy bounds, then sweep all occurrences inside the period for
/// interleavings
fn check_jobs_in_period(
    groups: &[&ScaleJobGroup],
    start: DateTime<Utc>,
    period: Duration,
    occupancy: OccupancyBounds,
) -> Result<(), ValidationError> {
    if groups.is_empty() {
        return Ok(());
    }

    for group in groups {
        let up = next_occurrence(&group.up_schedule, start)?;
        let down = next_occurrence(&group.down_schedule, up)?;
        if !occupancy.contains(down - up) {
            return Err(ValidationError::ScheduleIntervalInvalid {
                group: group.name.clone(),
                min_minutes: occupancy.min.num_minutes(),
                max_minutes: occupancy.max.num_minutes(),
            });
        }
    }

    let intervals = build_named_intervals(groups.iter().copied(), start, start + period)?;
    if has_overlap(&intervals) {
        debug!(groups = groups.len(), %start, "overlapping windows in period");
        return Err(ValidationError::OverlappingSchedules);
    }
    Ok(())
}

/// Everyday groups share every day, so one representative 24 h window
/// suffices; occupancy is fixed at 30 minutes-24 hours
fn check_everyday_jobs(
    everyday: &[&ScaleJobGroup],
    anchor: DateTime<Utc>,
) -> Result<(), ValidationError> {
    check_jobs_in_period(
        everyday,
        anchor,
        Duration::hours(24),
        OccupancyBounds::new(Duration::minutes(30), Duration::hours(24)),
    )
}

fn check_certain_month_jobs(
    certain_month: &[&ScaleJobGroup],
    everyday: &[&ScaleJobGroup],
    occupancy: OccupancyBounds,
    exclude_dates: &[String],
    anchor: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if certain_month.is_empty() {
        return Ok(());
    }
    let period = Duration::hours(24);

    let mut skip_dates = Vec::new();
    for expression in exclude_dates {
        let mut cursor = anchor;
        for _ in 0..MAX_RESOLVED_DATES {
            let date = next_occurrence(expression, cursor)?;
            skip_dates.push(date);
            cursor = date;
        }
    }

    // Each month group against every everyday group, on a day the month
    // group is active
    for group in certain_month {
        let start = next_occurrence(&group.up_schedule, anchor)?;
        let mut local = everyday.to_vec();
        local.push(*group);
        check_jobs_in_period(&local, start - Duration::hours(1), period, occupancy)?;
    }

    // Month groups pairwise, but only on days both are active and that
    // are not excluded
    for i in 0..certain_month.len().saturating_sub(1) {
        check_jobs_in_period(&certain_month[i..=i], anchor, period, occupancy)?;
        for j in (i + 1)..certain_month.len() {
            let shared = shared_active_days(anchor, certain_month[i], certain_month[j])?;
            for day in shared {
                let excluded = skip_dates.iter().any(|d| {
                    d.year() == day.start.year()
                        && d.month() == day.start.month()
                        && d.day() == day.start.day()
                });
                if !excluded {
                    check_jobs_in_period(
                        &[certain_month[i], certain_month[j]],
                        day.start - Duration::hours(1),
                        period,
                        occupancy,
                    )?;
                    break;
                }
            }
        }
    }

    Ok(())
}

fn check_certain_week_jobs(
    certain_week: &[&ScaleJobGroup],
    certain_month: &[&ScaleJobGroup],
    everyday: &[&ScaleJobGroup],
    anchor: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if certain_week.is_empty() {
        return Ok(());
    }
    let weekly = OccupancyBounds::new(Duration::zero(), Duration::days(7));

    // Against everyday groups, over the weekly group's own window
    if !everyday.is_empty() {
        for group in certain_week {
            let up = next_occurrence(&group.up_schedule, anchor)?;
            let down = next_occurrence(&group.down_schedule, up)?;
            let mut local = everyday.to_vec();
            local.push(*group);
            check_jobs_in_period(&local, up - Duration::hours(1), down - up, weekly)?;
        }
    }

    // Against month groups, anchored to when the month group is active
    for month_group in certain_month {
        let active = next_occurrence(&month_group.up_schedule, anchor)? - Duration::hours(1);
        for group in certain_week {
            let up = next_occurrence(&group.up_schedule, active)?;
            let down = next_occurrence(&group.down_schedule, up)?;
            check_jobs_in_period(
                &[*month_group, *group],
                up - Duration::hours(1),
                down - up,
                weekly,
            )?;
        }
    }

    // Amongst themselves over a full week
    check_jobs_in_period(certain_week, anchor, Duration::days(7), weekly)
}

fn check_once_day_jobs(
    grouped: &GroupedSchedules<'_>,
    anchor: DateTime<Utc>,
) -> Result<(), ValidationError> {
    let bounds = OccupancyBounds::new(Duration::zero(), Duration::days(7));

    // Each one-shot window against every recurring group
    for group in &grouped.once_day {
        let up = next_occurrence(&group.up_schedule, anchor)?;
        let down = next_occurrence(&group.down_schedule, up)?;
        if down - up > Duration::days(7) {
            return Err(ValidationError::OnceJobTooLong(group.name.clone()));
        }
        let mut local = vec![*group];
        local.extend_from_slice(&grouped.everyday);
        local.extend_from_slice(&grouped.certain_month);
        local.extend_from_slice(&grouped.certain_week);
        check_jobs_in_period(&local, up - Duration::hours(1), down - up, bounds)?;
    }

    // Amongst themselves over a year
    check_jobs_in_period(&grouped.once_day, anchor, Duration::days(365), bounds)
}

/// Days on which both month-restricted groups fire, as merged windows.
/// Each group's active days are sampled from `anchor` out to roughly a
/// year ahead; days are matched on calendar date.
fn shared_active_days(
    anchor: DateTime<Utc>,
    first: &ScaleJobGroup,
    second: &ScaleJobGroup,
) -> Result<Vec<ActiveDay>, ValidationError> {
    let mut first_days = active_days(anchor, first)?;
    let mut second_days = active_days(anchor, second)?;
    if first_days.len() > second_days.len() {
        std::mem::swap(&mut first_days, &mut second_days);
    }

    let mut shared = Vec::new();
    for fst in &first_days {
        for snd in &second_days {
            if fst.start.year() == snd.start.year()
                && fst.start.month() == snd.start.month()
                && fst.start.day() == snd.start.day()
            {
                let mut day = *fst;
                if day.start > snd.start {
                    day.start = snd.start - Duration::hours(1);
                }
                if day.end < snd.end {
                    day.end = snd.end;
                }
                shared.push(day);
            }
        }
    }
    Ok(shared)
}

fn active_days(
    anchor: DateTime<Utc>,
    group: &ScaleJobGroup,
) -> Result<Vec<ActiveDay>, ValidationError> {
    let deadline = anchor + Duration::days(360);
    let mut days = Vec::new();
    let mut cursor = anchor;
    while cursor < deadline && days.len() < MAX_RESOLVED_DATES {
        let start = next_occurrence(&group.up_schedule, cursor)?;
        let end = next_occurrence(&group.up_schedule, start)?;
        days.push(ActiveDay { start, end });
        cursor = cursor + Duration::hours(23);
        if cursor < end {
            cursor = end;
        }
    }
    Ok(days)
}

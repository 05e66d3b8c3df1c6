use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// ScaleJobGroup represents one named scale-up/scale-down cron pair.
///
/// `up_schedule` and `down_schedule` are 5-field cron expressions
/// (minute hour day-of-month month day-of-week). Together they describe
/// one recurring `[up, down)` window during which the workload runs at
/// `target_size` replicas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleJobGroup {
    pub name: String,
    pub target_size: i32,
    pub up_schedule: String,
    pub down_schedule: String,
    /// One-shot pair: fires once instead of recurring
    #[serde(default)]
    pub run_once: bool,
}

/// Replica window the autoscaler operates in; every group's target size
/// must fall inside it
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReplicaBounds {
    pub min: i32,
    pub max: i32,
}

/// Allowed width of a group's active window
#[derive(Debug, Clone, Copy)]
pub struct OccupancyBounds {
    pub min: Duration,
    pub max: Duration,
}

impl OccupancyBounds {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub(crate) fn contains(&self, width: Duration) -> bool {
        width >= self.min && width <= self.max
    }
}

/// NamedInterval is one resolved occurrence of a group's active window,
/// anchored to concrete instants. `name` identifies the owning group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedInterval {
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// ScheduleShape is the closed set of recurrence shapes the overlap
/// checks can reason about. Derived from a group on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleShape {
    /// Anything outside the four supported patterns; hard rejection
    Unsupported,
    /// `m h * * *` — fires every day
    Everyday,
    /// `m h * <months> *` — fires every day of certain months
    EveryDayInCertainMonth,
    /// `m h * * <weekday>` — fires at most once per week
    CertainWeek,
    /// `m h <day> <month> *` with `run_once` — a one-shot window
    OnceDay,
}

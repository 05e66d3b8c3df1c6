// Validation core for cron-driven autoscaling windows

pub mod errors;
pub mod models;
pub mod overlap;
pub mod schedule;
pub mod shape;
pub mod validate;

pub use errors::ValidationError;
pub use models::{NamedInterval, OccupancyBounds, ReplicaBounds, ScaleJobGroup, ScheduleShape};
pub use overlap::has_overlap;
pub use schedule::next_occurrence;
pub use shape::classify_shape;
pub use validate::{build_named_intervals, validate_scale_job_groups};

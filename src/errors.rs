// Error handling framework

use thiserror::Error;

/// Validation errors raised while checking a set of scale job groups
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid cron expression '{expression}': {reason}")]
    InvalidCronExpression { expression: String, reason: String },

    #[error("No occurrence of '{0}' after the anchor instant")]
    NoNextOccurrence(String),

    #[error("Scale job groups sharing the same name: {0}")]
    DuplicateGroupName(String),

    #[error("Target size {target} of group '{group}' outside replica bounds {min}..={max}")]
    TargetSizeOutOfRange {
        group: String,
        target: i32,
        min: i32,
        max: i32,
    },

    #[error("Unsupported schedule shape in group: {0}")]
    UnsupportedSchedule(String),

    #[error("Active window of group '{group}' outside allowed span ({min_minutes}..={max_minutes} minutes)")]
    ScheduleIntervalInvalid {
        group: String,
        min_minutes: i64,
        max_minutes: i64,
    },

    #[error("One-shot window of group '{0}' spans more than 7 days")]
    OnceJobTooLong(String),

    #[error("Cron schedule groups overlap")]
    OverlappingSchedules,
}

// Cron expression evaluation
//
// Wraps the `cron` crate so that both 5-field (minute hour dom month dow)
// and 6-field (leading seconds) expressions are accepted, and answers
// "what is the next matching instant strictly after a given instant?".

use crate::errors::ValidationError;
use chrono::{DateTime, Utc};
use cron::Schedule as CronSchedule;
use std::str::FromStr;

/// Parse a 5- or 6-field cron expression.
///
/// The `cron` crate requires a seconds field, so a 5-field expression is
/// normalized by prepending `0 `. Any other field count is rejected.
pub fn parse_schedule(expression: &str) -> Result<CronSchedule, ValidationError> {
    let normalized = match expression.split_whitespace().count() {
        5 => format!("0 {}", expression.trim()),
        6 => expression.trim().to_string(),
        n => {
            return Err(ValidationError::InvalidCronExpression {
                expression: expression.to_string(),
                reason: format!("expected 5 or 6 whitespace-separated fields, got {n}"),
            })
        }
    };

    CronSchedule::from_str(&normalized).map_err(|e| ValidationError::InvalidCronExpression {
        expression: expression.to_string(),
        reason: e.to_string(),
    })
}

/// Return the earliest instant strictly later than `after` that matches
/// `schedule`. Pure function of its inputs.
pub fn next_occurrence(
    schedule: &str,
    after: DateTime<Utc>,
) -> Result<DateTime<Utc>, ValidationError> {
    let parsed = parse_schedule(schedule)?;
    parsed
        .after(&after)
        .next()
        .ok_or_else(|| ValidationError::NoNextOccurrence(schedule.to_string()))
}

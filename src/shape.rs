// Schedule shape classification
//
// Categorizes a scale job group's up/down cron pair into one of the
// supported recurrence shapes. The overlap checks only hold when every
// group produces exactly one Up and one Down per anchored cycle, so any
// expression outside these shapes (several days per week, irregular
// steps) is classified `Unsupported` and must be rejected outright.
//
// The matcher works on the five parsed cron fields rather than on the
// schedule text. Classification is syntactic only; it accepts some
// values a cron parser would reject (hour up to 29, month up to 19,
// day-of-month up to 39), and those surface as parse errors when the
// window is resolved.

use crate::models::{ScaleJobGroup, ScheduleShape};

/// One parsed cron field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CronField {
    Wildcard,
    Single(u32),
    List(Vec<u32>),
    Range(u32, u32),
    Step(u32),
}

impl CronField {
    fn parse(raw: &str) -> Option<Self> {
        if raw == "*" {
            return Some(CronField::Wildcard);
        }
        if let Some(step) = raw.strip_prefix("*/") {
            return step.parse().ok().map(CronField::Step);
        }
        if raw.contains(',') {
            let values: Option<Vec<u32>> = raw.split(',').map(|v| v.parse().ok()).collect();
            return values.filter(|v| !v.is_empty()).map(CronField::List);
        }
        if let Some((lo, hi)) = raw.split_once('-') {
            return match (lo.parse().ok(), hi.parse().ok()) {
                (Some(lo), Some(hi)) => Some(CronField::Range(lo, hi)),
                _ => None,
            };
        }
        raw.parse().ok().map(CronField::Single)
    }

    fn is_single_within(&self, max: u32) -> bool {
        matches!(self, CronField::Single(n) if *n <= max)
    }

    fn is_wildcard(&self) -> bool {
        matches!(self, CronField::Wildcard)
    }

    /// Non-wildcard month spec: a single month, a list, a range, or a step
    fn is_month_spec(&self) -> bool {
        const MAX_MONTH: u32 = 19;
        match self {
            CronField::Wildcard => false,
            CronField::Single(n) | CronField::Step(n) => *n <= MAX_MONTH,
            CronField::List(ns) => ns.iter().all(|n| *n <= MAX_MONTH),
            CronField::Range(lo, hi) => *lo <= MAX_MONTH && *hi <= MAX_MONTH,
        }
    }
}

/// The five fields of a 5-field cron expression
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScheduleFields {
    minute: CronField,
    hour: CronField,
    day: CronField,
    month: CronField,
    weekday: CronField,
}

impl ScheduleFields {
    fn parse(expression: &str) -> Option<Self> {
        let mut fields = expression.split_whitespace();
        let parsed = Self {
            minute: CronField::parse(fields.next()?)?,
            hour: CronField::parse(fields.next()?)?,
            day: CronField::parse(fields.next()?)?,
            month: CronField::parse(fields.next()?)?,
            weekday: CronField::parse(fields.next()?)?,
        };
        if fields.next().is_some() {
            return None;
        }
        Some(parsed)
    }

    /// Minute and hour pinned to single values
    fn time_pinned(&self) -> bool {
        self.minute.is_single_within(59) && self.hour.is_single_within(29)
    }

    /// `m h * * *`
    fn is_everyday(&self) -> bool {
        self.time_pinned()
            && self.day.is_wildcard()
            && self.month.is_wildcard()
            && self.weekday.is_wildcard()
    }

    /// `m h * <months> *`
    fn is_every_day_in_certain_month(&self) -> bool {
        self.time_pinned()
            && self.day.is_wildcard()
            && self.month.is_month_spec()
            && self.weekday.is_wildcard()
    }

    /// `m h * * <weekday>`
    fn is_certain_week(&self) -> bool {
        self.time_pinned()
            && self.day.is_wildcard()
            && self.month.is_wildcard()
            && self.weekday.is_single_within(7)
    }

    /// `m h <day> <month> *`
    fn is_once_day(&self) -> bool {
        self.time_pinned()
            && self.day.is_single_within(39)
            && self.month.is_single_within(19)
            && self.weekday.is_wildcard()
    }
}

/// Classify a group's up/down cron pair into a supported recurrence
/// shape. Both expressions must match the same shape's pattern; rules
/// are tried in priority order. Anything else is `Unsupported`.
pub fn classify_shape(group: &ScaleJobGroup) -> ScheduleShape {
    let (Some(up), Some(down)) = (
        ScheduleFields::parse(&group.up_schedule),
        ScheduleFields::parse(&group.down_schedule),
    ) else {
        return ScheduleShape::Unsupported;
    };

    if up.is_everyday() && down.is_everyday() {
        return ScheduleShape::Everyday;
    }
    if up.is_every_day_in_certain_month() && down.is_every_day_in_certain_month() {
        return ScheduleShape::EveryDayInCertainMonth;
    }
    if up.is_certain_week() && down.is_certain_week() {
        return ScheduleShape::CertainWeek;
    }
    if group.run_once && up.is_once_day() && down.is_once_day() {
        return ScheduleShape::OnceDay;
    }
    ScheduleShape::Unsupported
}

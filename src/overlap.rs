// Sweep-line overlap detection
//
// Decides whether a set of named `[start, end)` windows interleave in a
// way that makes the desired scale state ambiguous at some instant. Each
// interval contributes an Up event at its start and a Down event at its
// end; after a stable sort by time the events must decompose into
// Up/Down pairs of the same name, with no foreign event between an Up
// and its Down and no two boundaries on the same instant.

use crate::models::NamedInterval;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SweepKind {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy)]
struct SweepEvent<'a> {
    name: &'a str,
    time: DateTime<Utc>,
    kind: SweepKind,
}

/// What the next event is required to look like. `None` means "any".
#[derive(Debug, Clone, Copy, Default)]
struct Expectation<'a> {
    name: Option<&'a str>,
    kind: Option<SweepKind>,
}

struct Conflict;

/// Returns `true` when any two groups' windows interleave, share a
/// boundary instant, or otherwise break the Up/Down pairing invariant.
/// Deterministic, total function of its input; `O(n log n)`.
pub fn has_overlap(intervals: &[NamedInterval]) -> bool {
    if intervals.len() <= 1 {
        return false;
    }

    let mut events = Vec::with_capacity(intervals.len() * 2);
    for interval in intervals {
        events.push(SweepEvent {
            name: interval.name.as_str(),
            time: interval.start,
            kind: SweepKind::Up,
        });
        events.push(SweepEvent {
            name: interval.name.as_str(),
            time: interval.end,
            kind: SweepKind::Down,
        });
    }
    // Stable: events sharing an instant keep construction order, though
    // the coincidence rule below rejects that case anyway
    events.sort_by_key(|e| e.time);

    events
        .iter()
        .enumerate()
        .try_fold(Expectation::default(), |expected, (i, event)| {
            // Coincidence rule: two boundaries on the same instant make
            // the desired state ambiguous regardless of which group wins
            if let Some(next) = events.get(i + 1) {
                if event.time == next.time {
                    return Err(Conflict);
                }
            }
            if expected.name.is_some_and(|n| n != event.name) {
                return Err(Conflict);
            }
            if expected.kind.is_some_and(|k| k != event.kind) {
                return Err(Conflict);
            }

            match event.kind {
                // The very next event must be this same group's Down
                SweepKind::Up => Ok(Expectation {
                    name: Some(event.name),
                    kind: Some(SweepKind::Down),
                }),
                SweepKind::Down => {
                    // Wraparound: a leading Down pairs with an Up from the
                    // previous cycle, which is only consistent when the
                    // last event is this same group's Up
                    if i == 0 {
                        let last = &events[events.len() - 1];
                        if last.name != event.name || last.kind != SweepKind::Up {
                            return Err(Conflict);
                        }
                    }
                    Ok(Expectation {
                        name: None,
                        kind: Some(SweepKind::Up),
                    })
                }
            }
        })
        .is_err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn interval(name: &str, start_hour: i64, end_hour: i64) -> NamedInterval {
        let base = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        NamedInterval {
            name: name.to_string(),
            start: base + Duration::hours(start_hour),
            end: base + Duration::hours(end_hour),
        }
    }

    #[test]
    fn test_empty() {
        assert!(!has_overlap(&[]));
    }

    #[test]
    fn test_single() {
        assert!(!has_overlap(&[interval("oper 1", 8, 10)]));
    }

    #[test]
    fn test_split_range_normal() {
        let intervals = [interval("oper 1", -1, 1), interval("oper 2", 2, 3)];
        assert!(!has_overlap(&intervals));
    }

    #[test]
    fn test_edge_overlap() {
        // One window ending exactly when the next starts
        let intervals = [interval("oper 1", -1, 1), interval("oper 2", 1, 2)];
        assert!(has_overlap(&intervals));
    }

    #[test]
    fn test_part_overlap() {
        let intervals = [interval("oper 1", 1, 3), interval("oper 2", 2, 4)];
        assert!(has_overlap(&intervals));
    }

    #[test]
    fn test_same_name_range() {
        let intervals = [interval("oper 1", 1, 3), interval("oper 1", 2, 4)];
        assert!(has_overlap(&intervals));
    }

    #[test]
    fn test_completely_including_overlap() {
        let intervals = [interval("oper 1", 1, 4), interval("oper 2", 2, 3)];
        assert!(has_overlap(&intervals));
    }

    #[test]
    fn test_start_and_end_with_down() {
        // oper 1's Up happened in the previous cycle: events run
        // Down(1) Up(2) Down(2) Up(1), which is consistent
        let intervals = [interval("oper 1", -3, 1), interval("oper 2", -2, -1)];
        assert!(has_overlap(&intervals));

        let wrapped = [interval("oper 1", 22, 25), interval("oper 2", 26, 28)];
        // Shift oper 1 so its Down leads the window while its Up trails
        let shifted = [
            NamedInterval {
                name: "oper 1".into(),
                start: wrapped[1].end + Duration::hours(1),
                end: wrapped[0].start,
            },
            wrapped[1].clone(),
        ];
        assert!(!has_overlap(&shifted));
    }

    #[test]
    fn test_wraparound_last_event_wrong_name() {
        // Leading Down whose trailing Up belongs to another group
        let intervals = [
            NamedInterval {
                name: "oper 1".into(),
                start: Utc.with_ymd_and_hms(2026, 3, 1, 21, 0, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2026, 3, 1, 1, 0, 0).unwrap(),
            },
            NamedInterval {
                name: "oper 2".into(),
                start: Utc.with_ymd_and_hms(2026, 3, 1, 2, 0, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2026, 3, 1, 22, 0, 0).unwrap(),
            },
        ];
        assert!(has_overlap(&intervals));
    }

    #[test]
    fn test_three_disjoint_windows() {
        let intervals = [
            interval("a", 0, 1),
            interval("b", 2, 3),
            interval("c", 4, 5),
        ];
        assert!(!has_overlap(&intervals));
    }
}

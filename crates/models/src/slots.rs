use crate::clock::{TimeValue, to_clock_string, to_minutes};
use serde::Serialize;
use std::{
    collections::BTreeSet,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// Start of the fallback grid (08:00)
pub const DEFAULT_DAY_START: i64 = 8 * 60;
/// End of the fallback grid (18:00)
pub const DEFAULT_DAY_END: i64 = 18 * 60;
/// Width of each fallback slot in minutes
pub const DEFAULT_SLOT_MINUTES: i64 = 60;

/// Anything with a start and an end time
pub trait Timed {
    fn start_time(&self) -> &TimeValue;
    fn end_time(&self) -> &TimeValue;

    fn start_minutes(&self) -> i64 {
        to_minutes(self.start_time())
    }

    fn end_minutes(&self) -> i64 {
        to_minutes(self.end_time())
    }
}

/// A contiguous interval of the rendered day, in minutes since midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Slot {
    pub start: i64,
    pub end: i64,
}

impl Slot {
    /// Half-open overlap test against `[start, end)`
    pub fn overlaps(&self, start: i64, end: i64) -> bool {
        start < self.end && end > self.start
    }

    /// Whether the entry occupies any part of this slot
    pub fn holds<T: Timed + ?Sized>(&self, entry: &T) -> bool {
        self.overlaps(entry.start_minutes(), entry.end_minutes())
    }

    pub fn duration(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}-{}", to_clock_string(self.start), to_clock_string(self.end))
    }
}

/// Boundaries of the fallback grid: 08:00 to 18:00 every hour
pub fn default_boundaries() -> Vec<i64> {
    (DEFAULT_DAY_START..=DEFAULT_DAY_END)
        .step_by(DEFAULT_SLOT_MINUTES as usize)
        .collect()
}

/// Collects the sorted, deduplicated start and end times of all entries.
///
/// Entries with a missing start or end contribute only the time they have.
/// When fewer than two distinct boundaries are found the fallback grid is
/// returned instead.
pub fn derive_boundaries<'a, T, I>(entries: I) -> Vec<i64>
where
    T: Timed + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut points = BTreeSet::new();

    for entry in entries {
        for value in [entry.start_time(), entry.end_time()] {
            if !value.is_missing() {
                points.insert(to_minutes(value));
            }
        }
    }

    if points.len() < 2 {
        return default_boundaries();
    }

    points.into_iter().collect()
}

/// Splits the boundaries of all entries into consecutive slots
pub fn derive_slots<'a, T, I>(entries: I) -> Vec<Slot>
where
    T: Timed + 'a,
    I: IntoIterator<Item = &'a T>,
{
    derive_boundaries(entries)
        .windows(2)
        .map(|pair| Slot {
            start: pair[0],
            end: pair[1],
        })
        .collect()
}

/// Entries occupying any part of the slot
pub fn entries_in_slot<'a, T: Timed>(
    entries: &'a [T],
    slot: Slot,
) -> impl Iterator<Item = &'a T> + 'a {
    entries.iter().filter(move |entry| slot.holds(*entry))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Span(TimeValue, TimeValue);

    impl Timed for Span {
        fn start_time(&self) -> &TimeValue {
            &self.0
        }

        fn end_time(&self) -> &TimeValue {
            &self.1
        }
    }

    fn span(start: &str, end: &str) -> Span {
        Span(start.into(), end.into())
    }

    #[test]
    fn test_single_entry_yields_single_slot() {
        let slots = derive_slots(&[span("09:00", "10:00")]);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].to_string(), "09:00-10:00");
    }

    #[test]
    fn test_no_entries_fall_back_to_hourly_grid() {
        let slots = derive_slots::<Span, _>(&[]);
        assert_eq!(slots.len(), 10);
        assert_eq!(slots[0].to_string(), "08:00-09:00");
        assert_eq!(slots[9].to_string(), "17:00-18:00");
        assert!(slots.iter().all(|slot| slot.duration() == 60));
    }

    #[test]
    fn test_single_boundary_falls_back() {
        let slots = derive_slots(&[span("09:00", "09:00")]);
        assert_eq!(slots.len(), 10);
    }

    #[test]
    fn test_slots_are_contiguous_and_cover_span() {
        let entries = [
            span("10:30", "12:00"),
            span("09:00", "11:00"),
            Span(TimeValue::from(780), TimeValue::from("2024-01-01T14:15:00Z")),
            span("09:00", "10:00"),
        ];
        let boundaries = derive_boundaries(&entries);
        assert_eq!(boundaries, vec![540, 600, 630, 660, 720, 780, 855]);

        let slots = derive_slots(&entries);
        assert_eq!(slots.first().map(|slot| slot.start), Some(540));
        assert_eq!(slots.last().map(|slot| slot.end), Some(855));
        for pair in slots.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert!(pair[0].start < pair[0].end);
        }
    }

    #[test]
    fn test_missing_times_are_skipped() {
        let entries = [Span("09:00".into(), TimeValue::Missing), span("", "11:00")];
        assert_eq!(derive_boundaries(&entries), vec![540, 660]);
    }

    #[test]
    fn test_overlap_is_strict() {
        let slot = Slot {
            start: 540,
            end: 600,
        };
        assert!(slot.overlaps(570, 630));
        assert!(slot.overlaps(500, 700));
        assert!(!slot.overlaps(600, 660));
        assert!(!slot.overlaps(480, 540));
    }

    #[test]
    fn test_entries_in_slot() {
        let entries = [span("09:00", "10:00"), span("10:00", "11:00"), span("09:30", "10:30")];
        let slot = Slot {
            start: 600,
            end: 660,
        };
        let found = entries_in_slot(&entries, slot)
            .map(|entry| entry.start_minutes())
            .collect::<Vec<_>>();
        assert_eq!(found, vec![600, 570]);
    }
}

use crate::{
    clock::TimeValue,
    days::DayOfWeek,
    slots::{Slot, Timed, derive_slots},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Kind of class a personal timetable entry describes
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum EntryKind {
    #[default]
    Lecture,
    Lab,
    Tutorial,
}

/// One row of a user's personal (non-grid) timetable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, alias = "userId", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    pub course_name: String,
    pub course_code: String,
    #[serde(default)]
    pub instructor: String,
    pub day_of_week: DayOfWeek,
    #[serde(default)]
    pub start_time: TimeValue,
    #[serde(default)]
    pub end_time: TimeValue,
    #[serde(default)]
    pub room: String,
    #[serde(default, rename = "type")]
    pub kind: EntryKind,
}

impl Timed for TimetableEntry {
    fn start_time(&self) -> &TimeValue {
        &self.start_time
    }

    fn end_time(&self) -> &TimeValue {
        &self.end_time
    }
}

/// Columns of the personal timetable view
pub const PANEL_DAYS: [DayOfWeek; 6] = [
    DayOfWeek::Monday,
    DayOfWeek::Tuesday,
    DayOfWeek::Wednesday,
    DayOfWeek::Thursday,
    DayOfWeek::Friday,
    DayOfWeek::Saturday,
];

/// A flat list of entries rendered over entry-driven time slots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonalTimetable {
    entries: Vec<TimetableEntry>,
}

impl PersonalTimetable {
    pub fn new(entries: Vec<TimetableEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TimetableEntry] {
        &self.entries
    }

    pub fn add(&mut self, entry: TimetableEntry) {
        self.entries.push(entry);
    }

    /// Removes the entry with the given id.
    ///
    /// # Returns
    /// Whether anything was removed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id.as_deref() != Some(id));
        self.entries.len() != before
    }

    /// Rows of the rendered grid
    pub fn slots(&self) -> Vec<Slot> {
        derive_slots(&self.entries)
    }

    /// Entries shown in the cell of `day` and `slot`
    pub fn cell(&self, day: DayOfWeek, slot: Slot) -> Vec<&TimetableEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.day_of_week == day && slot.holds(*entry))
            .collect()
    }

    /// The whole view: one row per slot, one column per [`PANEL_DAYS`] day
    pub fn grid(&self) -> Vec<(Slot, Vec<Vec<&TimetableEntry>>)> {
        self.slots()
            .into_iter()
            .map(|slot| {
                let row = PANEL_DAYS.iter().map(|&day| self.cell(day, slot)).collect();
                (slot, row)
            })
            .collect()
    }
}

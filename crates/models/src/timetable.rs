use crate::{days::DayOfWeek, subject::normalize_names};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeSet,
    fmt::{Display, Formatter, Result as FmtResult},
};
use strum::IntoEnumIterator;

/// One occupied timetable cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodAssignment {
    /// Teachers sharing the period, unique and in selection order
    pub teachers: Vec<String>,
    pub subject_code: String,
    pub room: String,
}

impl PeriodAssignment {
    /// Creates an assignment, dropping blank and repeated teacher names
    pub fn new<I, S>(teachers: I, subject_code: impl Into<String>, room: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            teachers: normalize_names(teachers),
            subject_code: subject_code.into(),
            room: room.into().trim().to_string(),
        }
    }
}

/// Periods of one day, indexed from 0
pub type DaySchedule = Vec<Option<PeriodAssignment>>;

static EMPTY_SECTION: SectionTimetable = SectionTimetable::new();

/// The week of one section: day index to an optional row of periods
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionTimetable {
    days: Vec<Option<DaySchedule>>,
}

impl SectionTimetable {
    pub const fn new() -> Self {
        Self { days: Vec::new() }
    }

    pub fn from_days(days: Vec<Option<DaySchedule>>) -> Self {
        Self { days }
    }

    pub fn days(&self) -> &[Option<DaySchedule>] {
        &self.days
    }

    /// Looks up a cell; unset and out-of-range indices are simply empty
    pub fn cell(&self, day: usize, period: usize) -> Option<&PeriodAssignment> {
        self.days.get(day)?.as_ref()?.get(period)?.as_ref()
    }

    /// Returns a copy with one cell replaced, growing rows as needed.
    ///
    /// `self` is left untouched. Passing `None` clears the cell.
    pub fn with_cell(
        &self,
        day: usize,
        period: usize,
        assignment: Option<PeriodAssignment>,
    ) -> Self {
        if assignment.is_none() && self.cell(day, period).is_none() {
            return self.clone();
        }

        let mut days = self.days.clone();
        if days.len() <= day {
            days.resize(day + 1, None);
        }

        let row = days[day].get_or_insert_with(Vec::new);
        if row.len() <= period {
            row.resize(period + 1, None);
        }
        row[period] = assignment;

        Self { days }
    }

    /// Every occupied cell as `(day, period, assignment)`
    pub fn assignments(&self) -> impl Iterator<Item = (usize, usize, &PeriodAssignment)> {
        self.days.iter().enumerate().flat_map(|(day, row)| {
            row.iter().flat_map(move |periods| {
                periods
                    .iter()
                    .enumerate()
                    .filter_map(move |(period, cell)| cell.as_ref().map(|a| (day, period, a)))
            })
        })
    }

    pub fn is_empty(&self) -> bool {
        self.assignments().next().is_none()
    }
}

/// All sections of all semesters, both indexed from 0
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FullTimetable {
    semesters: Vec<Vec<SectionTimetable>>,
}

impl FullTimetable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_semesters(semesters: Vec<Vec<SectionTimetable>>) -> Self {
        Self { semesters }
    }

    pub fn semesters(&self) -> &[Vec<SectionTimetable>] {
        &self.semesters
    }

    pub fn section(&self, semester: usize, section: usize) -> Option<&SectionTimetable> {
        self.semesters.get(semester)?.get(section)
    }

    /// Like [`FullTimetable::section`], with an empty grid for absent sections
    pub fn section_or_empty(&self, semester: usize, section: usize) -> &SectionTimetable {
        self.section(semester, section).unwrap_or(&EMPTY_SECTION)
    }

    /// Returns a copy with one section replaced, growing as needed
    pub fn with_section(&self, semester: usize, section: usize, grid: SectionTimetable) -> Self {
        let mut semesters = self.semesters.clone();
        if semesters.len() <= semester {
            semesters.resize_with(semester + 1, Vec::new);
        }

        let sections = &mut semesters[semester];
        if sections.len() <= section {
            sections.resize_with(section + 1, SectionTimetable::new);
        }
        sections[section] = grid;

        Self { semesters }
    }

    /// Whether no section holds any assignment
    pub fn is_empty(&self) -> bool {
        self.semesters.iter().flatten().all(SectionTimetable::is_empty)
    }
}

/// Errors raised by the checked grid accessor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    UnknownSemester(usize),
    UnknownSection { semester: usize, section: usize },
    DayOutOfRange { day: usize, day_count: usize },
    PeriodOutOfRange { period: usize, period_count: usize },
    BreakPeriod { semester: usize, period: usize },
}

impl Display for GridError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::UnknownSemester(semester) => write!(f, "Semester {semester} is not configured"),
            Self::UnknownSection { semester, section } => {
                write!(f, "Section {section} is not configured for semester {semester}")
            }
            Self::DayOutOfRange { day, day_count } => {
                write!(f, "Day {day} is outside the {day_count}-day week")
            }
            Self::PeriodOutOfRange {
                period,
                period_count,
            } => write!(f, "Period {period} is outside the {period_count} periods"),
            Self::BreakPeriod { semester, period } => {
                write!(f, "Period {period} is a break in semester {semester}")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Layout of one semester's timetables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterStructure {
    /// Periods per day, breaks included
    pub period_count: usize,
    pub day_count: usize,
    /// Periods that never hold a class
    pub break_periods: BTreeSet<usize>,
    pub section_count: usize,
}

impl SemesterStructure {
    pub fn new(period_count: usize, day_count: usize, section_count: usize) -> Self {
        Self {
            period_count,
            day_count,
            break_periods: BTreeSet::new(),
            section_count,
        }
    }

    pub fn with_breaks(mut self, breaks: impl IntoIterator<Item = usize>) -> Self {
        self.break_periods.extend(breaks);
        self
    }

    pub fn is_break(&self, period: usize) -> bool {
        self.break_periods.contains(&period)
    }
}

/// Per-semester layout of the whole college timetable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableStructure {
    pub semesters: Vec<SemesterStructure>,
}

impl Default for TimetableStructure {
    /// Four semesters of two sections, nine periods over five days
    fn default() -> Self {
        let breaks: [&[usize]; 4] = [&[4, 5], &[5], &[5], &[5]];

        Self {
            semesters: breaks
                .iter()
                .map(|periods| SemesterStructure::new(9, 5, 2).with_breaks(periods.iter().copied()))
                .collect(),
        }
    }
}

impl TimetableStructure {
    pub fn new(semesters: Vec<SemesterStructure>) -> Self {
        Self { semesters }
    }

    pub fn semester(&self, semester: usize) -> Option<&SemesterStructure> {
        self.semesters.get(semester)
    }

    pub fn semester_count(&self) -> usize {
        self.semesters.len()
    }

    /// Break membership; unknown semesters have no breaks
    pub fn is_break(&self, semester: usize, period: usize) -> bool {
        self.semester(semester)
            .is_some_and(|layout| layout.is_break(period))
    }

    /// Column labels for the semester's days, e.g. `Mon`..`Fri`
    pub fn day_names(&self, semester: usize) -> Vec<&'static str> {
        let day_count = self.semester(semester).map_or(0, |layout| layout.day_count);

        DayOfWeek::iter()
            .take(day_count)
            .map(|day| day.short_name())
            .collect()
    }

    /// Checks that a section exists in the layout
    pub fn check_section(&self, semester: usize, section: usize) -> Result<(), GridError> {
        let layout = self
            .semester(semester)
            .ok_or(GridError::UnknownSemester(semester))?;

        if section >= layout.section_count {
            return Err(GridError::UnknownSection { semester, section });
        }

        Ok(())
    }

    /// Checks that a cell lies inside the layout and is not a break
    pub fn check_writable(&self, semester: usize, day: usize, period: usize) -> Result<(), GridError> {
        let layout = self
            .semester(semester)
            .ok_or(GridError::UnknownSemester(semester))?;

        if day >= layout.day_count {
            return Err(GridError::DayOutOfRange {
                day,
                day_count: layout.day_count,
            });
        }
        if period >= layout.period_count {
            return Err(GridError::PeriodOutOfRange {
                period,
                period_count: layout.period_count,
            });
        }
        if layout.is_break(period) {
            return Err(GridError::BreakPeriod { semester, period });
        }

        Ok(())
    }

    /// Checked copy-on-write update of one cell.
    ///
    /// Assignments may only land inside the semester's layout and never on a
    /// break period. Clearing a cell (`None`) is always allowed.
    pub fn set_cell(
        &self,
        semester: usize,
        grid: &SectionTimetable,
        day: usize,
        period: usize,
        assignment: Option<PeriodAssignment>,
    ) -> Result<SectionTimetable, GridError> {
        if assignment.is_some() {
            self.check_writable(semester, day, period)?;
        }

        Ok(grid.with_cell(day, period, assignment))
    }

    /// Finds every assignment in `grid` that breaks the semester's layout
    pub fn violations(&self, semester: usize, grid: &SectionTimetable) -> Vec<GridError> {
        grid.assignments()
            .filter_map(|(day, period, _)| self.check_writable(semester, day, period).err())
            .collect()
    }
}

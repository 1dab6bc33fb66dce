//! The timetable editing session.
//!
//! An editor views one section at a time. Opening a cell loads the teacher
//! directory and course list, runs the three-step selector, and writes the
//! result back through the checked grid accessor. The new grid becomes the
//! local state only once the backend has accepted it.

use crate::{error::ClientError, source::ScheduleSource};
use futures::try_join;
use log::{info, warn};
use models::{
    availability::{AvailabilityIndex, CourseOption, course_options, dedup_subjects},
    selector::SelectorWorkflow,
    subject::{Subject, SubjectCatalog, Teacher},
    timetable::{FullTimetable, PeriodAssignment, SectionTimetable, TimetableStructure},
};

/// What a grid cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView<'a> {
    Break,
    Empty,
    Assigned {
        assignment: &'a PeriodAssignment,
        color: &'a str,
    },
}

#[derive(Debug)]
pub struct TimetableEditor<S> {
    source: S,
    structure: TimetableStructure,
    timetable: FullTimetable,
    catalog: SubjectCatalog,
    availability: AvailabilityIndex,
    teachers: Vec<Teacher>,
    subjects: Vec<Subject>,
    semester: usize,
    section: usize,
    /// `(day, period)` of the open cell
    editing: Option<(usize, usize)>,
    workflow: SelectorWorkflow,
}

impl<S: ScheduleSource> TimetableEditor<S> {
    /// Creates an editor showing the first section of the first semester
    pub fn new(source: S, structure: TimetableStructure) -> Self {
        Self {
            source,
            structure,
            timetable: FullTimetable::new(),
            catalog: SubjectCatalog::new(),
            availability: AvailabilityIndex::default(),
            teachers: Vec::new(),
            subjects: Vec::new(),
            semester: 0,
            section: 0,
            editing: None,
            workflow: SelectorWorkflow::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn structure(&self) -> &TimetableStructure {
        &self.structure
    }

    pub fn timetable(&self) -> &FullTimetable {
        &self.timetable
    }

    pub fn catalog(&self) -> &SubjectCatalog {
        &self.catalog
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn semester(&self) -> usize {
        self.semester
    }

    pub fn section(&self) -> usize {
        self.section
    }

    /// Fetches the stored timetable and subject details together.
    ///
    /// Nothing is replaced unless both requests succeed.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let (timetable, catalog) = try_join!(
            self.source.fetch_full_schedule(),
            self.source.fetch_subject_details()
        )
        .inspect_err(|e| warn!("Failed to load timetable: {e}"))?;

        for (semester, sections) in timetable.semesters().iter().enumerate() {
            for (section, grid) in sections.iter().enumerate() {
                for violation in self.structure.violations(semester, grid) {
                    warn!("Stored timetable of semester {semester} section {section}: {violation}");
                }
            }
        }

        self.availability = AvailabilityIndex::build(&catalog);
        self.timetable = timetable;
        self.catalog = catalog;

        info!(
            "Editor loaded {} semesters and {} subjects",
            self.timetable.semesters().len(),
            self.catalog.len()
        );
        Ok(())
    }

    /// Switches the viewed section, closing any open cell
    pub fn select(&mut self, semester: usize, section: usize) -> Result<(), ClientError> {
        self.structure.check_section(semester, section)?;

        self.cancel_edit();
        self.semester = semester;
        self.section = section;
        Ok(())
    }

    /// The viewed section; empty when nothing is stored for it
    pub fn current(&self) -> &SectionTimetable {
        self.timetable
            .section_or_empty(self.semester, self.section)
    }

    pub fn cell_view(&self, day: usize, period: usize) -> CellView<'_> {
        if self.structure.is_break(self.semester, period) {
            return CellView::Break;
        }

        match self.current().cell(day, period) {
            Some(assignment) => CellView::Assigned {
                assignment,
                color: self.catalog.color_for(&assignment.subject_code),
            },
            None => CellView::Empty,
        }
    }

    /// Opens a cell for editing.
    ///
    /// Break periods and cells outside the layout are refused before any
    /// request is made. The teacher directory, course list and subject
    /// details load together; if any of them fails the editor stays closed.
    pub async fn begin_edit(&mut self, day: usize, period: usize) -> Result<(), ClientError> {
        self.structure.check_writable(self.semester, day, period)?;

        let (teachers, subjects, catalog) = try_join!(
            self.source.fetch_teachers(),
            self.source.fetch_subjects(),
            self.source.fetch_subject_details()
        )
        .inspect_err(|e| warn!("Failed to load selector data: {e}"))?;

        self.teachers = teachers;
        self.subjects = dedup_subjects(subjects);
        self.availability = AvailabilityIndex::build(&catalog);
        self.catalog = catalog;

        self.workflow.cancel();
        self.editing = Some((day, period));
        Ok(())
    }

    /// The open cell as `(day, period)`
    pub fn editing(&self) -> Option<(usize, usize)> {
        self.editing
    }

    pub fn workflow(&self) -> &SelectorWorkflow {
        &self.workflow
    }

    pub fn workflow_mut(&mut self) -> Result<&mut SelectorWorkflow, ClientError> {
        match self.editing {
            Some(_) => Ok(&mut self.workflow),
            None => Err(ClientError::NoActiveEdit),
        }
    }

    pub fn course_options(&self) -> Vec<CourseOption> {
        course_options(&self.catalog)
    }

    /// Pre-fills the room with the selected course's preferred room
    pub fn suggest_room(&mut self) -> bool {
        self.workflow.suggest_room(&self.catalog)
    }

    /// Directory entries who have taught the selected course
    pub fn teachers_for_selected_course(&self) -> Vec<Teacher> {
        self.workflow
            .course()
            .map(|code| self.availability.teachers_for(code, &self.teachers))
            .unwrap_or_default()
    }

    pub fn cancel_edit(&mut self) {
        self.workflow.cancel();
        self.editing = None;
    }

    /// Writes the selection into the open cell and saves the section.
    ///
    /// On failure the grid and the selector keep their state so the user
    /// can retry.
    pub async fn submit(&mut self) -> Result<PeriodAssignment, ClientError> {
        let (day, period) = self.editing.ok_or(ClientError::NoActiveEdit)?;
        let selection = self.workflow.pending_selection()?;

        let assignment = PeriodAssignment::new(&selection.teachers, selection.course, selection.room);
        let grid = self.structure.set_cell(
            self.semester,
            self.current(),
            day,
            period,
            Some(assignment.clone()),
        )?;

        self.source
            .save_section(self.semester, self.section, &grid)
            .await
            .inspect_err(|e| warn!("Failed to save timetable: {e}"))?;

        self.timetable = self
            .timetable
            .with_section(self.semester, self.section, grid);
        self.cancel_edit();

        info!(
            "Assigned {} to day {day} period {period}",
            assignment.subject_code
        );
        Ok(assignment)
    }

    /// Replaces the whole timetable with a generated one
    pub async fn auto_fill(&mut self) -> Result<(), ClientError> {
        let generated = self.source.generate_schedule().await?;

        if generated.is_empty() {
            warn!("Schedule generation returned nothing");
            return Err(ClientError::GenerationUnavailable);
        }

        self.cancel_edit();
        self.timetable = generated;
        Ok(())
    }
}

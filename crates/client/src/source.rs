use crate::error::ClientError;
use models::{
    entry::{PersonalTimetable, TimetableEntry},
    subject::{Subject, SubjectCatalog, Teacher},
    timetable::{FullTimetable, SectionTimetable},
};
use std::future::Future;

/// Everything the editor needs from the schedule backend.
///
/// Semester and section indices are 0-based on this side; implementations
/// translate them for the wire.
pub trait ScheduleSource {
    /// The stored timetable of every semester and section
    fn fetch_full_schedule(&self) -> impl Future<Output = Result<FullTimetable, ClientError>> + Send;

    /// Display details of every subject, keyed by subject code
    fn fetch_subject_details(
        &self,
    ) -> impl Future<Output = Result<SubjectCatalog, ClientError>> + Send;

    /// The teacher directory
    fn fetch_teachers(&self) -> impl Future<Output = Result<Vec<Teacher>, ClientError>> + Send;

    /// All courses offered for scheduling
    fn fetch_subjects(&self) -> impl Future<Output = Result<Vec<Subject>, ClientError>> + Send;

    /// Persists one section's grid
    fn save_section(
        &self,
        semester: usize,
        section: usize,
        grid: &SectionTimetable,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Asks the backend to generate a full timetable
    fn generate_schedule(&self) -> impl Future<Output = Result<FullTimetable, ClientError>> + Send;

    /// The signed-in user's personal timetable
    fn fetch_personal_entries(
        &self,
    ) -> impl Future<Output = Result<PersonalTimetable, ClientError>> + Send;

    fn add_personal_entry(
        &self,
        entry: &TimetableEntry,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn delete_personal_entry(&self, id: &str) -> impl Future<Output = Result<(), ClientError>> + Send;
}

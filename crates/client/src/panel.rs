use crate::{error::ClientError, source::ScheduleSource};
use log::warn;
use models::entry::{PersonalTimetable, TimetableEntry};

/// The signed-in user's personal timetable, kept in sync with the backend.
///
/// Every change is sent first and then the list is fetched again. When that
/// refresh fails the change is applied locally instead.
#[derive(Debug)]
pub struct PersonalPanel<S> {
    source: S,
    timetable: PersonalTimetable,
}

impl<S: ScheduleSource> PersonalPanel<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            timetable: PersonalTimetable::default(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn timetable(&self) -> &PersonalTimetable {
        &self.timetable
    }

    /// Replaces the entries with the stored ones; keeps them on failure
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.timetable = self
            .source
            .fetch_personal_entries()
            .await
            .inspect_err(|e| warn!("Failed to load personal timetable: {e}"))?;
        Ok(())
    }

    pub async fn add(&mut self, entry: TimetableEntry) -> Result<(), ClientError> {
        self.source.add_personal_entry(&entry).await?;

        if let Err(e) = self.load().await {
            warn!("Showing {} without a refresh: {e}", entry.course_code);
            self.timetable.add(entry);
        }
        Ok(())
    }

    pub async fn remove(&mut self, id: &str) -> Result<(), ClientError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ClientError::MissingEntryId);
        }

        self.source.delete_personal_entry(id).await?;

        if let Err(e) = self.load().await {
            warn!("Removing {id} without a refresh: {e}");
            self.timetable.remove(id);
        }
        Ok(())
    }
}

use crate::{
    config::ClientConfig,
    error::ClientError,
    session::Session,
    source::ScheduleSource,
    wire::{
        SavePayload, WireCourse, WireSubjectDetails, WireTeacher, WireTimetable, catalog_from_wire,
        entries_from_wire, records_from_wire, timetable_from_wire,
    },
};
use log::{debug, info, warn};
use models::{
    entry::{PersonalTimetable, TimetableEntry},
    subject::{Subject, SubjectCatalog, Teacher},
    timetable::{FullTimetable, SectionTimetable},
};
use reqwest::{Client, Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned, de::IgnoredAny};
use serde_json::{Value, json};

const TIMETABLE_PATH: &str = "/schedules/timetable";
const SUBJECT_DETAILS_PATH: &str = "/schedules/subjects-details";
const SAVE_PATH: &str = "/schedules/save";
const GENERATE_PATH: &str = "/schedules/generate";
const TEACHERS_PATH: &str = "/teachers";
const COURSES_PATH: &str = "/courses";
const PERSONAL_PATH: &str = "/timetable";

/// [`ScheduleSource`] backed by the college REST API
#[derive(Debug, Clone)]
pub struct HttpScheduleApi {
    client: Client,
    config: ClientConfig,
    session: Session,
}

impl HttpScheduleApi {
    /// Creates a client for the configured backend
    ///
    /// # Arguments
    /// * `config` - Base URL, timeout and wire encoding
    /// * `session` - Credentials attached to every request
    pub fn new(config: ClientConfig, session: Session) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            config,
            session,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.client.request(method, self.config.endpoint(path));

        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends a request and decodes its JSON body; an empty body reads as `null`
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, path: &str) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!("{path} answered {status}");
            return Err(ClientError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!("{path} returned {} bytes", body.len());

        let body = match body.trim_ascii() {
            [] => b"null".as_slice(),
            body => body,
        };
        Ok(serde_json::from_slice(body)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.request(Method::GET, path), path).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::POST, path).json(body), path)
            .await
    }
}

impl ScheduleSource for HttpScheduleApi {
    async fn fetch_full_schedule(&self) -> Result<FullTimetable, ClientError> {
        let wire: Option<WireTimetable> = self.get(TIMETABLE_PATH).await?;
        let timetable = timetable_from_wire(&wire.unwrap_or_default());

        info!("Loaded timetable for {} semesters", timetable.semesters().len());
        Ok(timetable)
    }

    async fn fetch_subject_details(&self) -> Result<SubjectCatalog, ClientError> {
        let wire: Option<WireSubjectDetails> = self.get(SUBJECT_DETAILS_PATH).await?;
        let catalog = catalog_from_wire(wire);

        info!("Loaded details of {} subjects", catalog.len());
        Ok(catalog)
    }

    async fn fetch_teachers(&self) -> Result<Vec<Teacher>, ClientError> {
        let wire: Option<Vec<Value>> = self.get(TEACHERS_PATH).await?;

        Ok(records_from_wire::<WireTeacher>(wire, "teacher")
            .into_iter()
            .map(WireTeacher::into_teacher)
            .collect())
    }

    async fn fetch_subjects(&self) -> Result<Vec<Subject>, ClientError> {
        let wire: Option<Vec<Value>> = self.get(COURSES_PATH).await?;

        Ok(records_from_wire::<WireCourse>(wire, "course")
            .into_iter()
            .map(WireCourse::into_subject)
            .collect())
    }

    async fn save_section(
        &self,
        semester: usize,
        section: usize,
        grid: &SectionTimetable,
    ) -> Result<(), ClientError> {
        let payload = SavePayload::new(semester, section, grid, self.config.wire_version);
        let _: IgnoredAny = self.post(SAVE_PATH, &payload).await?;

        info!(
            "Saved semester {} section {}",
            payload.semester, payload.section
        );
        Ok(())
    }

    async fn generate_schedule(&self) -> Result<FullTimetable, ClientError> {
        let wire: Option<WireTimetable> = self.post(GENERATE_PATH, &json!({})).await?;

        Ok(timetable_from_wire(&wire.unwrap_or_default()))
    }

    async fn fetch_personal_entries(&self) -> Result<PersonalTimetable, ClientError> {
        let wire: Option<Vec<Value>> = self.get(PERSONAL_PATH).await?;

        Ok(entries_from_wire(wire))
    }

    async fn add_personal_entry(&self, entry: &TimetableEntry) -> Result<(), ClientError> {
        let _: IgnoredAny = self.post(PERSONAL_PATH, entry).await?;

        info!("Added {} to the personal timetable", entry.course_code);
        Ok(())
    }

    async fn delete_personal_entry(&self, id: &str) -> Result<(), ClientError> {
        let path = format!("{PERSONAL_PATH}/{id}");
        let _: IgnoredAny = self
            .send(self.request(Method::DELETE, &path), &path)
            .await?;

        info!("Deleted personal timetable entry {id}");
        Ok(())
    }
}

//! Wire shapes of the schedule backend.
//!
//! This is the only module that knows how the backend spells things: the
//! `+`-joined teacher field, 1-based semester and section numbers in save
//! requests, and the several field names older endpoints use for the same
//! value. Everything past this module works with [`models`] types.

use log::warn;
use models::{
    entry::{PersonalTimetable, TimetableEntry},
    subject::{Subject, SubjectCatalog, SubjectDetail, Teacher, parse_teacher_field},
    timetable::{FullTimetable, PeriodAssignment, SectionTimetable},
};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Separator of teacher names in the joined encoding
pub const TEACHER_DELIMITER: &str = "+";

/// Name given to teachers whose record carries none
const UNKNOWN_TEACHER: &str = "Unknown";

/// Encoding used when writing teacher lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WireVersion {
    /// Teachers joined into one `+`-delimited string
    #[default]
    V1,
    /// Teachers as a JSON array
    V2,
}

impl FromStr for WireVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "v1" => Ok(Self::V1),
            "2" | "v2" => Ok(Self::V2),
            _ => Err(format!("Unknown wire version: {s}")),
        }
    }
}

/// Teacher names as either encoding; both are accepted on read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TeacherField {
    Joined(String),
    List(Vec<String>),
}

impl TeacherField {
    pub fn encode(names: &[String], version: WireVersion) -> Self {
        match version {
            WireVersion::V1 => Self::Joined(names.join(TEACHER_DELIMITER)),
            WireVersion::V2 => Self::List(names.to_vec()),
        }
    }

    /// Individual names, trimmed and without repeats
    pub fn names(&self) -> Vec<String> {
        match self {
            Self::Joined(raw) => parse_teacher_field(raw),
            Self::List(names) => parse_teacher_field(&names.join(TEACHER_DELIMITER)),
        }
    }
}

/// A timetable cell: `[teachers, subject, room]`
///
/// Reading never fails: missing or null parts are empty, and a cell that is
/// not an array reads as an empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireCell(pub TeacherField, pub String, pub String);

impl<'de> Deserialize<'de> for WireCell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = match Value::deserialize(deserializer)? {
            Value::Array(parts) => parts,
            other => {
                warn!("Ignoring malformed timetable cell: {other}");
                Vec::new()
            }
        };

        let teachers = match parts.first() {
            Some(Value::Array(names)) => TeacherField::List(
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            ),
            part => TeacherField::Joined(text_part(part)),
        };

        Ok(Self(teachers, text_part(parts.get(1)), text_part(parts.get(2))))
    }
}

/// Strings as-is, numbers in decimal, anything else empty.
/// Ids also arrive as either strings or numbers.
fn text_part(part: Option<&Value>) -> String {
    match part {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

pub type WireDay = Option<Vec<Option<WireCell>>>;
pub type WireSection = Vec<WireDay>;
pub type WireTimetable = Vec<Option<Vec<Option<WireSection>>>>;

/// Reads a cell; cells without teachers and subject are empty
pub fn cell_from_wire(cell: &WireCell) -> Option<PeriodAssignment> {
    let WireCell(teachers, subject, room) = cell;
    let teachers = teachers.names();
    let subject = subject.trim();

    if teachers.is_empty() && subject.is_empty() {
        return None;
    }

    Some(PeriodAssignment::new(teachers, subject, room.as_str()))
}

pub fn cell_to_wire(assignment: &PeriodAssignment, version: WireVersion) -> WireCell {
    WireCell(
        TeacherField::encode(&assignment.teachers, version),
        assignment.subject_code.clone(),
        assignment.room.clone(),
    )
}

pub fn section_from_wire(section: &WireSection) -> SectionTimetable {
    let days = section
        .iter()
        .map(|day| {
            day.as_ref().map(|periods| {
                periods
                    .iter()
                    .map(|cell| cell.as_ref().and_then(cell_from_wire))
                    .collect()
            })
        })
        .collect();

    SectionTimetable::from_days(days)
}

pub fn section_to_wire(grid: &SectionTimetable, version: WireVersion) -> WireSection {
    grid.days()
        .iter()
        .map(|day| {
            day.as_ref().map(|periods| {
                periods
                    .iter()
                    .map(|cell| cell.as_ref().map(|a| cell_to_wire(a, version)))
                    .collect()
            })
        })
        .collect()
}

pub fn timetable_from_wire(wire: &WireTimetable) -> FullTimetable {
    let semesters = wire
        .iter()
        .map(|sections| {
            sections
                .iter()
                .flatten()
                .map(|section| section.as_ref().map(section_from_wire).unwrap_or_default())
                .collect()
        })
        .collect();

    FullTimetable::from_semesters(semesters)
}

/// Body of `POST /schedules/save`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavePayload {
    /// 1-based semester number
    pub semester: usize,
    /// 1-based section number
    pub section: usize,
    pub timetable: WireSection,
}

impl SavePayload {
    /// Builds the payload from 0-based model indices
    pub fn new(semester: usize, section: usize, grid: &SectionTimetable, version: WireVersion) -> Self {
        Self {
            semester: semester + 1,
            section: section + 1,
            timetable: section_to_wire(grid, version),
        }
    }
}

/// First present, non-blank value
fn first_text(candidates: [&Option<String>; 3]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|text| text.trim())
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Teacher record of `GET /teachers`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireTeacher {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub user: Option<WireUser>,
    /// Either a department name or a department object
    #[serde(default)]
    pub department: Option<Value>,
    #[serde(default)]
    pub email: Option<String>,
}

impl WireTeacher {
    pub fn into_teacher(self) -> Teacher {
        let user = self.user.unwrap_or_default();
        let name = first_text([&self.name, &user.name, &None]).unwrap_or_else(|| UNKNOWN_TEACHER.to_string());
        let department = match self.department {
            Some(Value::String(name)) => Some(name),
            Some(Value::Object(fields)) => fields.get("name").and_then(Value::as_str).map(str::to_string),
            _ => None,
        };

        Teacher {
            id: text_part(self.id.as_ref()),
            name,
            department,
            email: self.email.or(user.email),
        }
    }
}

/// Course record of `GET /courses`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCourse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub credits: Option<f32>,
    #[serde(default)]
    pub teacher: Option<WireTeacher>,
    #[serde(default)]
    pub teacher_name: Option<TeacherField>,
    #[serde(default)]
    pub room_codes: Option<Vec<String>>,
}

impl WireCourse {
    pub fn code(&self) -> Option<String> {
        first_text([&self.course_code, &self.code, &None])
    }

    pub fn name(&self) -> Option<String> {
        first_text([&self.course_name, &self.name, &None])
    }

    pub fn into_subject(self) -> Subject {
        Subject {
            id: text_part(self.id.as_ref()),
            name: self.name().unwrap_or_default(),
            code: self.code().unwrap_or_default(),
            credits: self.credits,
        }
    }

    /// Catalog entry keyed by code, or by name when the course has no code
    fn into_catalog_entry(self) -> Option<(String, SubjectDetail)> {
        let code = self.code().or_else(|| self.name())?;
        let teachers = match (&self.teacher_name, &self.teacher) {
            (Some(field), _) => field.names(),
            (None, Some(teacher)) => {
                let user_name = teacher.user.as_ref().and_then(|user| user.name.clone());
                first_text([&teacher.name, &user_name, &None])
                    .map(|name| parse_teacher_field(&name))
                    .unwrap_or_default()
            }
            (None, None) => Vec::new(),
        };

        let detail = SubjectDetail {
            display_name: self.name().unwrap_or_else(|| code.clone()),
            teachers,
            candidate_rooms: self.room_codes.unwrap_or_default(),
            display_color: None,
        };
        Some((code, detail))
    }
}

/// Value of one code in the keyed subject-details listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSubjectDetail {
    #[serde(default)]
    pub subject_name: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub teacher_name: Option<TeacherField>,
    #[serde(default)]
    pub teachers: Option<TeacherField>,
    #[serde(default)]
    pub room_codes: Option<Vec<String>>,
    #[serde(default)]
    pub rooms: Option<Vec<String>>,
    #[serde(default)]
    pub color: Option<String>,
}

impl WireSubjectDetail {
    pub fn into_detail(self, code: &str) -> SubjectDetail {
        let display_name = first_text([&self.subject_name, &self.course_name, &self.name])
            .unwrap_or_else(|| code.to_string());
        let teachers = self
            .teacher_name
            .or(self.teachers)
            .map(|field| field.names())
            .unwrap_or_default();

        SubjectDetail {
            display_name,
            teachers,
            candidate_rooms: self.room_codes.or(self.rooms).unwrap_or_default(),
            display_color: self.color.filter(|color| !color.trim().is_empty()),
        }
    }
}

/// Decodes one record of a listing, logging and skipping it when malformed
fn decode_record<T: DeserializeOwned>(value: Value, what: &str) -> Option<T> {
    serde_json::from_value(value)
        .inspect_err(|e| warn!("Skipping malformed {what}: {e}"))
        .ok()
}

/// Decodes every well-formed record of a listing; a missing listing is empty
pub fn records_from_wire<T: DeserializeOwned>(records: Option<Vec<Value>>, what: &str) -> Vec<T> {
    records
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| decode_record(value, what))
        .collect()
}

/// Subject details as either a code-keyed object or a plain course list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireSubjectDetails {
    Keyed(Map<String, Value>),
    Listed(Vec<Value>),
}

/// Builds the catalog in document order, keeping the first entry per code.
///
/// A missing listing gives an empty catalog. Malformed records are skipped
/// and a `null` detail reads as one with no fields.
pub fn catalog_from_wire(details: Option<WireSubjectDetails>) -> SubjectCatalog {
    let mut catalog = SubjectCatalog::new();

    match details {
        Some(WireSubjectDetails::Keyed(entries)) => {
            for (code, value) in entries {
                let detail = match value {
                    Value::Null => Some(WireSubjectDetail::default()),
                    value => decode_record::<WireSubjectDetail>(value, "subject detail"),
                };
                if let Some(detail) = detail {
                    let detail = detail.into_detail(&code);
                    catalog.insert(code, detail);
                }
            }
        }
        Some(WireSubjectDetails::Listed(courses)) => {
            let courses = records_from_wire::<WireCourse>(Some(courses), "course");
            for (code, detail) in courses.into_iter().filter_map(WireCourse::into_catalog_entry) {
                catalog.insert(code, detail);
            }
        }
        None => {}
    }

    catalog
}

/// Personal timetable entries, skipping malformed ones
pub fn entries_from_wire(entries: Option<Vec<Value>>) -> PersonalTimetable {
    PersonalTimetable::new(records_from_wire::<TimetableEntry>(entries, "timetable entry"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_reads_both_encodings() {
        let joined: WireCell = serde_json::from_value(json!(["Alice + Bob+Alice", "CS101", "Lab 1"])).unwrap();
        let listed: WireCell = serde_json::from_value(json!([["Alice", "Bob"], "CS101", "Lab 1"])).unwrap();

        let expected = PeriodAssignment::new(["Alice", "Bob"], "CS101", "Lab 1");
        assert_eq!(cell_from_wire(&joined), Some(expected.clone()));
        assert_eq!(cell_from_wire(&listed), Some(expected));
    }

    #[test]
    fn test_short_and_malformed_cells_read_as_empty_parts() {
        let wire: WireTimetable = serde_json::from_str(
            r#"[[[[["Alice", "MA101"], [], ["Bob", "CS101", null], "garbage", 42, [["Carol"], 7, 101]]]]]"#,
        )
        .unwrap();

        let grid = timetable_from_wire(&wire);
        let grid = grid.section(0, 0).unwrap();
        assert_eq!(grid.cell(0, 0), Some(&PeriodAssignment::new(["Alice"], "MA101", "")));
        assert!(grid.cell(0, 1).is_none());
        assert_eq!(grid.cell(0, 2), Some(&PeriodAssignment::new(["Bob"], "CS101", "")));
        assert!(grid.cell(0, 3).is_none());
        assert!(grid.cell(0, 4).is_none());
        assert_eq!(grid.cell(0, 5), Some(&PeriodAssignment::new(["Carol"], "7", "101")));
    }

    #[test]
    fn test_blank_cell_is_empty() {
        let blank: WireCell = serde_json::from_value(json!(["", " ", ""])).unwrap();
        assert_eq!(cell_from_wire(&blank), None);
    }

    #[test]
    fn test_section_from_wire() {
        let wire: WireSection = serde_json::from_value(json!([
            [["Alice", "MA101", "R1"], null],
            null,
            [null, null, ["Bob+Carol", "CS101", "Lab 2"]]
        ]))
        .unwrap();

        let grid = section_from_wire(&wire);
        assert_eq!(grid.cell(0, 0).unwrap().subject_code, "MA101");
        assert!(grid.cell(0, 1).is_none());
        assert!(grid.cell(1, 0).is_none());
        assert_eq!(grid.cell(2, 2).unwrap().teachers, vec!["Bob", "Carol"]);
    }

    #[test]
    fn test_timetable_tolerates_nulls() {
        let wire: WireTimetable = serde_json::from_value(json!([
            [[[["Alice", "MA101", "R1"]]], null],
            null,
            [null, [[["Bob", "CS101", "R2"]]]]
        ]))
        .unwrap();

        let full = timetable_from_wire(&wire);
        assert_eq!(full.semesters().len(), 3);
        assert_eq!(full.section(0, 0).unwrap().cell(0, 0).unwrap().room, "R1");
        assert!(full.section(0, 1).unwrap().is_empty());
        assert!(full.section(1, 0).is_none());
        assert_eq!(full.section(2, 1).unwrap().cell(0, 0).unwrap().subject_code, "CS101");
    }

    #[test]
    fn test_save_payload_is_one_based() {
        let grid = SectionTimetable::new().with_cell(
            0,
            1,
            Some(PeriodAssignment::new(["Alice", "Bob"], "CS101", "Lab 1")),
        );

        let payload = serde_json::to_value(SavePayload::new(0, 2, &grid, WireVersion::V1)).unwrap();
        assert_eq!(
            payload,
            json!({
                "semester": 1,
                "section": 3,
                "timetable": [[null, ["Alice+Bob", "CS101", "Lab 1"]]]
            })
        );

        let payload = serde_json::to_value(SavePayload::new(1, 0, &grid, WireVersion::V2)).unwrap();
        assert_eq!(payload["semester"], 2);
        assert_eq!(payload["timetable"][0][1][0], json!(["Alice", "Bob"]));
    }

    #[test]
    fn test_section_survives_the_wire() {
        let grid = SectionTimetable::new()
            .with_cell(3, 2, Some(PeriodAssignment::new(["Carol"], "PH101", "Lab 3")))
            .with_cell(0, 0, Some(PeriodAssignment::new(["Alice", "Bob"], "CS101", "R1")));

        for version in [WireVersion::V1, WireVersion::V2] {
            assert_eq!(section_from_wire(&section_to_wire(&grid, version)), grid);
        }
    }

    #[test]
    fn test_keyed_details_keep_document_order() {
        let details: WireSubjectDetails = serde_json::from_value(json!({
            "MA101": {"subjectName": "Calculus", "teacherName": "Carol+Dan", "roomCodes": ["R101"], "color": "#ff0000"},
            "CS101": {"courseName": "Programming", "teachers": ["Alice", "Bob"], "rooms": ["Lab 1"]},
            "PH101": {}
        }))
        .unwrap();

        let catalog = catalog_from_wire(Some(details));
        let codes = catalog.iter().map(|(code, _)| code).collect::<Vec<_>>();
        assert_eq!(codes, ["MA101", "CS101", "PH101"]);

        let calculus = catalog.get("MA101").unwrap();
        assert_eq!(calculus.teachers, vec!["Carol", "Dan"]);
        assert_eq!(calculus.display_color.as_deref(), Some("#ff0000"));

        let programming = catalog.get("CS101").unwrap();
        assert_eq!(programming.display_name, "Programming");
        assert_eq!(programming.candidate_rooms, vec!["Lab 1"]);

        assert_eq!(catalog.get("PH101").unwrap().display_name, "PH101");
    }

    #[test]
    fn test_listed_details_dedup_by_code() {
        let details: WireSubjectDetails = serde_json::from_value(json!([
            {"courseCode": "CS101", "courseName": "Programming", "teacher": {"user": {"name": "Alice"}}},
            {"code": "CS101", "name": "Programming (copy)", "teacherName": "Eve"},
            {"courseName": "Seminar"}
        ]))
        .unwrap();

        let catalog = catalog_from_wire(Some(details));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("CS101").unwrap().teachers, vec!["Alice"]);
        assert!(catalog.get("Seminar").unwrap().teachers.is_empty());
    }

    #[test]
    fn test_missing_details_give_empty_catalog() {
        let details: Option<WireSubjectDetails> = serde_json::from_str("null").unwrap();
        assert!(catalog_from_wire(details).is_empty());

        let details: WireSubjectDetails = serde_json::from_value(json!({
            "CS101": null,
            "MA101": "not a detail",
            "PH101": {"subjectName": "Physics"}
        }))
        .unwrap();
        let catalog = catalog_from_wire(Some(details));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("CS101").unwrap().display_name, "CS101");
        assert!(!catalog.contains("MA101"));
        assert_eq!(catalog.get("PH101").unwrap().display_name, "Physics");
    }

    #[test]
    fn test_listings_skip_malformed_records() {
        let records = serde_json::from_value(json!([
            {"id": 1, "user": {"name": "Alice"}},
            "stray",
            {"id": 2, "name": "Bob"}
        ]))
        .unwrap();
        let teachers = records_from_wire::<WireTeacher>(records, "teacher");
        let names = teachers
            .into_iter()
            .map(|teacher| teacher.into_teacher().name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["Alice", "Bob"]);

        assert!(records_from_wire::<WireCourse>(None, "course").is_empty());
    }

    #[test]
    fn test_personal_entries() {
        let entries = serde_json::from_value(json!([
            {
                "id": "e1",
                "userId": "u1",
                "courseName": "Programming",
                "courseCode": "CS101",
                "dayOfWeek": "MONDAY",
                "startTime": "09:00",
                "endTime": "10:00",
                "type": "LAB"
            },
            {"id": "e2", "courseName": "Missing fields"}
        ]))
        .unwrap();

        let timetable = entries_from_wire(entries);
        assert_eq!(timetable.entries().len(), 1);
        assert_eq!(timetable.entries()[0].owner_id.as_deref(), Some("u1"));
        assert!(entries_from_wire(None).entries().is_empty());
    }

    #[test]
    fn test_teacher_and_course_records() {
        let teacher: WireTeacher = serde_json::from_value(json!({
            "id": 7,
            "user": {"name": "Alice", "email": "alice@college.edu"},
            "department": {"name": "CSE"}
        }))
        .unwrap();
        let teacher = teacher.into_teacher();
        assert_eq!(teacher.id, "7");
        assert_eq!(teacher.name, "Alice");
        assert_eq!(teacher.department.as_deref(), Some("CSE"));
        assert_eq!(teacher.email.as_deref(), Some("alice@college.edu"));

        let nameless: WireTeacher = serde_json::from_value(json!({"id": "t2"})).unwrap();
        assert_eq!(nameless.into_teacher().name, UNKNOWN_TEACHER);

        let course: WireCourse = serde_json::from_value(json!({
            "id": "c1", "code": "MA101", "courseName": "Calculus", "credits": 4
        }))
        .unwrap();
        let subject = course.into_subject();
        assert_eq!(subject.code, "MA101");
        assert_eq!(subject.name, "Calculus");
        assert_eq!(subject.credits, Some(4.0));
    }

    #[test]
    fn test_wire_version_from_str() {
        assert_eq!(WireVersion::from_str("v2"), Ok(WireVersion::V2));
        assert_eq!(WireVersion::from_str(" 1 "), Ok(WireVersion::V1));
        assert!(WireVersion::from_str("3").is_err());
    }
}

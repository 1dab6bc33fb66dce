use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Badge color used when a subject has none or is unknown
pub const DEFAULT_SUBJECT_COLOR: &str = "#3b82f6";

/// Trims names, drops empty ones and keeps the first occurrence of each
pub(crate) fn normalize_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut unique: Vec<String> = Vec::new();

    for name in names {
        let name = name.as_ref().trim();
        if !name.is_empty() && !unique.iter().any(|seen| seen == name) {
            unique.push(name.to_string());
        }
    }

    unique
}

/// Splits a `+`-delimited teacher field into individual names
///
/// # Examples
/// `"Alice + Bob++Alice"` becomes `["Alice", "Bob"]`
pub fn parse_teacher_field(raw: &str) -> Vec<String> {
    normalize_names(raw.split('+'))
}

/// A member of the teacher directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub department: Option<String>,
    pub email: Option<String>,
}

/// A course offered for scheduling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub code: String,
    pub credits: Option<f32>,
}

/// Display and staffing details of a subject
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectDetail {
    pub display_name: String,
    /// Teachers historically associated with the subject
    pub teachers: Vec<String>,
    /// Rooms the subject can be held in, preferred first
    pub candidate_rooms: Vec<String>,
    pub display_color: Option<String>,
}

/// Subject details keyed by subject code, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubjectCatalog {
    entries: Vec<(String, SubjectDetail)>,
    #[serde(skip)]
    positions: HashMap<String, usize>,
}

impl SubjectCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subject unless its code is already present.
    ///
    /// # Returns
    /// `true` if the detail was stored, `false` if an earlier one was kept
    pub fn insert(&mut self, code: impl Into<String>, detail: SubjectDetail) -> bool {
        let code = code.into();
        if self.positions.contains_key(&code) {
            return false;
        }

        self.positions.insert(code.clone(), self.entries.len());
        self.entries.push((code, detail));
        true
    }

    pub fn get(&self, code: &str) -> Option<&SubjectDetail> {
        self.positions.get(code).map(|&idx| &self.entries[idx].1)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.positions.contains_key(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SubjectDetail)> {
        self.entries
            .iter()
            .map(|(code, detail)| (code.as_str(), detail))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Badge color for a subject, falling back to [`DEFAULT_SUBJECT_COLOR`]
    pub fn color_for(&self, code: &str) -> &str {
        self.get(code)
            .and_then(|detail| detail.display_color.as_deref())
            .unwrap_or(DEFAULT_SUBJECT_COLOR)
    }

    /// Preferred room for a subject, empty if unknown
    pub fn default_room(&self, code: &str) -> &str {
        self.get(code)
            .and_then(|detail| detail.candidate_rooms.first())
            .map_or("", String::as_str)
    }
}

impl FromIterator<(String, SubjectDetail)> for SubjectCatalog {
    fn from_iter<I: IntoIterator<Item = (String, SubjectDetail)>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for (code, detail) in iter {
            catalog.insert(code, detail);
        }
        catalog
    }
}

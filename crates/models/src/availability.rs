use crate::subject::{Subject, SubjectCatalog, Teacher, parse_teacher_field};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A course as offered in the selector's first step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseOption {
    pub code: String,
    pub name: String,
}

/// Which teachers have taught which course
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityIndex {
    course_to_teachers: HashMap<String, HashSet<String>>,
}

impl AvailabilityIndex {
    /// Builds the index from the teacher lists of a subject catalog.
    ///
    /// Each listed name is split again on `+`, so details whose teacher field
    /// was stored joined still index every name.
    pub fn build(catalog: &SubjectCatalog) -> Self {
        let course_to_teachers = catalog
            .iter()
            .map(|(code, detail)| {
                let teachers = detail
                    .teachers
                    .iter()
                    .flat_map(|field| parse_teacher_field(field))
                    .collect::<HashSet<_>>();

                (code.to_string(), teachers)
            })
            .collect();

        Self { course_to_teachers }
    }

    /// Names mapped to a course, if the course is known
    pub fn teachers_of(&self, course_code: &str) -> Option<&HashSet<String>> {
        self.course_to_teachers.get(course_code)
    }

    /// Filters the directory down to the teachers of a course, keeping
    /// directory order. Unknown courses yield nobody.
    pub fn teachers_for(&self, course_code: &str, directory: &[Teacher]) -> Vec<Teacher> {
        let Some(names) = self.teachers_of(course_code) else {
            return Vec::new();
        };

        directory
            .iter()
            .filter(|teacher| names.contains(&teacher.name))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.course_to_teachers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.course_to_teachers.is_empty()
    }
}

/// Course choices for the selector, one per subject code in catalog order
pub fn course_options(catalog: &SubjectCatalog) -> Vec<CourseOption> {
    catalog
        .iter()
        .map(|(code, detail)| CourseOption {
            code: code.to_string(),
            name: detail.display_name.clone(),
        })
        .collect()
}

/// Keeps the first subject seen for each code
pub fn dedup_subjects(subjects: impl IntoIterator<Item = Subject>) -> Vec<Subject> {
    let mut seen = HashSet::new();

    subjects
        .into_iter()
        .filter(|subject| seen.insert(subject.code.clone()))
        .collect()
}

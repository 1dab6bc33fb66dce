use crate::subject::SubjectCatalog;
use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Steps of the period selector dialog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SelectorStep {
    #[default]
    SelectCourse,
    SelectTeachers,
    EnterRoom,
}

impl Display for SelectorStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::SelectCourse => write!(f, "course selection"),
            Self::SelectTeachers => write!(f, "teacher selection"),
            Self::EnterRoom => write!(f, "room entry"),
        }
    }
}

/// What the selector hands back on submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub teachers: Vec<String>,
    pub course: String,
    pub room: String,
}

/// Reasons a selector action is refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    WrongStep {
        expected: SelectorStep,
        actual: SelectorStep,
    },
    NoCourseSelected,
    NoTeacherSelected,
    BlankRoom,
}

impl Display for SelectorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::WrongStep { expected, actual } => {
                write!(f, "Action belongs to {expected}, but the selector is at {actual}")
            }
            Self::NoCourseSelected => write!(f, "Select a course first"),
            Self::NoTeacherSelected => write!(f, "Select at least one teacher"),
            Self::BlankRoom => write!(f, "Room must not be blank"),
        }
    }
}

impl std::error::Error for SelectorError {}

/// Course, then teachers, then room.
///
/// Going back discards whatever the step being left had collected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorWorkflow {
    step: SelectorStep,
    course: Option<String>,
    teachers: Vec<String>,
    room: String,
}

impl SelectorWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> SelectorStep {
        self.step
    }

    pub fn course(&self) -> Option<&str> {
        self.course.as_deref()
    }

    pub fn teachers(&self) -> &[String] {
        &self.teachers
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    fn expect_step(&self, expected: SelectorStep) -> Result<(), SelectorError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(SelectorError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }

    /// Picks the course; a blank code clears the choice
    pub fn select_course(&mut self, code: &str) -> Result<(), SelectorError> {
        self.expect_step(SelectorStep::SelectCourse)?;

        let code = code.trim();
        self.course = (!code.is_empty()).then(|| code.to_string());
        Ok(())
    }

    /// Adds or removes a teacher.
    ///
    /// # Returns
    /// Whether the teacher is selected afterwards
    pub fn toggle_teacher(&mut self, name: &str) -> Result<bool, SelectorError> {
        self.expect_step(SelectorStep::SelectTeachers)?;

        let name = name.trim();
        if let Some(idx) = self.teachers.iter().position(|t| t == name) {
            self.teachers.remove(idx);
            Ok(false)
        } else if name.is_empty() {
            Ok(false)
        } else {
            self.teachers.push(name.to_string());
            Ok(true)
        }
    }

    /// Stores the room, trimmed
    pub fn set_room(&mut self, room: &str) -> Result<(), SelectorError> {
        self.expect_step(SelectorStep::EnterRoom)?;

        self.room = room.trim().to_string();
        Ok(())
    }

    /// Fills an empty room field with the course's preferred room.
    ///
    /// # Returns
    /// Whether a room was filled in
    pub fn suggest_room(&mut self, catalog: &SubjectCatalog) -> bool {
        if self.step != SelectorStep::EnterRoom || !self.room.is_empty() {
            return false;
        }

        let suggestion = self
            .course
            .as_deref()
            .map_or("", |code| catalog.default_room(code))
            .trim();
        if suggestion.is_empty() {
            return false;
        }

        self.room = suggestion.to_string();
        true
    }

    /// Moves forward once the current step is complete
    pub fn advance(&mut self) -> Result<SelectorStep, SelectorError> {
        self.step = match self.step {
            SelectorStep::SelectCourse if self.course.is_none() => {
                return Err(SelectorError::NoCourseSelected);
            }
            SelectorStep::SelectCourse => SelectorStep::SelectTeachers,
            SelectorStep::SelectTeachers if self.teachers.is_empty() => {
                return Err(SelectorError::NoTeacherSelected);
            }
            SelectorStep::SelectTeachers => SelectorStep::EnterRoom,
            SelectorStep::EnterRoom => {
                return Err(SelectorError::WrongStep {
                    expected: SelectorStep::SelectTeachers,
                    actual: SelectorStep::EnterRoom,
                });
            }
        };

        Ok(self.step)
    }

    /// Steps back, clearing the state of the step being left
    pub fn back(&mut self) -> SelectorStep {
        self.step = match self.step {
            SelectorStep::SelectCourse => SelectorStep::SelectCourse,
            SelectorStep::SelectTeachers => {
                self.teachers.clear();
                SelectorStep::SelectCourse
            }
            SelectorStep::EnterRoom => {
                self.room.clear();
                SelectorStep::SelectTeachers
            }
        };

        self.step
    }

    /// Drops every selection and returns to the first step
    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// Validates the final step without consuming the selection
    pub fn pending_selection(&self) -> Result<Selection, SelectorError> {
        self.expect_step(SelectorStep::EnterRoom)?;

        let course = self.course.clone().ok_or(SelectorError::NoCourseSelected)?;
        if self.teachers.is_empty() {
            return Err(SelectorError::NoTeacherSelected);
        }
        if self.room.is_empty() {
            return Err(SelectorError::BlankRoom);
        }

        Ok(Selection {
            teachers: self.teachers.clone(),
            course,
            room: self.room.clone(),
        })
    }

    /// Emits the selection and resets to the first step
    pub fn submit(&mut self) -> Result<Selection, SelectorError> {
        let selection = self.pending_selection()?;
        self.cancel();
        Ok(selection)
    }
}

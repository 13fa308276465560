//! Textbook entity.
//!
//! # Responsibility
//! - Represent one textbook owned by exactly one course.
//!
//! # Invariants
//! - Textbook is the owning side of the course/textbook relationship: the
//!   `textbook.course_id` foreign key is written from here.
//! - `course_id` is internal only and never serialized, so a serialized
//!   course can embed its textbooks without a cycle.

use crate::model::course::{Course, CourseId};
use crate::model::identity::{same_identity, EntityId};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Store-assigned textbook identifier.
pub type TextbookId = EntityId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Textbook {
    /// `None` until the first successful save.
    pub id: Option<TextbookId>,
    pub title: String,
    /// Owning course. Required by the store; `None` fails on save.
    #[serde(skip)]
    pub course_id: Option<CourseId>,
}

impl Textbook {
    /// Creates a textbook owned by `course`.
    ///
    /// The course must be persisted before the textbook is saved; an unsaved
    /// course leaves `course_id` unset and the save is rejected.
    pub fn new(title: impl Into<String>, course: &Course) -> Self {
        Self {
            id: None,
            title: title.into(),
            course_id: course.id,
        }
    }

    /// Creates a textbook pointing at a course by id only.
    pub fn for_course_id(title: impl Into<String>, course_id: CourseId) -> Self {
        Self {
            id: None,
            title: title.into(),
            course_id: Some(course_id),
        }
    }

    /// Creates a textbook with no owning course.
    pub fn unassigned(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            course_id: None,
        }
    }
}

impl PartialEq for Textbook {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, self.id, other, other.id)
    }
}

impl Eq for Textbook {}

impl Hash for Textbook {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

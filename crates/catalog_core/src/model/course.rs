//! Course entity.
//!
//! # Responsibility
//! - Own the course/topic association (rows in `course_topic` are written
//!   from the course side only).
//! - Carry the textbooks that reference this course once loaded.
//!
//! # Invariants
//! - `topics` has set semantics: a topic equal by identity is stored once.
//! - `textbooks` is a read-side projection; saving a course never writes
//!   textbook rows.

use crate::model::identity::{same_identity, EntityId};
use crate::model::textbook::Textbook;
use crate::model::topic::Topic;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Store-assigned course identifier.
pub type CourseId = EntityId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "CourseRecord")]
pub struct Course {
    /// `None` until the first successful save.
    pub id: Option<CourseId>,
    pub name: String,
    pub description: String,
    topics: Vec<Topic>,
    /// Textbooks referencing this course. Populated by eager loads only.
    pub textbooks: Vec<Textbook>,
}

/// Wire shape of a course; converted through `Course::with_topics` so
/// duplicate topics collapse on input.
#[derive(Deserialize)]
struct CourseRecord {
    id: Option<CourseId>,
    name: String,
    description: String,
    #[serde(default)]
    topics: Vec<Topic>,
    #[serde(default)]
    textbooks: Vec<Textbook>,
}

impl From<CourseRecord> for Course {
    fn from(record: CourseRecord) -> Self {
        let mut course = Course::with_topics(record.name, record.description, record.topics);
        course.id = record.id;
        course.textbooks = record.textbooks;
        course
    }
}

impl Course {
    /// Creates a not-yet-persisted course without topics.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            topics: Vec::new(),
            textbooks: Vec::new(),
        }
    }

    /// Creates a not-yet-persisted course filed under `topics`.
    ///
    /// Duplicate topics are collapsed.
    pub fn with_topics(
        name: impl Into<String>,
        description: impl Into<String>,
        topics: impl IntoIterator<Item = Topic>,
    ) -> Self {
        let mut course = Self::new(name, description);
        for topic in topics {
            course.add_topic(topic);
        }
        course
    }

    /// Associates `topic` with this course.
    ///
    /// Returns `false` when an equal topic is already associated.
    pub fn add_topic(&mut self, topic: Topic) -> bool {
        if self.topics.contains(&topic) {
            return false;
        }
        self.topics.push(topic);
        true
    }

    /// Drops the association with `topic`, returning whether it existed.
    pub fn remove_topic(&mut self, topic: &Topic) -> bool {
        let before = self.topics.len();
        self.topics.retain(|current| current != topic);
        self.topics.len() != before
    }

    /// Topics associated with this course, in no significant order.
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Returns whether `topic` is associated with this course.
    pub fn has_topic(&self, topic: &Topic) -> bool {
        self.topics.contains(topic)
    }
}

impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, self.id, other, other.id)
    }
}

impl Eq for Course {}

impl Hash for Course {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

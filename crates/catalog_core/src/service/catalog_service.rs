//! Catalog use-case service.
//!
//! # Responsibility
//! - Compose topic, course and textbook repositories into catalog use cases.
//! - Resolve ids supplied by callers into persisted entities before writes.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::course::{Course, CourseId};
use crate::model::textbook::Textbook;
use crate::model::topic::{Topic, TopicId};
use crate::repo::course_repo::CourseRepository;
use crate::repo::textbook_repo::TextbookRepository;
use crate::repo::topic_repo::TopicRepository;
use crate::repo::{EntityKind, RepoError, RepoResult};

/// Use-case service over the three catalog repositories.
pub struct CatalogService<T, C, B>
where
    T: TopicRepository,
    C: CourseRepository,
    B: TextbookRepository,
{
    topics: T,
    courses: C,
    textbooks: B,
}

impl<T, C, B> CatalogService<T, C, B>
where
    T: TopicRepository,
    C: CourseRepository,
    B: TextbookRepository,
{
    pub fn new(topics: T, courses: C, textbooks: B) -> Self {
        Self {
            topics,
            courses,
            textbooks,
        }
    }

    /// Creates and persists a topic.
    pub fn create_topic(&self, name: impl Into<String>) -> RepoResult<Topic> {
        self.topics.save(&Topic::new(name))
    }

    /// Lists all topics by name.
    pub fn topics(&self) -> RepoResult<Vec<Topic>> {
        self.topics.find_all()
    }

    /// Creates a course filed under the given existing topics.
    ///
    /// # Errors
    /// - `ReferentialIntegrity` when any id in `topic_ids` has no topic.
    pub fn create_course(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        topic_ids: &[TopicId],
    ) -> RepoResult<Course> {
        let mut course = Course::new(name, description);
        for &topic_id in topic_ids {
            let topic = self.topics.find_by_id(topic_id)?.ok_or_else(|| {
                RepoError::ReferentialIntegrity {
                    entity: EntityKind::Course,
                    detail: format!("topic {topic_id} does not exist"),
                    cause: None,
                }
            })?;
            course.add_topic(topic);
        }
        self.courses.save(&course)
    }

    /// Attaches a new textbook to an existing course.
    ///
    /// # Errors
    /// - `ReferentialIntegrity` when `course_id` has no course.
    pub fn add_textbook(
        &self,
        course_id: CourseId,
        title: impl Into<String>,
    ) -> RepoResult<Textbook> {
        self.textbooks
            .save(&Textbook::for_course_id(title, course_id))
    }

    /// Loads one course with topics and textbooks.
    pub fn course(&self, id: CourseId) -> RepoResult<Option<Course>> {
        self.courses.find_by_id(id)
    }

    /// Lists courses filed under one topic.
    pub fn courses_for_topic(&self, topic_id: TopicId) -> RepoResult<Vec<Course>> {
        self.courses.find_by_topics_id(topic_id)
    }

    /// Lists the whole catalog ordered by course name.
    pub fn catalog(&self) -> RepoResult<Vec<Course>> {
        self.courses.find_all_by_order_by_name_asc()
    }
}

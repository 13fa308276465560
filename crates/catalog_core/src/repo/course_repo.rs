//! Course repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist courses and the `course_topic` association they own.
//! - Answer the relationship-filtered and ordered course queries.
//!
//! # Invariants
//! - A course save rewrites its `course_topic` rows atomically; a failed
//!   save leaves no course row and no join rows behind.
//! - Saving a course never writes textbook rows.
//! - Relationship-filtered queries return each course at most once.
//! - Name ordering uses SQLite's default `BINARY` collation, ties by id.

use crate::db::with_savepoint;
use crate::model::course::{Course, CourseId};
use crate::model::topic::{Topic, TopicId};
use crate::repo::textbook_repo::load_textbooks_for_course;
use crate::repo::topic_repo::load_topics_for_course;
use crate::repo::{checked_id, ensure_connection_ready, EntityKind, RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Row};

const COURSE_SELECT_SQL: &str = "SELECT c.id, c.name, c.description FROM course c";

/// Repository interface for courses.
pub trait CourseRepository {
    /// Inserts a new course or updates a persisted one, replacing its topic
    /// associations with `course.topics()`.
    ///
    /// Every topic must already be persisted. Textbooks are not written.
    /// The returned course carries topics and textbooks as stored.
    fn save(&self, course: &Course) -> RepoResult<Course>;
    /// Loads one course with its topics and textbooks resolved.
    fn find_by_id(&self, id: CourseId) -> RepoResult<Option<Course>>;
    /// Loads only the course row; topics and textbooks stay empty.
    fn find_by_id_shallow(&self, id: CourseId) -> RepoResult<Option<Course>>;
    /// Lists courses associated with `topic`. An unsaved topic matches none.
    fn find_by_topics_contains(&self, topic: &Topic) -> RepoResult<Vec<Course>>;
    /// Lists courses associated with the topic identified by `topic_id`.
    fn find_by_topics_id(&self, topic_id: TopicId) -> RepoResult<Vec<Course>>;
    /// Lists every course ordered by name ascending.
    fn find_all_by_order_by_name_asc(&self) -> RepoResult<Vec<Course>>;
}

/// SQLite-backed course repository.
pub struct SqliteCourseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCourseRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["course", "course_topic", "topic", "textbook"])?;
        Ok(Self { conn })
    }

    fn load_many(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Course>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut courses = Vec::new();
        while let Some(row) = rows.next()? {
            let course = parse_course_row(row)?;
            courses.push(resolve_relations(self.conn, course)?);
        }
        Ok(courses)
    }
}

impl CourseRepository for SqliteCourseRepository<'_> {
    fn save(&self, course: &Course) -> RepoResult<Course> {
        let topic_ids = persisted_topic_ids(course)?;

        let id = with_savepoint(self.conn, "course_save", |conn| {
            let id = write_course_row(conn, course)?;
            conn.execute("DELETE FROM course_topic WHERE course_id = ?1;", [id])?;
            for topic_id in &topic_ids {
                conn.execute(
                    "INSERT OR IGNORE INTO course_topic (course_id, topic_id) VALUES (?1, ?2);",
                    params![id, topic_id],
                )
                .map_err(|err| dangling_topic_error(*topic_id, err))?;
            }
            Ok::<_, RepoError>(id)
        })?;

        debug!(
            "event=course_save module=repo status=ok course_id={} topic_count={}",
            id,
            topic_ids.len()
        );

        // Relations come back from the store, not from the caller's values.
        let mut saved = Course::new(course.name.clone(), course.description.clone());
        saved.id = Some(id);
        resolve_relations(self.conn, saved)
    }

    fn find_by_id(&self, id: CourseId) -> RepoResult<Option<Course>> {
        match self.find_by_id_shallow(id)? {
            Some(course) => Ok(Some(resolve_relations(self.conn, course)?)),
            None => Ok(None),
        }
    }

    fn find_by_id_shallow(&self, id: CourseId) -> RepoResult<Option<Course>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COURSE_SELECT_SQL} WHERE c.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_course_row(row)?));
        }

        Ok(None)
    }

    fn find_by_topics_contains(&self, topic: &Topic) -> RepoResult<Vec<Course>> {
        match topic.id {
            Some(topic_id) => self.find_by_topics_id(topic_id),
            None => Ok(Vec::new()),
        }
    }

    fn find_by_topics_id(&self, topic_id: TopicId) -> RepoResult<Vec<Course>> {
        // course_topic's primary key keeps each (course, topic) pair unique,
        // so the EXISTS filter cannot yield duplicates.
        self.load_many(
            &format!(
                "{COURSE_SELECT_SQL}
                 WHERE EXISTS (
                    SELECT 1
                    FROM course_topic ct
                    WHERE ct.course_id = c.id
                      AND ct.topic_id = ?1
                 )
                 ORDER BY c.id ASC;"
            ),
            [topic_id],
        )
    }

    fn find_all_by_order_by_name_asc(&self) -> RepoResult<Vec<Course>> {
        self.load_many(
            &format!("{COURSE_SELECT_SQL} ORDER BY c.name ASC, c.id ASC;"),
            [],
        )
    }
}

fn persisted_topic_ids(course: &Course) -> RepoResult<Vec<TopicId>> {
    course
        .topics()
        .iter()
        .map(|topic| {
            topic.id.ok_or_else(|| RepoError::ReferentialIntegrity {
                entity: EntityKind::Course,
                detail: format!("topic `{}` must be saved before the course", topic.name),
                cause: None,
            })
        })
        .collect()
}

fn dangling_topic_error(topic_id: TopicId, err: rusqlite::Error) -> RepoError {
    match RepoError::from_write(EntityKind::Course, err) {
        RepoError::ReferentialIntegrity { entity, cause, .. } => RepoError::ReferentialIntegrity {
            entity,
            detail: format!("topic {topic_id} does not exist"),
            cause,
        },
        other => other,
    }
}

fn write_course_row(conn: &Connection, course: &Course) -> RepoResult<CourseId> {
    match course.id {
        None => {
            conn.execute(
                "INSERT INTO course (name, description) VALUES (?1, ?2);",
                params![course.name, course.description],
            )
            .map_err(|err| RepoError::from_write(EntityKind::Course, err))?;
            Ok(conn.last_insert_rowid())
        }
        Some(id) => {
            let changed = conn
                .execute(
                    "UPDATE course SET name = ?2, description = ?3 WHERE id = ?1;",
                    params![id, course.name, course.description],
                )
                .map_err(|err| RepoError::from_write(EntityKind::Course, err))?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: EntityKind::Course,
                    id,
                });
            }
            Ok(id)
        }
    }
}

fn resolve_relations(conn: &Connection, mut course: Course) -> RepoResult<Course> {
    let Some(id) = course.id else {
        return Ok(course);
    };
    for topic in load_topics_for_course(conn, id)? {
        course.add_topic(topic);
    }
    course.textbooks = load_textbooks_for_course(conn, id)?;
    Ok(course)
}

fn parse_course_row(row: &Row<'_>) -> RepoResult<Course> {
    let mut course = Course::new(
        row.get::<_, String>("name")?,
        row.get::<_, String>("description")?,
    );
    course.id = Some(checked_id(EntityKind::Course, row.get("id")?)?);
    Ok(course)
}

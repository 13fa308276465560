//! Topic repository contract and SQLite implementation.
//!
//! # Invariants
//! - Topic writes only touch the `topic` table; association rows belong to
//!   the course side.

use crate::model::course::CourseId;
use crate::model::topic::{Topic, TopicId};
use crate::repo::{checked_id, ensure_connection_ready, EntityKind, RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Row};

const TOPIC_SELECT_SQL: &str = "SELECT id, name FROM topic";

/// Repository interface for topics.
pub trait TopicRepository {
    /// Inserts a new topic or updates a persisted one.
    ///
    /// Returns the stored topic with its assigned id.
    fn save(&self, topic: &Topic) -> RepoResult<Topic>;
    /// Loads one topic by id.
    fn find_by_id(&self, id: TopicId) -> RepoResult<Option<Topic>>;
    /// Lists every topic ordered by name.
    fn find_all(&self) -> RepoResult<Vec<Topic>>;
}

/// SQLite-backed topic repository.
pub struct SqliteTopicRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTopicRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["topic"])?;
        Ok(Self { conn })
    }
}

impl TopicRepository for SqliteTopicRepository<'_> {
    fn save(&self, topic: &Topic) -> RepoResult<Topic> {
        let id = match topic.id {
            None => {
                self.conn
                    .execute("INSERT INTO topic (name) VALUES (?1);", [&topic.name])
                    .map_err(|err| RepoError::from_write(EntityKind::Topic, err))?;
                self.conn.last_insert_rowid()
            }
            Some(id) => {
                let changed = self
                    .conn
                    .execute(
                        "UPDATE topic SET name = ?2 WHERE id = ?1;",
                        params![id, topic.name],
                    )
                    .map_err(|err| RepoError::from_write(EntityKind::Topic, err))?;
                if changed == 0 {
                    return Err(RepoError::NotFound {
                        entity: EntityKind::Topic,
                        id,
                    });
                }
                id
            }
        };

        debug!("event=topic_save module=repo status=ok topic_id={id}");
        Ok(Topic {
            id: Some(id),
            name: topic.name.clone(),
        })
    }

    fn find_by_id(&self, id: TopicId) -> RepoResult<Option<Topic>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TOPIC_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_topic_row(row)?));
        }

        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<Topic>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TOPIC_SELECT_SQL} ORDER BY name ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut topics = Vec::new();
        while let Some(row) = rows.next()? {
            topics.push(parse_topic_row(row)?);
        }
        Ok(topics)
    }
}

/// Loads the topics associated with one course, in id order.
pub(crate) fn load_topics_for_course(
    conn: &Connection,
    course_id: CourseId,
) -> RepoResult<Vec<Topic>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name
         FROM topic t
         INNER JOIN course_topic ct ON ct.topic_id = t.id
         WHERE ct.course_id = ?1
         ORDER BY t.id ASC;",
    )?;
    let mut rows = stmt.query([course_id])?;
    let mut topics = Vec::new();
    while let Some(row) = rows.next()? {
        topics.push(parse_topic_row(row)?);
    }
    Ok(topics)
}

fn parse_topic_row(row: &Row<'_>) -> RepoResult<Topic> {
    Ok(Topic {
        id: Some(checked_id(EntityKind::Topic, row.get("id")?)?),
        name: row.get("name")?,
    })
}

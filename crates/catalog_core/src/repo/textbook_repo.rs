//! Textbook repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist textbooks independently of their course (no cascade from the
//!   course side).
//! - Own the `textbook.course_id` foreign key.
//!
//! # Invariants
//! - A textbook without an existing owning course is never written.

use crate::model::course::CourseId;
use crate::model::textbook::{Textbook, TextbookId};
use crate::repo::{checked_id, ensure_connection_ready, EntityKind, RepoError, RepoResult};
use log::{debug, warn};
use rusqlite::{params, Connection, Row};

const TEXTBOOK_SELECT_SQL: &str = "SELECT id, title, course_id FROM textbook";

/// Repository interface for textbooks.
pub trait TextbookRepository {
    /// Inserts a new textbook or updates a persisted one.
    ///
    /// Fails with `ReferentialIntegrity` when the owning course is unset or
    /// does not exist.
    fn save(&self, textbook: &Textbook) -> RepoResult<Textbook>;
    /// Loads one textbook by id, including its owning course id.
    fn find_by_id(&self, id: TextbookId) -> RepoResult<Option<Textbook>>;
    /// Lists textbooks owned by one course.
    fn find_by_course_id(&self, course_id: CourseId) -> RepoResult<Vec<Textbook>>;
}

/// SQLite-backed textbook repository.
pub struct SqliteTextbookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTextbookRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["course", "textbook"])?;
        Ok(Self { conn })
    }
}

impl TextbookRepository for SqliteTextbookRepository<'_> {
    fn save(&self, textbook: &Textbook) -> RepoResult<Textbook> {
        let Some(course_id) = textbook.course_id else {
            warn!("event=textbook_save module=repo status=error error_code=missing_course");
            return Err(RepoError::ReferentialIntegrity {
                entity: EntityKind::Textbook,
                detail: "textbook has no owning course".to_string(),
                cause: None,
            });
        };

        let id = match textbook.id {
            None => {
                self.conn
                    .execute(
                        "INSERT INTO textbook (title, course_id) VALUES (?1, ?2);",
                        params![textbook.title, course_id],
                    )
                    .map_err(|err| write_error(course_id, err))?;
                self.conn.last_insert_rowid()
            }
            Some(id) => {
                let changed = self
                    .conn
                    .execute(
                        "UPDATE textbook SET title = ?2, course_id = ?3 WHERE id = ?1;",
                        params![id, textbook.title, course_id],
                    )
                    .map_err(|err| write_error(course_id, err))?;
                if changed == 0 {
                    return Err(RepoError::NotFound {
                        entity: EntityKind::Textbook,
                        id,
                    });
                }
                id
            }
        };

        debug!(
            "event=textbook_save module=repo status=ok textbook_id={} course_id={}",
            id, course_id
        );
        Ok(Textbook {
            id: Some(id),
            title: textbook.title.clone(),
            course_id: Some(course_id),
        })
    }

    fn find_by_id(&self, id: TextbookId) -> RepoResult<Option<Textbook>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TEXTBOOK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_textbook_row(row)?));
        }

        Ok(None)
    }

    fn find_by_course_id(&self, course_id: CourseId) -> RepoResult<Vec<Textbook>> {
        load_textbooks_for_course(self.conn, course_id)
    }
}

/// Loads the textbooks that reference one course, in id order.
pub(crate) fn load_textbooks_for_course(
    conn: &Connection,
    course_id: CourseId,
) -> RepoResult<Vec<Textbook>> {
    let mut stmt = conn.prepare(&format!(
        "{TEXTBOOK_SELECT_SQL} WHERE course_id = ?1 ORDER BY id ASC;"
    ))?;
    let mut rows = stmt.query([course_id])?;
    let mut textbooks = Vec::new();
    while let Some(row) = rows.next()? {
        textbooks.push(parse_textbook_row(row)?);
    }
    Ok(textbooks)
}

fn write_error(course_id: CourseId, err: rusqlite::Error) -> RepoError {
    match RepoError::from_write(EntityKind::Textbook, err) {
        RepoError::ReferentialIntegrity { entity, cause, .. } => {
            warn!(
                "event=textbook_save module=repo status=error error_code=dangling_course course_id={course_id}"
            );
            RepoError::ReferentialIntegrity {
                entity,
                detail: format!("course {course_id} does not exist"),
                cause,
            }
        }
        other => other,
    }
}

fn parse_textbook_row(row: &Row<'_>) -> RepoResult<Textbook> {
    Ok(Textbook {
        id: Some(checked_id(EntityKind::Textbook, row.get("id")?)?),
        title: row.get("title")?,
        course_id: Some(checked_id(EntityKind::Course, row.get("course_id")?)?),
    })
}

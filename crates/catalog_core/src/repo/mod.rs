//! Repository contracts and SQLite implementations for catalog entities.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity.
//! - Keep SQL and relationship mapping inside the persistence boundary.
//!
//! # Invariants
//! - Single-entity lookups report absence as `Ok(None)`; collection queries
//!   report it as an empty `Vec`.
//! - Engine failures propagate with their cause preserved; foreign-key
//!   failures surface as [`RepoError::ReferentialIntegrity`].

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::identity::EntityId;
use rusqlite::{Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod course_repo;
pub mod textbook_repo;
pub mod topic_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Catalog entity named in repository errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Topic,
    Course,
    Textbook,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Topic => "topic",
            Self::Course => "course",
            Self::Textbook => "textbook",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from catalog repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Update targeted an id with no row.
    NotFound { entity: EntityKind, id: EntityId },
    /// A relationship points at a record that is missing or not persisted.
    ReferentialIntegrity {
        entity: EntityKind,
        detail: String,
        cause: Option<DbError>,
    },
    /// Any other store constraint rejected the write.
    ConstraintViolation(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Persisted data cannot be converted to a valid entity.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::ReferentialIntegrity { entity, detail, .. } => {
                write!(f, "{entity} violates referential integrity: {detail}")
            }
            Self::ConstraintViolation(err) => write!(f, "constraint violation: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "catalog repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "catalog repository requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::ReferentialIntegrity {
                cause: Some(err), ..
            } => Some(err),
            Self::ConstraintViolation(err) => Some(err),
            Self::NotFound { .. }
            | Self::ReferentialIntegrity { cause: None, .. }
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl RepoError {
    /// Classifies a failed write statement.
    ///
    /// Foreign-key failures become `ReferentialIntegrity`, other constraint
    /// failures `ConstraintViolation`; everything else stays `Db`.
    pub(crate) fn from_write(entity: EntityKind, err: rusqlite::Error) -> Self {
        let extended_code = match &err {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                failure.extended_code
            }
            _ => return Self::from(err),
        };

        if extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY {
            Self::ReferentialIntegrity {
                entity,
                detail: "referenced row does not exist".to_string(),
                cause: Some(DbError::Sqlite(err)),
            }
        } else {
            Self::ConstraintViolation(DbError::Sqlite(err))
        }
    }
}

/// Rejects connections that have not been opened through `db::open_db*`.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    tables: &[&'static str],
) -> RepoResult<()> {
    let actual_version = current_version(conn)?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &table in tables {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

/// Validates an id read back from the store.
pub(crate) fn checked_id(entity: EntityKind, value: i64) -> RepoResult<EntityId> {
    if value <= 0 {
        return Err(RepoError::InvalidData(format!(
            "non-positive id `{value}` in {entity}.id"
        )));
    }
    Ok(value)
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

//! Course catalog core: topics, courses and textbooks over SQLite.
//!
//! Entities live in [`model`], persistence contracts and their SQLite
//! implementations in [`repo`], connection bootstrap and write scoping in
//! [`db`].

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult, UnitOfWork};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::course::{Course, CourseId};
pub use model::textbook::{Textbook, TextbookId};
pub use model::topic::{Topic, TopicId};
pub use repo::course_repo::{CourseRepository, SqliteCourseRepository};
pub use repo::textbook_repo::{SqliteTextbookRepository, TextbookRepository};
pub use repo::topic_repo::{SqliteTopicRepository, TopicRepository};
pub use repo::{EntityKind, RepoError, RepoResult};
pub use service::catalog_service::CatalogService;

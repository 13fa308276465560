//! Command-line front end for the course catalog.
//!
//! # Responsibility
//! - Map subcommands onto `CatalogService` use cases.
//! - Print results as JSON; textbooks never carry their course pointer.

use catalog_core::{
    default_log_level, init_logging, open_db, CatalogService, CourseId, SqliteCourseRepository,
    SqliteTextbookRepository, SqliteTopicRepository, TopicId,
};
use clap::{Parser, Subcommand};
use log::info;
use serde_json::Value;
use std::error::Error;
use std::path::PathBuf;

/// Course catalog command-line client
#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(version, about = "Manage topics, courses and textbooks")]
struct Args {
    /// SQLite database file
    #[arg(long, env = "CATALOG_DB", default_value = "catalog.sqlite3")]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error); needs a log directory
    #[arg(long, env = "CATALOG_LOG_LEVEL", requires = "log_dir")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "CATALOG_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a topic
    AddTopic { name: String },
    /// Create a course filed under existing topics
    AddCourse {
        name: String,
        description: String,
        /// Topic id to associate; repeatable
        #[arg(long = "topic")]
        topics: Vec<TopicId>,
    },
    /// Attach a textbook to an existing course
    AddTextbook { course_id: CourseId, title: String },
    /// List topics by name
    Topics,
    /// List courses by name
    Courses,
    /// Show one course with its topics and textbooks
    Course { id: CourseId },
    /// List courses filed under a topic
    CoursesForTopic { topic_id: TopicId },
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = args.log_dir.as_deref() {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let conn = open_db(&args.db)?;
    let service = CatalogService::new(
        SqliteTopicRepository::try_new(&conn)?,
        SqliteCourseRepository::try_new(&conn)?,
        SqliteTextbookRepository::try_new(&conn)?,
    );

    let output = match args.command {
        Command::AddTopic { name } => serde_json::to_value(service.create_topic(name)?)?,
        Command::AddCourse {
            name,
            description,
            topics,
        } => serde_json::to_value(service.create_course(name, description, &topics)?)?,
        Command::AddTextbook { course_id, title } => {
            serde_json::to_value(service.add_textbook(course_id, title)?)?
        }
        Command::Topics => serde_json::to_value(service.topics()?)?,
        Command::Courses => serde_json::to_value(service.catalog()?)?,
        Command::Course { id } => match service.course(id)? {
            Some(course) => serde_json::to_value(course)?,
            None => return Err(format!("course {id} not found").into()),
        },
        Command::CoursesForTopic { topic_id } => {
            serde_json::to_value(service.courses_for_topic(topic_id)?)?
        }
    };

    info!("event=cli_command module=cli status=ok");
    print_json(&output)
}

fn print_json(value: &Value) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn add_course_collects_repeated_topic_flags() {
        let args = Args::try_parse_from([
            "catalog",
            "--db",
            "test.db",
            "add-course",
            "OO",
            "objects",
            "--topic",
            "1",
            "--topic",
            "2",
        ])
        .unwrap();

        assert_eq!(args.db, PathBuf::from("test.db"));
        match args.command {
            Command::AddCourse {
                name,
                description,
                topics,
            } => {
                assert_eq!(name, "OO");
                assert_eq!(description, "objects");
                assert_eq!(topics, vec![1, 2]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn log_level_without_log_dir_is_rejected() {
        let argv = ["catalog", "--log-level", "debug", "topics"];
        let err = Args::try_parse_from(argv).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn log_level_is_accepted_with_log_dir() {
        let args = Args::try_parse_from([
            "catalog",
            "--log-level",
            "debug",
            "--log-dir",
            "/tmp/catalog-logs",
            "courses-for-topic",
            "3",
        ])
        .unwrap();

        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.log_dir.as_deref(), Some("/tmp/catalog-logs"));
        assert!(matches!(args.command, Command::CoursesForTopic { topic_id: 3 }));
    }

    #[test]
    fn non_numeric_course_id_is_rejected() {
        let argv = ["catalog", "course", "abc"];
        let err = Args::try_parse_from(argv).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }
}

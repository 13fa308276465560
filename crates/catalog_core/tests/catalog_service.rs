use catalog_core::db::open_db_in_memory;
use catalog_core::{
    CatalogService, EntityKind, RepoError, SqliteCourseRepository, SqliteTextbookRepository,
    SqliteTopicRepository,
};
use rusqlite::Connection;

type SqliteCatalog<'conn> = CatalogService<
    SqliteTopicRepository<'conn>,
    SqliteCourseRepository<'conn>,
    SqliteTextbookRepository<'conn>,
>;

fn service(conn: &Connection) -> SqliteCatalog<'_> {
    CatalogService::new(
        SqliteTopicRepository::try_new(conn).unwrap(),
        SqliteCourseRepository::try_new(conn).unwrap(),
        SqliteTextbookRepository::try_new(conn).unwrap(),
    )
}

#[test]
fn builds_and_reads_back_a_catalog() {
    let conn = open_db_in_memory().unwrap();
    let catalog = service(&conn);

    let java = catalog.create_topic("java").unwrap();
    let ruby = catalog.create_topic("ruby").unwrap();
    let java_id = java.id.unwrap();
    let ruby_id = ruby.id.unwrap();

    let scripting = catalog
        .create_course("Scripting Languages", "dynamic languages", &[ruby_id])
        .unwrap();
    let topic_ids = [java_id, ruby_id, java_id];
    let oo = catalog
        .create_course("OO Languages", "objects everywhere", &topic_ids)
        .unwrap();
    assert_eq!(oo.topics().len(), 2);

    let oo_id = oo.id.unwrap();
    let book = catalog.add_textbook(oo_id, "Design Patterns").unwrap();

    let listed = catalog.catalog().unwrap();
    assert_eq!(listed, vec![oo.clone(), scripting.clone()]);
    assert_eq!(listed[0].textbooks, vec![book]);

    assert_eq!(catalog.courses_for_topic(java_id).unwrap(), vec![oo.clone()]);
    let for_ruby = catalog.courses_for_topic(ruby_id).unwrap();
    assert_eq!(for_ruby.len(), 2);
    assert!(for_ruby.contains(&oo) && for_ruby.contains(&scripting));

    let names: Vec<String> = catalog
        .topics()
        .unwrap()
        .into_iter()
        .map(|topic| topic.name)
        .collect();
    assert_eq!(names, vec!["java", "ruby"]);
}

#[test]
fn create_course_rejects_unknown_topic_ids() {
    let conn = open_db_in_memory().unwrap();
    let catalog = service(&conn);

    let result = catalog.create_course("OO Languages", "description", &[404]);
    let err = result.unwrap_err();
    assert!(matches!(
        err,
        RepoError::ReferentialIntegrity {
            entity: EntityKind::Course,
            ..
        }
    ));
    assert!(catalog.catalog().unwrap().is_empty());
}

#[test]
fn add_textbook_rejects_unknown_course() {
    let conn = open_db_in_memory().unwrap();
    let catalog = service(&conn);

    let err = catalog.add_textbook(404, "orphan").unwrap_err();
    assert!(matches!(
        err,
        RepoError::ReferentialIntegrity {
            entity: EntityKind::Textbook,
            ..
        }
    ));
}

#[test]
fn course_lookup_reports_absence_as_none() {
    let conn = open_db_in_memory().unwrap();
    let catalog = service(&conn);

    assert!(catalog.course(1).unwrap().is_none());
    assert!(catalog.courses_for_topic(1).unwrap().is_empty());
}

#[test]
fn course_json_embeds_textbooks_without_back_reference() {
    let conn = open_db_in_memory().unwrap();
    let catalog = service(&conn);

    let java = catalog.create_topic("java").unwrap();
    let topic_ids = [java.id.unwrap()];
    let course = catalog
        .create_course("Adv Java", "description", &topic_ids)
        .unwrap();
    let course_id = course.id.unwrap();
    catalog.add_textbook(course_id, "Effective Java").unwrap();

    let loaded = catalog.course(course_id).unwrap().unwrap();
    let json = serde_json::to_value(&loaded).unwrap();

    assert_eq!(json["id"], course_id);
    assert_eq!(json["topics"][0]["name"], "java");
    assert_eq!(json["textbooks"][0]["title"], "Effective Java");
    let textbook = json["textbooks"][0].as_object().unwrap();
    let textbook_fields: Vec<&String> = textbook.keys().collect();
    assert_eq!(textbook_fields, vec!["id", "title"]);
}

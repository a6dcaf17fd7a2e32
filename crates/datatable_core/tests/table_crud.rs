use datatable_core::db::open_db_in_memory;
use datatable_core::{
    is_valid_record_id, EntityKind, ModelValidationError, ServiceError, SqliteTableRepository,
    TableRepository, TableService,
};
use uuid::Uuid;

fn setup() -> rusqlite::Connection {
    open_db_in_memory().unwrap()
}

#[test]
fn create_then_get_returns_same_table() {
    let conn = setup();
    let service = TableService::new(SqliteTableRepository::try_new(&conn).unwrap());

    let created = service.create_table("Inventory").unwrap();
    assert!(is_valid_record_id(&created.id.to_string()));
    assert_eq!(created.name, "Inventory");
    assert!(created.created_at > 0);
    assert_eq!(created.created_at, created.updated_at);

    let loaded = service.get_table(created.id).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_trims_name() {
    let conn = setup();
    let service = TableService::new(SqliteTableRepository::try_new(&conn).unwrap());

    let created = service.create_table("  Projects \n").unwrap();
    assert_eq!(created.name, "Projects");
}

#[test]
fn blank_name_is_rejected_without_creating_records() {
    let conn = setup();
    let service = TableService::new(SqliteTableRepository::try_new(&conn).unwrap());

    for name in ["", "   "] {
        let err = service.create_table(name).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ModelValidationError::BlankTableName)
        ));
    }
    assert!(service.list_tables().unwrap().is_empty());
}

#[test]
fn repository_rejects_blank_name_too() {
    let conn = setup();
    let repo = SqliteTableRepository::try_new(&conn).unwrap();

    let err = repo.create_table(" ").unwrap_err();
    assert!(matches!(err, datatable_core::RepoError::Validation(_)));
}

#[test]
fn list_returns_newest_first() {
    let conn = setup();
    let service = TableService::new(SqliteTableRepository::try_new(&conn).unwrap());

    let first = service.create_table("first").unwrap();
    let second = service.create_table("second").unwrap();
    let third = service.create_table("third").unwrap();

    let ids: Vec<_> = service
        .list_tables()
        .unwrap()
        .into_iter()
        .map(|table| table.id)
        .collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[test]
fn get_unknown_id_is_not_found() {
    let conn = setup();
    let service = TableService::new(SqliteTableRepository::try_new(&conn).unwrap());

    let missing = Uuid::new_v4();
    let err = service.get_table(missing).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound { entity: EntityKind::Table, id } if id == missing
    ));
}

#[test]
fn rename_replaces_name_and_keeps_identity() {
    let conn = setup();
    let service = TableService::new(SqliteTableRepository::try_new(&conn).unwrap());

    let created = service.create_table("Draft").unwrap();
    let renamed = service.rename_table(created.id, " Final ").unwrap();
    assert_eq!(renamed.id, created.id);
    assert_eq!(renamed.name, "Final");
    assert_eq!(renamed.created_at, created.created_at);
    assert!(renamed.updated_at >= created.updated_at);

    let err = service.rename_table(created.id, "").unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let err = service.rename_table(Uuid::new_v4(), "Other").unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
}

#[test]
fn delete_returns_table_and_then_reports_not_found() {
    let conn = setup();
    let service = TableService::new(SqliteTableRepository::try_new(&conn).unwrap());

    let created = service.create_table("Temp").unwrap();
    let deleted = service.delete_table(created.id).unwrap();
    assert_eq!(deleted, created);

    assert!(matches!(
        service.get_table(created.id).unwrap_err(),
        ServiceError::NotFound { .. }
    ));
    assert!(matches!(
        service.delete_table(created.id).unwrap_err(),
        ServiceError::NotFound { .. }
    ));
}

use extdb_core::database::ExternalDatabase;
use extdb_locator::require_database;
use extdb_oracle::{create_connection, create_data_source, ddl, HELLO_QUERY};
use pretty_assertions::assert_eq;
use serial_test::serial;

mod common;

#[test]
#[serial]
fn test_oracle_open_connection_and_execute_query() {
    let db = ExternalDatabase::from(require_database!(common::oracle()));
    let conn = create_connection(&db).unwrap();

    let hello = conn.query_row_as::<String>(HELLO_QUERY, &[]).unwrap();

    assert_eq!(hello, "Hello, Oracle");
}

#[test]
#[serial]
fn test_oracle_data_source_checkout() {
    let db = ExternalDatabase::from(require_database!(common::oracle()));
    let data_source = create_data_source(&db).unwrap();

    let conn = data_source.get().unwrap();
    let dummy = conn
        .query_row_as::<String>("SELECT * FROM DUAL", &[])
        .unwrap();

    assert_eq!(dummy, "X");
}

#[test]
#[serial]
fn test_oracle_create_legoset_table() {
    let db = ExternalDatabase::from(require_database!(common::oracle()));
    let conn = create_connection(&db).unwrap();

    let _ = conn.execute(ddl::DROP_TABLE_LEGOSET, &[]);
    conn.execute(ddl::CREATE_TABLE_LEGOSET_WITH_ID_GENERATION, &[])
        .unwrap();
    conn.execute(
        "INSERT INTO legoset (name, manual) VALUES (:1, :2)",
        &[&"SCHAUFELRADBAGGER", &12],
    )
    .unwrap();
    conn.commit().unwrap();

    let (id, name) = conn
        .query_row_as::<(i64, String)>("SELECT id, name FROM legoset", &[])
        .unwrap();
    conn.execute(ddl::DROP_TABLE_LEGOSET, &[]).unwrap();

    assert_eq!(id, 1);
    assert_eq!(name, "SCHAUFELRADBAGGER");
}

#[test]
#[serial]
fn test_oracle_database_is_stable() {
    let first = common::oracle();
    let second = common::oracle();

    assert_eq!(first.is_unavailable(), second.is_unavailable());
    if !first.is_unavailable() {
        assert!(second.check_validity());
    }
}

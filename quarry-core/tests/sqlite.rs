use quarry_core::{
    op, ColumnValueSet, ConditionGroup, Connection, Database, DatabaseConfig, DbConnection, Error,
    IntoColumnValues, StatementOutcome, Value,
};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    id: i64,
    name: String,
    age: i64,
}

async fn setup() -> Database<DbConnection> {
    let mut db = Database::connect(&DatabaseConfig::sqlite_memory())
        .await
        .unwrap();
    db.connection_mut()
        .execute(
            "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, age INTEGER NOT NULL)",
            &[],
        )
        .await
        .unwrap();

    for (name, age) in [("Alice", 30), ("Bob", 17), ("Carol", 42)] {
        db.insert_into("users", [("name", Value::from(name)), ("age", Value::from(age))])
            .await
            .unwrap();
    }
    db
}

#[tokio::test]
async fn test_insert_returns_generated_id() {
    let mut db = setup().await;
    let id = db
        .insert_into("users", [("name", Value::from("Dave")), ("age", Value::from(25))])
        .await
        .unwrap();
    assert_eq!(id, Some(4));
}

#[tokio::test]
async fn test_declared_types_decode_by_storage_class() {
    let mut db = Database::connect(&DatabaseConfig::sqlite_memory())
        .await
        .unwrap();
    db.connection_mut()
        .execute(
            "CREATE TABLE readings (id INTEGER PRIMARY KEY, x REAL, flag BOOLEAN, price NUMERIC, \
             taken_at DATETIME, note TEXT, payload BLOB)",
            &[],
        )
        .await
        .unwrap();

    let id = db
        .insert_into(
            "readings",
            [
                ("x", Value::from(1.5)),
                ("flag", Value::from(true)),
                ("price", Value::from(9.5)),
                ("taken_at", Value::from("2024-01-02 03:04:05")),
                ("note", Value::Null),
                ("payload", Value::from(vec![1u8, 2, 3])),
            ],
        )
        .await
        .unwrap();
    assert_eq!(id, Some(1));

    let rows = db.select_from("readings", "*", None).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row["id"], Value::I64(1));
    assert_eq!(row["x"], Value::F64(1.5));
    assert_eq!(row["flag"].as_i64(), Some(1));
    assert_eq!(row["price"], Value::F64(9.5));
    assert_eq!(row["taken_at"], Value::from("2024-01-02 03:04:05"));
    assert_eq!(row["note"], Value::Null);
    assert_eq!(row["payload"], Value::Bytes(vec![1, 2, 3]));
}

#[tokio::test]
async fn test_connect_failure_reports_dsn() {
    let config = DatabaseConfig::new("sqlite", "", "/nonexistent_dir/app.db", "admin", "s3cret");

    let Err(err) = Database::connect(&config).await else {
        panic!("connecting to a missing directory should fail");
    };
    match &err {
        Error::Connection { dsn, .. } => {
            assert_eq!(dsn, "sqlite:host=;dbname=/nonexistent_dir/app.db");
        }
        other => panic!("expected a connection error, got {other:?}"),
    }
    assert!(!err.to_string().contains("s3cret"));
}

#[tokio::test]
async fn test_select_all_rows() {
    let mut db = setup().await;
    let rows = db.select_from("users", "*", None).await.unwrap();

    assert_eq!(rows.len(), 3);
    let columns: Vec<&str> = rows[0].keys().map(String::as_str).collect();
    assert_eq!(columns, ["id", "name", "age"]);
    assert_eq!(rows[0]["name"].as_str(), Some("Alice"));
    assert_eq!(rows[0]["age"].as_i64(), Some(30));
}

#[tokio::test]
async fn test_select_with_conditions() {
    let mut db = setup().await;
    let adults = ConditionGroup::new()
        .where_(("age", op::GTE, 18))
        .and_where(("name", op::NEQ, "Carol"));

    let rows = db.select_from("users", "name", Some(&adults)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], Value::from("Alice"));
}

#[tokio::test]
async fn test_condition_values_are_trimmed() {
    let mut db = setup().await;
    let group = ConditionGroup::new().where_(("name", "  Bob  "));

    let rows = db.select_from("users", "id, age", Some(&group)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["age"].as_i64(), Some(17));
}

#[tokio::test]
async fn test_hostile_value_is_bound_not_executed() {
    let mut db = setup().await;
    let group = ConditionGroup::new().where_(("name", "x' OR '1'='1"));

    let rows = db.select_from("users", "*", Some(&group)).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_select_from_as() {
    let mut db = setup().await;
    let group = ConditionGroup::new().where_(("name", op::LIKE, "C%"));

    let users: Vec<User> = db.select_from_as("users", "*", Some(&group)).await.unwrap();
    assert_eq!(
        users,
        vec![User {
            id: 3,
            name: "Carol".to_string(),
            age: 42,
        }]
    );
}

#[tokio::test]
async fn test_prepare_and_execute() {
    let mut db = setup().await;

    let params: ColumnValueSet = [("min", Value::from(20))].into_column_values();
    let outcome = db
        .prepare_and_execute("SELECT name FROM users WHERE age > :min", &params)
        .await
        .unwrap();
    match outcome {
        StatementOutcome::Rows(rows) => assert_eq!(rows.len(), 2),
        other => panic!("expected rows, got {other:?}"),
    }

    let params: ColumnValueSet =
        [("name", Value::from("Eve")), ("age", Value::from(51))].into_column_values();
    let outcome = db
        .prepare_and_execute("INSERT INTO users(name, age)VALUES(:name, :age)", &params)
        .await
        .unwrap();
    match outcome {
        StatementOutcome::Inserted(result) => {
            assert_eq!(result.rows_affected, 1);
            assert_eq!(result.last_insert_id, Some(4));
        }
        other => panic!("expected an insert result, got {other:?}"),
    }
}

#[tokio::test]
async fn test_database_errors_propagate() {
    let mut db = setup().await;
    let err = db.select_from("missing_table", "*", None).await.unwrap_err();
    assert!(matches!(err, Error::Database(_)));

    db.close().await.unwrap();
}

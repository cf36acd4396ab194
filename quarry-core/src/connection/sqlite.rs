//! SQLite backend

use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column, Row as _, Sqlite, SqliteConnection, TypeInfo, ValueRef};

use crate::executor::{Connection, ExecuteResult, Row};
use crate::params::Dialect;
use crate::{Result, Value};

impl Connection for SqliteConnection {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecuteResult> {
        let result = bind_values(sqlx::query(sql), params)
            .execute(&mut *self)
            .await?;
        Ok(ExecuteResult {
            rows_affected: result.rows_affected(),
            last_insert_id: Some(result.last_insert_rowid()),
        })
    }

    async fn fetch_all(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let rows = bind_values(sqlx::query(sql), params)
            .fetch_all(&mut *self)
            .await?;
        rows.iter().map(decode_row).collect()
    }

    async fn query(&mut self, sql: &str) -> Result<Vec<Row>> {
        // A bare &str executes as a simple, unprepared statement
        let rows = sqlx::Executor::fetch_all(&mut *self, sql).await?;
        rows.iter().map(decode_row).collect()
    }
}

/// Bind Quarry values to a SQLite query, in order
fn bind_values<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &[Value],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            Value::Null => query.bind(None::<i32>),
            Value::Bool(b) => query.bind(*b),
            Value::I32(i) => query.bind(*i),
            Value::I64(i) => query.bind(*i),
            Value::F64(f) => query.bind(*f),
            Value::String(s) => query.bind(s.clone()),
            Value::Bytes(b) => query.bind(b.clone()),
        };
    }
    query
}

fn decode_row(row: &SqliteRow) -> Result<Row> {
    let mut decoded = Row::with_capacity(row.columns().len());
    for column in row.columns() {
        let value = decode_value(row, column.ordinal())?;
        decoded.insert(column.name().to_string(), value);
    }
    Ok(decoded)
}

/// Decode by storage class, so declared types such as BOOLEAN, NUMERIC or
/// DATETIME come back as whatever SQLite actually stored.
fn decode_value(row: &SqliteRow, index: usize) -> Result<Value> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let value = match raw.type_info().name() {
        "INTEGER" => Value::I64(row.try_get(index)?),
        "REAL" => Value::F64(row.try_get(index)?),
        "BLOB" => Value::Bytes(row.try_get(index)?),
        _ => Value::String(row.try_get(index)?),
    };
    Ok(value)
}

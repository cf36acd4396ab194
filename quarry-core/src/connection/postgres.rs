//! PostgreSQL backend

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Column, PgConnection, Postgres, Row as _, TypeInfo, ValueRef};

use crate::executor::{Connection, ExecuteResult, Row};
use crate::params::Dialect;
use crate::{Error, Result, Value};

impl Connection for PgConnection {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecuteResult> {
        let result = bind_values(sqlx::query(sql), params)
            .execute(&mut *self)
            .await?;
        // Generated keys need RETURNING; the command tag carries none
        Ok(ExecuteResult {
            rows_affected: result.rows_affected(),
            last_insert_id: None,
        })
    }

    async fn fetch_all(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let rows = bind_values(sqlx::query(sql), params)
            .fetch_all(&mut *self)
            .await?;
        rows.iter().map(decode_row).collect()
    }

    async fn query(&mut self, sql: &str) -> Result<Vec<Row>> {
        let rows = sqlx::Executor::fetch_all(&mut *self, sql).await?;
        rows.iter().map(decode_row).collect()
    }
}

/// Bind Quarry values to a PostgreSQL query, in order
fn bind_values<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &[Value],
) -> Query<'q, Postgres, PgArguments> {
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

fn decode_row(row: &PgRow) -> Result<Row> {
    let mut decoded = Row::with_capacity(row.columns().len());
    for column in row.columns() {
        let value = decode_value(row, column.ordinal(), column.name())?;
        decoded.insert(column.name().to_string(), value);
    }
    Ok(decoded)
}

fn decode_value(row: &PgRow, index: usize, column: &str) -> Result<Value> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let value = match raw.type_info().name() {
        "BOOL" => Value::Bool(row.try_get(index)?),
        "INT2" => Value::I32(i32::from(row.try_get::<i16, _>(index)?)),
        "INT4" => Value::I32(row.try_get(index)?),
        "INT8" => Value::I64(row.try_get(index)?),
        "FLOAT4" => Value::F64(f64::from(row.try_get::<f32, _>(index)?)),
        "FLOAT8" => Value::F64(row.try_get(index)?),
        "BYTEA" => Value::Bytes(row.try_get(index)?),
        "TEXT" | "VARCHAR" | "CHAR" | "NAME" | "UNKNOWN" => Value::String(row.try_get(index)?),
        other => return Err(Error::unsupported_column_type(column, other)),
    };
    Ok(value)
}

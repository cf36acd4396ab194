//! MySQL / MariaDB backend

use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, MySql, MySqlConnection, Row as _, TypeInfo, ValueRef};

use crate::executor::{Connection, ExecuteResult, Row};
use crate::params::Dialect;
use crate::{Error, Result, Value};

impl Connection for MySqlConnection {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecuteResult> {
        let result = bind_values(sqlx::query(sql), params)
            .execute(&mut *self)
            .await?;
        // 0 means the table has no AUTO_INCREMENT column
        let last_insert_id = match result.last_insert_id() {
            0 => None,
            id => i64::try_from(id).ok(),
        };
        Ok(ExecuteResult {
            rows_affected: result.rows_affected(),
            last_insert_id,
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

/// Bind Quarry values to a MySQL query, in order
fn bind_values<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &[Value],
) -> Query<'q, MySql, MySqlArguments> {
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

fn decode_row(row: &MySqlRow) -> Result<Row> {
    let mut decoded = Row::with_capacity(row.columns().len());
    for column in row.columns() {
        let value = decode_value(row, column.ordinal(), column.name())?;
        decoded.insert(column.name().to_string(), value);
    }
    Ok(decoded)
}

fn decode_value(row: &MySqlRow, index: usize, column: &str) -> Result<Value> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let value = match raw.type_info().name() {
        "BOOLEAN" => Value::Bool(row.try_get(index)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" => Value::I32(row.try_get(index)?),
        "BIGINT" => Value::I64(row.try_get(index)?),
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED" => {
            Value::I64(i64::from(row.try_get::<u32, _>(index)?))
        }
        "BIGINT UNSIGNED" => {
            let n: u64 = row.try_get(index)?;
            i64::try_from(n).map_or_else(|_| Value::String(n.to_string()), Value::I64)
        }
        "FLOAT" => Value::F64(f64::from(row.try_get::<f32, _>(index)?)),
        "DOUBLE" => Value::F64(row.try_get(index)?),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            Value::Bytes(row.try_get(index)?)
        }
        // Text of any collation; DECIMAL and JSON arrive as text in both protocols
        "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET"
        | "DECIMAL" | "JSON" => Value::String(row.try_get_unchecked(index)?),
        other => return Err(Error::unsupported_column_type(column, other)),
    };
    Ok(value)
}

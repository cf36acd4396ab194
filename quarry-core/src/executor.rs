//! Statement execution over a single owned connection

use std::future::Future;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::builder::select::render_select;
use crate::builder::{ColumnValueSet, ConditionGroup, IntoColumnValues, QueryBuilder};
use crate::params::{bind_named, Dialect, PositionalQuery};
use crate::{Error, InsertBuilder, Result, Value};

/// One result row: column name -> value, in result-set order
pub type Row = IndexMap<String, Value>;

/// What a write reported back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecuteResult {
    pub rows_affected: u64,
    /// `None` for drivers that do not report generated ids (PostgreSQL)
    pub last_insert_id: Option<i64>,
}

/// Trait for the database handle a [`Database`] drives.
///
/// SQL handed to `execute` and `fetch_all` already uses the positional
/// placeholders of [`Connection::dialect`], with `params` in bind order.
pub trait Connection: Send {
    /// Placeholder syntax this connection expects
    fn dialect(&self) -> Dialect;

    /// Run a prepared statement that returns no rows
    fn execute(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<ExecuteResult>> + Send;

    /// Run a prepared statement and return every row
    fn fetch_all(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<Vec<Row>>> + Send;

    /// Run a parameterless statement without preparing it
    fn query(&mut self, sql: &str) -> impl Future<Output = Result<Vec<Row>>> + Send;
}

/// Result of [`Database::prepare_and_execute`], keyed by the statement verb
#[derive(Debug, Clone, PartialEq)]
pub enum StatementOutcome {
    Rows(Vec<Row>),
    Inserted(ExecuteResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Select,
    Insert,
}

impl Verb {
    fn as_str(&self) -> &'static str {
        match self {
            Verb::Select => "SELECT",
            Verb::Insert => "INSERT",
        }
    }
}

/// First whitespace-delimited token of the statement, matched case-sensitively.
fn statement_verb(sql: &str) -> Result<Verb> {
    match sql.split_whitespace().next() {
        Some("SELECT") => Ok(Verb::Select),
        Some("INSERT") => Ok(Verb::Insert),
        other => Err(Error::unsupported_statement(other.unwrap_or_default())),
    }
}

/// Insert/select component owning exactly one connection.
///
/// The connection lives as long as the `Database`; dropping it (or calling
/// [`Database::close`]) releases the handle.
pub struct Database<C> {
    conn: C,
}

impl<C: Connection> Database<C> {
    /// Wrap an already established connection
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.conn
    }

    /// Give the connection back to the caller
    pub fn into_inner(self) -> C {
        self.conn
    }

    /// Insert one record and return the id the driver generated for it.
    ///
    /// # Examples
    /// ```no_run
    /// # async fn demo() -> quarry_core::Result<()> {
    /// use quarry_core::{Database, DatabaseConfig, Value};
    ///
    /// let mut db = Database::connect(&DatabaseConfig::sqlite_memory()).await?;
    /// let id = db
    ///     .insert_into("users", [("name", Value::from("Alice")), ("age", Value::from(30))])
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn insert_into<T>(&mut self, table: &str, data: T) -> Result<Option<i64>>
    where
        T: IntoColumnValues,
    {
        let query = InsertBuilder::new(table).values(data).build()?;
        let result = self.prepared_write(&query.sql, &query.params).await?;
        Ok(result.last_insert_id)
    }

    /// Select `columns` from `table`, optionally filtered.
    ///
    /// Without conditions the statement runs unprepared and unbound; with
    /// conditions it is prepared and bound to the condition values.
    pub async fn select_from(
        &mut self,
        table: &str,
        columns: &str,
        conditions: Option<&ConditionGroup>,
    ) -> Result<Vec<Row>> {
        let empty = ConditionGroup::new();
        let group = conditions.unwrap_or(&empty);
        let query = render_select(table, columns, group)?;

        if !group.is_empty() {
            return self.prepared_rows(&query.sql, &query.params).await;
        }

        debug!(target: "quarry.sql", verb = "SELECT", sql = %query.sql, "direct query");
        self.conn
            .query(&query.sql)
            .await
            .map_err(|err| log_failure("SELECT", &query.sql, err))
    }

    /// Like [`Database::select_from`], mapping each row into `T` through JSON
    pub async fn select_from_as<T>(
        &mut self,
        table: &str,
        columns: &str,
        conditions: Option<&ConditionGroup>,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let rows = self.select_from(table, columns, conditions).await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let object: serde_json::Map<String, serde_json::Value> = row
                .iter()
                .map(|(column, value)| (column.clone(), value.to_json()))
                .collect();
            results.push(serde_json::from_value(serde_json::Value::Object(object))?);
        }
        Ok(results)
    }

    /// Prepare `sql`, bind the named `params` and run it.
    ///
    /// The statement kind comes from its first token: `SELECT` yields rows,
    /// `INSERT` yields the write result. Anything else is rejected before it
    /// reaches the connection.
    pub async fn prepare_and_execute(
        &mut self,
        sql: &str,
        params: &ColumnValueSet,
    ) -> Result<StatementOutcome> {
        match statement_verb(sql)? {
            Verb::Select => self.prepared_rows(sql, params).await.map(StatementOutcome::Rows),
            Verb::Insert => self
                .prepared_write(sql, params)
                .await
                .map(StatementOutcome::Inserted),
        }
    }

    async fn prepared_rows(&mut self, sql: &str, params: &ColumnValueSet) -> Result<Vec<Row>> {
        let positional = self.bind(Verb::Select, sql, params)?;
        self.conn
            .fetch_all(&positional.sql, &positional.params)
            .await
            .map_err(|err| log_failure("SELECT", &positional.sql, err))
    }

    async fn prepared_write(
        &mut self,
        sql: &str,
        params: &ColumnValueSet,
    ) -> Result<ExecuteResult> {
        let positional = self.bind(Verb::Insert, sql, params)?;
        self.conn
            .execute(&positional.sql, &positional.params)
            .await
            .map_err(|err| log_failure("INSERT", &positional.sql, err))
    }

    fn bind(&self, verb: Verb, sql: &str, params: &ColumnValueSet) -> Result<PositionalQuery> {
        let positional = bind_named(sql, params, self.conn.dialect())?;
        debug!(
            target: "quarry.sql",
            verb = verb.as_str(),
            param_count = positional.params.len(),
            sql = %positional.sql,
            "executing statement"
        );
        Ok(positional)
    }
}

fn log_failure(verb: &str, sql: &str, err: Error) -> Error {
    error!(target: "quarry.sql", verb, sql, error = %err, "statement failed");
    err
}

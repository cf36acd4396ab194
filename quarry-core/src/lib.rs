//! Quarry Core - a small data-access layer over a single SQL connection
//!
//! Builds parameterized INSERT and SELECT statements from table names, column
//! maps and condition groups, then runs them through a [`Connection`] with
//! every value bound as a parameter.

pub mod builder;
pub mod config;
pub mod connection;
pub mod error;
pub mod executor;
pub mod ident;
pub mod operator;
pub mod params;
pub mod value;

// Re-export main types
pub use builder::{
    stringify_columns, stringify_placeholders, ColumnValueSet, Condition, ConditionGroup,
    Connector, InsertBuilder, IntoColumnValues, IntoCondition, QueryBuilder, RenderedConditions,
    RenderedQuery, SelectBuilder,
};
pub use config::{DatabaseConfig, Driver};
pub use connection::DbConnection;
pub use error::{Error, Result};
pub use executor::{Connection, Database, ExecuteResult, Row, StatementOutcome};
pub use operator::{op, IntoOperator, Operator};
pub use params::{bind_named, Dialect, PositionalQuery};
pub use value::Value;

/// Create a SELECT builder for the given table
pub fn select(table: &str) -> SelectBuilder {
    SelectBuilder::new(table)
}

/// Create an INSERT builder for the given table
pub fn insert(table: &str) -> InsertBuilder {
    InsertBuilder::new(table)
}

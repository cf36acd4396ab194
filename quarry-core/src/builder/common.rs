//! Common types and traits shared across all query builders

use indexmap::IndexMap;

use crate::{Result, Value};

/// Ordered column name -> value mapping.
///
/// Insertion order is the order in which columns and placeholders are
/// rendered. The same type carries the named parameters of a rendered query.
pub type ColumnValueSet = IndexMap<String, Value>;

/// SQL text with `:name` placeholders plus the values bound to those names.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedQuery {
    pub sql: String,
    pub params: ColumnValueSet,
}

impl RenderedQuery {
    pub fn new(sql: impl Into<String>, params: ColumnValueSet) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Core trait for all query builders
pub trait QueryBuilder {
    /// Validate the builder and render SQL together with its named parameters
    fn build(&self) -> Result<RenderedQuery>;

    /// Generate the SQL query string
    fn to_sql(&self) -> Result<String> {
        self.build().map(|query| query.sql)
    }
}

/// `col0, col1, ...` for every key of the set, in order.
pub fn stringify_columns(values: &ColumnValueSet) -> String {
    values
        .keys()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `:col0, :col1, ...` for every key of the set, in order.
pub fn stringify_placeholders(values: &ColumnValueSet) -> String {
    values
        .keys()
        .map(|column| format!(":{column}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Trait for types that can be converted to an ordered column/value set
pub trait IntoColumnValues {
    fn into_column_values(self) -> ColumnValueSet;
}

impl IntoColumnValues for ColumnValueSet {
    fn into_column_values(self) -> ColumnValueSet {
        self
    }
}

impl<K, V> IntoColumnValues for Vec<(K, V)>
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_column_values(self) -> ColumnValueSet {
        self.into_iter()
            .map(|(column, value)| (column.into(), value.into()))
            .collect()
    }
}

impl<K, V, const N: usize> IntoColumnValues for [(K, V); N]
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_column_values(self) -> ColumnValueSet {
        self.into_iter()
            .map(|(column, value)| (column.into(), value.into()))
            .collect()
    }
}

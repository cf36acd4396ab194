//! INSERT query builder

use super::common::{
    stringify_columns, stringify_placeholders, ColumnValueSet, IntoColumnValues, QueryBuilder,
    RenderedQuery,
};
use crate::{ident, Error, Result};

/// INSERT query builder for a single record
#[derive(Debug, Clone)]
pub struct InsertBuilder {
    table_name: String,
    values: ColumnValueSet,
}

impl InsertBuilder {
    /// Create a new INSERT query builder
    pub fn new(table: &str) -> Self {
        Self {
            table_name: table.to_string(),
            values: ColumnValueSet::new(),
        }
    }

    /// Set the record to insert
    ///
    /// # Examples
    /// ```
    /// use quarry_core::{InsertBuilder, QueryBuilder, Value};
    ///
    /// let query = InsertBuilder::new("users")
    ///     .values([("name", Value::from("John")), ("age", Value::from(30))]);
    /// assert_eq!(
    ///     query.to_sql().unwrap(),
    ///     "INSERT INTO users(name, age)VALUES(:name, :age)"
    /// );
    /// ```
    pub fn values<T>(mut self, data: T) -> Self
    where
        T: IntoColumnValues,
    {
        self.values = data.into_column_values();
        self
    }
}

impl QueryBuilder for InsertBuilder {
    fn build(&self) -> Result<RenderedQuery> {
        let table = ident::table_name(&self.table_name)?;
        if self.values.is_empty() {
            return Err(Error::invalid_query("INSERT requires at least one column"));
        }
        for column in self.values.keys() {
            ident::column_name(column)?;
        }

        let sql = format!(
            "INSERT INTO {}({})VALUES({})",
            table,
            stringify_columns(&self.values),
            stringify_placeholders(&self.values)
        );

        Ok(RenderedQuery::new(sql, self.values.clone()))
    }
}

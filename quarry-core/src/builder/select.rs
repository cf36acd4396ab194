//! SELECT query builder

use super::common::{ColumnValueSet, QueryBuilder, RenderedQuery};
use super::condition::{ConditionGroup, IntoCondition};
use crate::{ident, Result};

/// SELECT query builder
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    table_name: String,
    columns: String,
    conditions: ConditionGroup,
}

impl SelectBuilder {
    /// Create a new SELECT query builder selecting every column
    pub fn new(table: &str) -> Self {
        Self {
            table_name: table.to_string(),
            columns: "*".to_string(),
            conditions: ConditionGroup::new(),
        }
    }

    /// Set the column expression: `*` or a comma-separated column list
    ///
    /// # Examples
    /// ```
    /// use quarry_core::{QueryBuilder, SelectBuilder};
    ///
    /// let query = SelectBuilder::new("users").select("id, name");
    /// assert_eq!(query.to_sql().unwrap(), "SELECT id, name FROM users");
    /// ```
    pub fn select(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    /// Replace the conditions with a prepared group
    pub fn conditions(mut self, conditions: ConditionGroup) -> Self {
        self.conditions = conditions;
        self
    }

    /// Add a WHERE condition
    pub fn where_<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.conditions = self.conditions.where_(condition);
        self
    }

    /// Add an AND WHERE condition (same as where_)
    pub fn and_where<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.where_(condition)
    }

    /// Add an OR WHERE condition
    pub fn or_where<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.conditions = self.conditions.or_where(condition);
        self
    }

    /// Whether the rendered statement carries bound parameters
    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }
}

impl QueryBuilder for SelectBuilder {
    fn build(&self) -> Result<RenderedQuery> {
        render_select(&self.table_name, &self.columns, &self.conditions)
    }
}

/// Render a SELECT over a borrowed condition group
pub(crate) fn render_select(
    table: &str,
    columns: &str,
    conditions: &ConditionGroup,
) -> Result<RenderedQuery> {
    let table = ident::table_name(table)?;
    let columns = ident::column_list(columns)?;
    let base = format!("SELECT {} FROM {}", columns, table);

    if conditions.is_empty() {
        return Ok(RenderedQuery::new(base, ColumnValueSet::new()));
    }

    let rendered = conditions.render()?;
    Ok(RenderedQuery::new(
        format!("{} {}", base, rendered.text),
        rendered.params,
    ))
}

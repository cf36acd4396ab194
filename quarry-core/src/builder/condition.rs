//! WHERE clause construction

use std::fmt::{self, Display};

use super::common::ColumnValueSet;
use crate::{ident, Error, IntoOperator, Operator, Result, Value};

/// How a condition is attached to the ones before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    /// Clause introducer; only ever rendered for the first condition
    Where,
    And,
    Or,
}

impl Connector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::Where => "WHERE",
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }

    /// Parse a textual label in any letter case. `Clause` is accepted as an
    /// alias of `WHERE`.
    pub fn from_label(label: &str) -> Result<Self> {
        let trimmed = label.trim();
        if trimmed.eq_ignore_ascii_case("where") || trimmed.eq_ignore_ascii_case("clause") {
            Ok(Connector::Where)
        } else if trimmed.eq_ignore_ascii_case("and") {
            Ok(Connector::And)
        } else if trimmed.eq_ignore_ascii_case("or") {
            Ok(Connector::Or)
        } else {
            Err(Error::InvalidConnector {
                label: label.to_string(),
            })
        }
    }
}

impl Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `<connector> <column> <operator> :<column>` term
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub connector: Connector,
    pub column: String,
    pub operator: Operator,
    pub comparand: Value,
}

/// Trait for conditions that can be used in WHERE clauses
pub trait IntoCondition {
    fn into_condition(self) -> Result<(String, Operator, Value)>;
}

// Shorthand equality: ("status", "active")
impl<T> IntoCondition for (&str, T)
where
    T: Into<Value>,
{
    fn into_condition(self) -> Result<(String, Operator, Value)> {
        Ok((self.0.to_string(), Operator::Eq, self.1.into()))
    }
}

// Explicit operator: ("age", op::GT, 18) or ("age", ">", 18)
impl<T, O> IntoCondition for (&str, O, T)
where
    T: Into<Value>,
    O: IntoOperator,
{
    fn into_condition(self) -> Result<(String, Operator, Value)> {
        Ok((self.0.to_string(), self.1.into_operator()?, self.2.into()))
    }
}

/// WHERE text plus the named parameters it references
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedConditions {
    pub text: String,
    pub params: ColumnValueSet,
}

/// Ordered list of WHERE conditions.
///
/// Operator errors from the fluent methods are held back and reported by
/// [`ConditionGroup::render`], so chains stay infallible.
#[derive(Debug, Clone, Default)]
pub struct ConditionGroup {
    conditions: Vec<Condition>,
    rejected_operator: Option<String>,
}

impl ConditionGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a group from `(label, condition)` pairs where the label is
    /// `Clause`/`Where`, `And` or `Or` in any letter case.
    ///
    /// # Examples
    /// ```
    /// use quarry_core::{ConditionGroup, Value};
    ///
    /// let group = ConditionGroup::from_labeled([
    ///     ("Clause", ("age", ">", Value::from(18))),
    ///     ("And", ("status", "=", Value::from("active"))),
    ///     ("AND", ("country", "=", Value::from("NL"))),
    /// ])
    /// .unwrap();
    /// assert_eq!(group.len(), 3);
    /// ```
    pub fn from_labeled<I, L, C>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (L, C)>,
        L: AsRef<str>,
        C: IntoCondition,
    {
        let mut group = Self::new();
        for (label, condition) in entries {
            let label = label.as_ref();
            let connector = Connector::from_label(label)?;
            if connector == Connector::Where && !group.is_empty() {
                return Err(Error::InvalidConnector {
                    label: label.to_string(),
                });
            }
            group.push(connector, condition)?;
        }
        Ok(group)
    }

    /// Append a condition, failing immediately on an invalid operator
    pub fn push<C>(&mut self, connector: Connector, condition: C) -> Result<()>
    where
        C: IntoCondition,
    {
        let (column, operator, comparand) = condition.into_condition()?;
        self.conditions.push(Condition {
            connector,
            column,
            operator,
            comparand,
        });
        Ok(())
    }

    fn push_deferred<C>(mut self, connector: Connector, condition: C) -> Self
    where
        C: IntoCondition,
    {
        if let Err(err) = self.push(connector, condition) {
            let operator = match err {
                Error::InvalidOperator { operator } => operator,
                other => other.to_string(),
            };
            self.rejected_operator.get_or_insert(operator);
        }
        self
    }

    /// Add a condition; the first one introduces the clause, later ones are ANDed
    ///
    /// # Examples
    /// ```
    /// use quarry_core::{op, ConditionGroup};
    ///
    /// let group = ConditionGroup::new()
    ///     .where_(("age", op::GT, 18))
    ///     .where_(("status", "active"));
    /// assert_eq!(group.render().unwrap().text, "WHERE age > :age AND status = :status");
    /// ```
    pub fn where_<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        let connector = if self.conditions.is_empty() {
            Connector::Where
        } else {
            Connector::And
        };
        self.push_deferred(connector, condition)
    }

    /// Add an AND condition (same as where_)
    pub fn and_where<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.where_(condition)
    }

    /// Add an OR condition
    pub fn or_where<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        if self.conditions.is_empty() {
            return self.where_(condition);
        }
        self.push_deferred(Connector::Or, condition)
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Render the WHERE clause.
    ///
    /// Each comparand is bound under its column name, so a column that
    /// appears twice keeps only the later comparand.
    pub fn render(&self) -> Result<RenderedConditions> {
        if let Some(operator) = &self.rejected_operator {
            return Err(Error::invalid_operator(operator.clone()));
        }

        let mut terms = Vec::with_capacity(self.conditions.len());
        let mut params = ColumnValueSet::new();

        for (i, condition) in self.conditions.iter().enumerate() {
            let column = ident::column_name(&condition.column)?;
            let connector = if i == 0 {
                Connector::Where
            } else {
                condition.connector
            };

            terms.push(format!(
                "{} {} {} :{}",
                connector, column, condition.operator, column
            ));
            params.insert(column.to_string(), condition.comparand.clone().trimmed());
        }

        Ok(RenderedConditions {
            text: terms.join(" "),
            params,
        })
    }
}

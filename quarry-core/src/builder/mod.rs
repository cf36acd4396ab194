//! Query builder module

pub mod common;
pub mod condition;
pub mod insert;
pub mod select;

// Re-export types from submodules
pub use common::{
    stringify_columns, stringify_placeholders, ColumnValueSet, IntoColumnValues, QueryBuilder,
    RenderedQuery,
};
pub use condition::{Condition, ConditionGroup, Connector, IntoCondition, RenderedConditions};
pub use insert::InsertBuilder;
pub use select::SelectBuilder;

//! Error types for Quarry

use thiserror::Error;

/// The main error type for Quarry operations
#[derive(Error, Debug)]
pub enum Error {
    /// Statement execution error reported by the driver
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The connection factory could not establish a handle
    #[error("Failed to connect to {dsn}: {source}")]
    Connection {
        dsn: String,
        #[source]
        source: sqlx::Error,
    },

    /// Table or column name that is not a plain SQL identifier
    #[error("Invalid {kind} identifier '{name}'")]
    InvalidIdentifier { kind: &'static str, name: String },

    /// Comparison operator outside the allow-list
    #[error("Unsupported operator '{operator}'")]
    InvalidOperator { operator: String },

    /// Condition label that is not WHERE/AND/OR
    #[error("Unknown condition connector '{label}'")]
    InvalidConnector { label: String },

    /// Invalid query configuration
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    /// A named placeholder without a bound value
    #[error("No value bound for placeholder ':{name}'")]
    MissingParameter { name: String },

    /// The dispatcher only knows SELECT and INSERT
    #[error("Unsupported statement '{verb}': only SELECT and INSERT can be dispatched")]
    UnsupportedStatement { verb: String },

    /// Result column whose database type has no [`crate::Value`] mapping
    #[error("Unsupported type {type_name} for column '{column}'")]
    UnsupportedColumnType { column: String, type_name: String },

    /// Bad or missing connection settings
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience Result type for Quarry operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Create a new invalid identifier error
    pub fn invalid_identifier(kind: &'static str, name: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            kind,
            name: name.into(),
        }
    }

    /// Create a new invalid operator error
    pub fn invalid_operator(operator: impl Into<String>) -> Self {
        Self::InvalidOperator {
            operator: operator.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new unsupported statement error
    pub fn unsupported_statement(verb: impl Into<String>) -> Self {
        Self::UnsupportedStatement { verb: verb.into() }
    }

    /// Create a new unsupported column type error
    pub fn unsupported_column_type(column: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnsupportedColumnType {
            column: column.into(),
            type_name: type_name.into(),
        }
    }
}

//! Error types for rowbase

use thiserror::Error;

/// Result type alias for rowbase operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Error types for query compilation and database operations
#[derive(Debug, Error)]
pub enum ModelError {
    /// Model configuration error (e.g. table name not defined)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Dynamic finder call that cannot be routed
    #[error("Malformed finder call: {0}")]
    MalformedCall(String),

    /// Predicate key suffix that matches no recognized operator
    #[error("Operator not defined: {0}")]
    UnknownOperator(String),

    /// Compiled WHERE clause is empty and wide-open queries are disallowed
    #[error("Cannot run wide open query against `{0}`")]
    WideOpenQuery(String),

    /// Update data does not contain the designated update-key field
    #[error("{0} update field missing")]
    MissingUpdateKey(String),

    /// Update data contains nothing to set besides the update key
    #[error("No data to update")]
    EmptyUpdate,

    /// Attempt to map a multi-row result onto a single-instance record
    #[error("Cannot map {0} rows onto a single record")]
    Shape(usize),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl ModelError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is an unknown-operator error
    pub fn is_unknown_operator(&self) -> bool {
        matches!(self, Self::UnknownOperator(_))
    }

    /// Check if this is a wide-open-query error
    pub fn is_wide_open_query(&self) -> bool {
        matches!(self, Self::WideOpenQuery(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for ModelError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

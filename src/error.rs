use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

/// Result type used across the engine.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the engine can report.
///
/// Errors are raised where they are detected and travel up to
/// [crate::Database::execute_query], the only place that turns them into a message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The statement text does not follow the grammar.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A table or column is missing, already exists, or a row has the wrong arity.
    #[error("schema error: {0}")]
    Schema(String),

    /// A literal cannot be coerced to its column's type, or two values cannot be compared.
    #[error("value error: {0}")]
    Value(String),
}

impl Error {
    pub fn syntax(msg: impl Into<String>) -> Self {
        Self::Syntax(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn value(msg: impl Into<String>) -> Self {
        Self::Value(msg.into())
    }
}

impl From<ParseIntError> for Error {
    fn from(value: ParseIntError) -> Self {
        Error::Value(value.to_string())
    }
}

impl From<ParseFloatError> for Error {
    fn from(value: ParseFloatError) -> Self {
        Error::Value(value.to_string())
    }
}

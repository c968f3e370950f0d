// Error types for fragment compilation

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("Invalid filter key: {key:?} (expected column$operator)")]
    InvalidFilterKey { key: String },

    #[error("Invalid operand for {column} {operator}: expected string, found {found}")]
    InvalidOperandType {
        column: String,
        operator: &'static str,
        found: &'static str,
    },

    #[error("Invalid column name: {column:?} (must be alphanumeric with _ or .)")]
    InvalidColumnName { column: String },

    #[error("Empty list bound to placeholder {index}")]
    EmptyList { index: usize },

    #[error("Placeholder count {placeholders} does not match argument count {args}")]
    PlaceholderMismatch { placeholders: usize, args: usize },

    #[error("Unsupported filter value: {0}")]
    UnsupportedValue(String),
}

pub type Result<T> = std::result::Result<T, QueryError>;

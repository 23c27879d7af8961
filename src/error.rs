//! Error types for the filter and aggregation stages.
//!
//! Loading and orchestration use `anyhow`; the core stages return these typed
//! errors so callers (and tests) can match on the failure kind.

use thiserror::Error;

/// A filter expression could not be split into `column`, operator, `value`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid condition '{0}': expected one of >=, <=, >, <, =")]
    NoOperator(String),

    #[error("invalid condition '{expression}': could not split on '{operator}'")]
    MalformedSplit { expression: String, operator: String },
}

/// Failure while filtering rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("error in filter condition: {0}")]
    Condition(#[from] ParseError),

    #[error("column '{0}' not found")]
    ColumnNotFound(String),
}

/// Failure while aggregating rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregationError {
    #[error("invalid aggregation '{0}': expected 'column=function'")]
    Format(String),

    #[error("column '{0}' does not exist or contains non-numeric values")]
    NonNumeric(String),

    #[error("invalid function '{0}'. Available: avg, min, max, sum, count")]
    UnknownFunction(String),
}

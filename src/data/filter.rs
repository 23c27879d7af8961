use log::{debug, info};

use super::condition::{parse_condition, Condition, Operator};
use super::model::{parse_number, Dataset, Row};
use crate::error::FilterError;

// ---------------------------------------------------------------------------
// Operand typing: numeric first, text as fallback
// ---------------------------------------------------------------------------

/// The two sides of one comparison after deciding how to compare them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operands<'a> {
    /// Both sides read as numbers.
    Numeric(f64, f64),
    /// At least one side is not a number; compare the raw text.
    Text(&'a str, &'a str),
}

impl<'a> Operands<'a> {
    pub fn classify(cell: &'a str, literal: &'a str) -> Self {
        match (parse_number(cell), parse_number(literal)) {
            (Some(a), Some(b)) => Operands::Numeric(a, b),
            _ => Operands::Text(cell, literal),
        }
    }

    pub fn satisfy(&self, operator: Operator) -> bool {
        match *self {
            Operands::Numeric(a, b) => operator.holds(&a, &b),
            Operands::Text(a, b) => operator.holds(a, b),
        }
    }
}

// ---------------------------------------------------------------------------
// Row filtering
// ---------------------------------------------------------------------------

/// Whether a single row passes the condition.
///
/// A row that lacks the condition's column is an error, not a non-match.
pub fn row_matches(row: &Row, condition: &Condition) -> Result<bool, FilterError> {
    let cell = row
        .get(&condition.column)
        .ok_or_else(|| FilterError::ColumnNotFound(condition.column.clone()))?;
    Ok(Operands::classify(cell, &condition.value).satisfy(condition.operator))
}

/// Keep the rows that satisfy `expression`, in their original order.
///
/// An empty expression returns the dataset untouched. The first row missing
/// the referenced column aborts the whole filter.
pub fn apply_filter(dataset: Dataset, expression: &str) -> Result<Dataset, FilterError> {
    if expression.is_empty() {
        return Ok(dataset);
    }

    let condition = parse_condition(expression)?;
    debug!("filtering on {condition:?}");

    let total = dataset.len();
    let Dataset { columns, rows } = dataset;
    let mut kept = Vec::with_capacity(rows.len());
    for row in rows {
        if row_matches(&row, &condition)? {
            kept.push(row);
        }
    }

    info!("filter `{condition}` kept {} of {total} rows", kept.len());
    Ok(Dataset::new(columns, kept))
}

use std::fmt;

use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Operator
// ---------------------------------------------------------------------------

/// Comparison operator of a filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Gt,
    Lt,
    Eq,
    Ge,
    Le,
}

impl Operator {
    /// Search order for parsing. Two-character operators come before their
    /// one-character prefixes.
    pub const PRIORITY: [Operator; 5] = [
        Operator::Ge,
        Operator::Le,
        Operator::Gt,
        Operator::Lt,
        Operator::Eq,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Eq => "=",
            Operator::Ge => ">=",
            Operator::Le => "<=",
        }
    }

    /// Apply the operator to two values of the same type.
    pub fn holds<T: PartialOrd + ?Sized>(self, left: &T, right: &T) -> bool {
        match self {
            Operator::Gt => left > right,
            Operator::Lt => left < right,
            Operator::Eq => left == right,
            Operator::Ge => left >= right,
            Operator::Le => left <= right,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ---------------------------------------------------------------------------
// Condition
// ---------------------------------------------------------------------------

/// A parsed `column<op>value` filter. Both sides are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: String,
    pub operator: Operator,
    pub value: String,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.column, self.operator, self.value)
    }
}

/// Parse a filter expression such as `price>=100` or `brand=apple`.
///
/// The first operator from [`Operator::PRIORITY`] found anywhere in the
/// expression wins, and the expression is split at its first occurrence.
/// Neither side is trimmed, so `"brand = apple"` looks for a column named
/// `"brand "`.
pub fn parse_condition(expression: &str) -> Result<Condition, ParseError> {
    let operator = Operator::PRIORITY
        .into_iter()
        .find(|op| expression.contains(op.symbol()))
        .ok_or_else(|| ParseError::NoOperator(expression.to_string()))?;

    let (column, value) = expression
        .split_once(operator.symbol())
        .ok_or_else(|| ParseError::MalformedSplit {
            expression: expression.to_string(),
            operator: operator.symbol().to_string(),
        })?;

    Ok(Condition {
        column: column.to_string(),
        operator,
        value: value.to_string(),
    })
}

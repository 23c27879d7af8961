use std::fmt;
use std::str::FromStr;

use log::{debug, info};
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::model::{parse_number, Dataset};
use crate::error::AggregationError;

// ---------------------------------------------------------------------------
// Aggregation functions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggFunction {
    Avg,
    Min,
    Max,
    Sum,
    Count,
}

impl AggFunction {
    pub fn name(self) -> &'static str {
        match self {
            AggFunction::Avg => "avg",
            AggFunction::Min => "min",
            AggFunction::Max => "max",
            AggFunction::Sum => "sum",
            AggFunction::Count => "count",
        }
    }

    /// Reduce a non-empty slice of values.
    fn reduce(self, values: &[f64]) -> f64 {
        match self {
            AggFunction::Avg => round2(values.iter().sum::<f64>() / values.len() as f64),
            AggFunction::Min => extremum(values, f64::min),
            AggFunction::Max => extremum(values, f64::max),
            AggFunction::Sum => values.iter().sum(),
            AggFunction::Count => values.len() as f64,
        }
    }
}

impl FromStr for AggFunction {
    type Err = AggregationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avg" => Ok(AggFunction::Avg),
            "min" => Ok(AggFunction::Min),
            "max" => Ok(AggFunction::Max),
            "sum" => Ok(AggFunction::Sum),
            "count" => Ok(AggFunction::Count),
            other => Err(AggregationError::UnknownFunction(other.to_string())),
        }
    }
}

impl fmt::Display for AggFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Smallest or largest value. A NaN anywhere makes the result NaN.
fn extremum(values: &[f64], pick: fn(f64, f64) -> f64) -> f64 {
    values
        .iter()
        .copied()
        .reduce(|a, b| {
            if a.is_nan() || b.is_nan() {
                f64::NAN
            } else {
                pick(a, b)
            }
        })
        .unwrap_or(f64::NAN)
}

/// Round half away from zero to two decimals.
///
/// The value is first snapped to 9 decimals so that a mean such as 4.675,
/// stored as 4.67499999..., still rounds up. From 1e15 upwards an f64 has
/// no hundredths to round, so such values (and non-finite ones) pass through.
fn round2(x: f64) -> f64 {
    if !x.is_finite() || x.abs() >= 1e15 {
        return x;
    }
    let snapped = (x * 1e9).round() / 1e9;
    (snapped * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// AggregationSpec
// ---------------------------------------------------------------------------

/// A `column=function` request. The function name is kept as written and
/// only validated once the column has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationSpec {
    pub column: String,
    pub function: String,
}

impl AggregationSpec {
    pub fn parse(expression: &str) -> Result<Self, AggregationError> {
        let (column, function) = expression
            .split_once('=')
            .ok_or_else(|| AggregationError::Format(expression.to_string()))?;
        Ok(Self {
            column: column.to_string(),
            function: function.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// AggregationResult
// ---------------------------------------------------------------------------

/// The single statistic produced by [`apply_aggregation`].
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationResult {
    Count(usize),
    Value { function: AggFunction, value: f64 },
    /// There were no rows to aggregate. A normal result, not a failure.
    NoData,
}

impl AggregationResult {
    pub const NO_DATA_KEY: &'static str = "error";
    pub const NO_DATA_MESSAGE: &'static str = "No data to aggregate";

    /// Name of the single entry: the function name, or the no-data key.
    pub fn key(&self) -> &'static str {
        match self {
            AggregationResult::Count(_) => AggFunction::Count.name(),
            AggregationResult::Value { function, .. } => function.name(),
            AggregationResult::NoData => Self::NO_DATA_KEY,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AggregationResult::Count(n) => Some(*n as f64),
            AggregationResult::Value { value, .. } => Some(*value),
            AggregationResult::NoData => None,
        }
    }
}

impl fmt::Display for AggregationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationResult::Count(n) => write!(f, "{n}"),
            AggregationResult::Value { value, .. } => write!(f, "{value}"),
            AggregationResult::NoData => f.write_str(Self::NO_DATA_MESSAGE),
        }
    }
}

impl Serialize for AggregationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            AggregationResult::Count(n) => map.serialize_entry(self.key(), n)?,
            AggregationResult::Value { value, .. } => map.serialize_entry(self.key(), value)?,
            AggregationResult::NoData => {
                map.serialize_entry(self.key(), Self::NO_DATA_MESSAGE)?
            }
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Every row's value in `column` as a number. Fails on the first row that
/// lacks the column or holds something non-numeric.
fn numeric_column(dataset: &Dataset, column: &str) -> Result<Vec<f64>, AggregationError> {
    dataset
        .rows
        .iter()
        .map(|row| {
            row.get(column)
                .and_then(parse_number)
                .ok_or_else(|| AggregationError::NonNumeric(column.to_string()))
        })
        .collect()
}

/// Reduce the dataset to one statistic described by `column=function`.
///
/// Checks run in this order: empty dataset (→ [`AggregationResult::NoData`]),
/// expression format, `count` (never reads the column), column values, then
/// the function name.
pub fn apply_aggregation(
    dataset: &Dataset,
    expression: &str,
) -> Result<AggregationResult, AggregationError> {
    if dataset.is_empty() {
        debug!("nothing to aggregate: dataset is empty");
        return Ok(AggregationResult::NoData);
    }

    let spec = AggregationSpec::parse(expression)?;
    debug!("aggregating {spec:?} over {} rows", dataset.len());

    let function = spec.function.parse::<AggFunction>();
    if let Ok(AggFunction::Count) = function {
        return Ok(AggregationResult::Count(dataset.len()));
    }

    let values = numeric_column(dataset, &spec.column)?;
    let function = function?;
    let value = function.reduce(&values);

    info!("{}({}) = {value}", function, spec.column);
    Ok(AggregationResult::Value { function, value })
}

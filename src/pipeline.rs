use std::path::PathBuf;

use anyhow::Result;
use log::debug;

use crate::data::aggregate::{apply_aggregation, AggregationResult};
use crate::data::filter::apply_filter;
use crate::data::loader::{load_file, LoadOptions};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Query – one invocation, independent of how it was requested
// ---------------------------------------------------------------------------

/// Everything needed to produce one result.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub file: PathBuf,
    /// Filter expression; empty means keep every row.
    pub condition: String,
    /// `column=function`; empty means return the rows themselves.
    pub aggregation: String,
    pub load: LoadOptions,
}

/// What the pipeline hands to the presenter.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Rows(Dataset),
    Aggregate(AggregationResult),
}

/// Load the file named by the query and run it through [`process`].
pub fn run_query(query: &Query) -> Result<Output> {
    let dataset = load_file(&query.file, &query.load)?;
    process(dataset, &query.condition, &query.aggregation)
}

/// Filter (if `condition` is non-empty), then aggregate (if `aggregation`
/// is non-empty).
pub fn process(dataset: Dataset, condition: &str, aggregation: &str) -> Result<Output> {
    let filtered = apply_filter(dataset, condition)?;

    if aggregation.is_empty() {
        debug!("no aggregation requested, returning {} rows", filtered.len());
        return Ok(Output::Rows(filtered));
    }

    let result = apply_aggregation(&filtered, aggregation)?;
    Ok(Output::Aggregate(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;
    use crate::error::{AggregationError, FilterError};

    fn prices() -> Dataset {
        Dataset::from_rows(
            ["999", "1199", "199", "299"]
                .into_iter()
                .map(|p| [("price", p)].into_iter().collect::<Row>())
                .collect(),
        )
    }

    #[test]
    fn no_condition_no_aggregation_returns_input() {
        assert_eq!(process(prices(), "", "").unwrap(), Output::Rows(prices()));
    }

    #[test]
    fn aggregates_filtered_rows() {
        let out = process(prices(), "price<1000", "price=count").unwrap();
        assert_eq!(out, Output::Aggregate(AggregationResult::Count(3)));
    }

    #[test]
    fn empty_filter_result_aggregates_to_no_data() {
        let out = process(prices(), "price>5000", "price=sum").unwrap();
        assert_eq!(out, Output::Aggregate(AggregationResult::NoData));
    }

    #[test]
    fn stage_errors_keep_their_type() {
        let err = process(prices(), "oops", "").unwrap_err();
        assert!(err.downcast_ref::<FilterError>().is_some());

        let err = process(prices(), "", "price=median").unwrap_err();
        assert_eq!(
            err.downcast_ref::<AggregationError>(),
            Some(&AggregationError::UnknownFunction("median".into()))
        );
    }
}

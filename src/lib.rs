//! Load a tabular file, keep the rows matching one condition, optionally
//! reduce them to a single statistic, and present the result.

pub mod cli;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod render;

pub use data::aggregate::{apply_aggregation, AggFunction, AggregationResult, AggregationSpec};
pub use data::condition::{parse_condition, Condition, Operator};
pub use data::filter::apply_filter;
pub use data::loader::{load_file, LoadOptions};
pub use data::model::{Dataset, Row};
pub use error::{AggregationError, FilterError, ParseError};
pub use pipeline::{process, run_query, Output, Query};

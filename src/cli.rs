//! Command-line argument parsing via clap derive.

use std::path::PathBuf;

use clap::Parser;

use crate::data::loader::LoadOptions;
use crate::pipeline::Query;

/// Filter and aggregate a tabular data file, then print the result as a table.
///
/// Reads CSV/TSV, JSON records or Parquet. Every cell is treated as text until
/// a filter or aggregation needs it as a number.
#[derive(Parser, Debug)]
#[command(name = "rusty-tabula", version, about)]
pub struct CliArgs {
    /// Path to the input file.
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    /// Filter condition, e.g. `price>100` or `brand=apple`.
    /// Operators: >=, <=, >, <, =.
    #[arg(long = "where", value_name = "EXPR", default_value = "")]
    pub condition: String,

    /// Aggregation as `column=function` (avg, min, max, sum, count).
    #[arg(long, value_name = "EXPR", default_value = "")]
    pub aggregate: String,

    /// Field delimiter for delimited text (single character, or `tab`).
    #[arg(long, value_name = "CHAR", value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Output format: table, json.
    #[arg(long = "format", value_name = "FORMAT", default_value = "table")]
    pub format: OutputFormat,

    /// Log pipeline steps to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// The query these arguments describe.
    pub fn query(&self) -> Query {
        Query {
            file: self.file.clone(),
            condition: self.condition.clone(),
            aggregation: self.aggregate.clone(),
            load: LoadOptions {
                delimiter: self.delimiter,
            },
        }
    }

    /// Default log filter when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match s.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(format!("delimiter must be a single ASCII character, got '{s}'")),
        },
    }
}

/// Output format for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Bordered ASCII table (default).
    #[default]
    Table,
    /// JSON array of objects, or a single-key object for aggregations.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown format '{}'. Valid: table, json", s)),
        }
    }
}

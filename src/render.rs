//! Presentation of pipeline output: bordered tables or JSON.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::cli::OutputFormat;
use crate::data::aggregate::AggregationResult;
use crate::data::model::Dataset;
use crate::pipeline::Output;

/// Printed instead of a table when no rows are left.
pub const NO_MATCHES: &str = "No rows match the given conditions.";

pub fn render(output: &Output, format: OutputFormat) -> Result<String> {
    match (output, format) {
        (Output::Rows(ds), OutputFormat::Table) => render_rows(ds),
        (Output::Aggregate(res), OutputFormat::Table) => render_aggregate(res),
        (Output::Rows(ds), OutputFormat::Json) => {
            serde_json::to_string_pretty(ds).context("serializing rows")
        }
        (Output::Aggregate(res), OutputFormat::Json) => {
            serde_json::to_string_pretty(res).context("serializing aggregation")
        }
    }
}

/// Rows as a grid with the dataset's column order. A row without some
/// column shows an empty cell there.
pub fn render_rows(dataset: &Dataset) -> Result<String> {
    if dataset.is_empty() {
        return Ok(NO_MATCHES.to_string());
    }
    if dataset.columns.is_empty() {
        return Ok(format!("{} rows with no columns", dataset.len()));
    }

    let columns = dataset
        .columns
        .iter()
        .map(|col| {
            dataset
                .rows
                .iter()
                .map(|row| row.get(col).unwrap_or("").to_string())
                .collect()
        })
        .collect();
    format_grid(&dataset.columns, columns)
}

/// A one-cell table headed by the function name.
pub fn render_aggregate(result: &AggregationResult) -> Result<String> {
    format_grid(&[result.key().to_string()], vec![vec![result.to_string()]])
}

// Column-major string cells to an Arrow batch, then through the pretty printer.
fn format_grid(headers: &[String], columns: Vec<Vec<String>>) -> Result<String> {
    let fields: Vec<Field> = headers
        .iter()
        .map(|h| Field::new(h.as_str(), DataType::Utf8, false))
        .collect();
    let arrays: Vec<ArrayRef> = columns
        .into_iter()
        .map(|cells| Arc::new(StringArray::from(cells)) as ArrayRef)
        .collect();

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
        .context("building result table")?;
    let table = pretty_format_batches(&[batch]).context("formatting result table")?;
    Ok(table.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::AggFunction;
    use crate::data::model::Row;

    fn sample() -> Dataset {
        Dataset::from_rows(vec![
            [("brand", "apple"), ("price", "999")].into_iter().collect::<Row>(),
            [("brand", "xiaomi"), ("price", "199")].into_iter().collect::<Row>(),
        ])
    }

    #[test]
    fn rows_render_as_bordered_table() {
        let out = render(&Output::Rows(sample()), OutputFormat::Table).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with('+'), "{out}");
        assert!(lines[1].contains("brand") && lines[1].contains("price"), "{out}");
        assert!(out.find("apple").unwrap() < out.find("xiaomi").unwrap());
        assert!(out.trim_end().ends_with('+'));
    }

    #[test]
    fn empty_rows_render_notice() {
        let out = render(&Output::Rows(Dataset::default()), OutputFormat::Table).unwrap();
        assert_eq!(out, NO_MATCHES);
    }

    #[test]
    fn missing_cell_renders_empty() {
        let ds = Dataset::from_rows(vec![
            [("a", "1"), ("b", "2")].into_iter().collect::<Row>(),
            [("a", "3")].into_iter().collect::<Row>(),
        ]);
        assert!(render_rows(&ds).is_ok());
    }

    #[test]
    fn aggregate_renders_function_header() {
        let res = AggregationResult::Value {
            function: AggFunction::Avg,
            value: 4.68,
        };
        let out = render(&Output::Aggregate(res), OutputFormat::Table).unwrap();
        assert!(out.contains("avg"), "{out}");
        assert!(out.contains("4.68"), "{out}");

        let out = render_aggregate(&AggregationResult::NoData).unwrap();
        assert!(out.contains("error"));
        assert!(out.contains(AggregationResult::NO_DATA_MESSAGE));
    }

    #[test]
    fn json_output() {
        let out = render(&Output::Rows(sample()), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[1]["brand"], "xiaomi");

        let out = render(&Output::Rows(Dataset::default()), OutputFormat::Json).unwrap();
        assert_eq!(out, "[]");

        let out = render(&Output::Aggregate(AggregationResult::Count(4)), OutputFormat::Json)
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["count"], 4);
    }
}

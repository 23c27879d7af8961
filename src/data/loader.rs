use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef};
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use log::{info, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, Row};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Loader settings taken from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Field delimiter for delimited text. `None` picks the default for the
    /// extension (`,`, or tab for `.tsv`).
    pub delimiter: Option<u8>,
}

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` / no extension – delimited text, header row first
/// * `.tsv`     – tab-delimited text
/// * `.json`    – `[{ "column": value, ... }, ...]`
/// * `.parquet` – any flat schema; every value is rendered as text
///
/// Every cell ends up as a plain string; nothing is coerced here.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" | "txt" | "" => load_delimited(path, options.delimiter.unwrap_or(b',')),
        "tsv" => load_delimited(path, options.delimiter.unwrap_or(b'\t')),
        "json" | "parquet" | "pq" => {
            if options.delimiter.is_some() {
                warn!("--delimiter has no effect on .{ext} files");
            }
            if ext == "json" {
                load_json(path)
            } else {
                load_parquet(path)
            }
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading '{}'", path.display()))?;

    info!(
        "loaded {} rows x {} columns from {}",
        dataset.len(),
        dataset.columns.len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> Result<Dataset> {
    let reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .context("opening delimited file")?;
    read_delimited(reader)
}

/// Header row gives the column names; every later record becomes a [`Row`].
/// Records with a different field count than the header are rejected.
fn read_delimited<R: Read>(mut reader: csv::Reader<R>) -> Result<Dataset> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("record {}", row_no + 1))?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.as_str(), value))
            .collect();
        rows.push(row);
    }

    // A repeated header name keeps one column; the later value wins in the row.
    let mut columns: Vec<String> = Vec::with_capacity(headers.len());
    for h in headers {
        if !columns.contains(&h) {
            columns.push(h);
        }
    }

    Ok(Dataset::new(columns, rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "name": "iphone 15 pro", "brand": "apple", "price": 999 },
///   ...
/// ]
/// ```
///
/// Objects may have different keys; a row simply lacks the keys it omits.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json_records(&text)
}

fn parse_json_records(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        let row: Row = obj
            .iter()
            .map(|(key, val)| (key.as_str(), json_to_cell(val)))
            .collect();
        rows.push(row);
    }

    Ok(Dataset::from_rows(rows))
}

fn json_to_cell(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Column order follows the file schema; values are
/// rendered with Arrow's display formatter and nulls become empty strings.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        rows.extend(batch_to_rows(&batch)?);
    }

    Ok(Dataset::new(columns, rows))
}

// -- Arrow helpers --

fn batch_to_rows(batch: &RecordBatch) -> Result<Vec<Row>> {
    let schema = batch.schema();
    let mut rows = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let mut out = Row::new();
        for (field, col) in schema.fields().iter().zip(batch.columns()) {
            let cell = cell_to_string(col, row)
                .with_context(|| format!("Row {row}: failed to read '{}'", field.name()))?;
            out.insert(field.name().as_str(), cell);
        }
        rows.push(out);
    }
    Ok(rows)
}

fn cell_to_string(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    Ok(array_value_to_string(col.as_ref(), row)?)
}

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use log::{info, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::SampleTable;
use crate::error::Error;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sample table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-delimited, header row of dataset labels
/// * `.tsv` / `.tab` – the same layout, tab-delimited
/// * `.parquet` – wide table, first column is the x-axis
///
/// `delimiter` overrides the extension's default for the text formats.
pub fn load_file(path: &Path, delimiter: Option<u8>) -> Result<SampleTable> {
    if !path.exists() {
        bail!(Error::FileNotFound {
            path: path.to_path_buf()
        });
    }

    let table = match extension(path).as_str() {
        "parquet" | "pq" => load_parquet(path),
        "tsv" | "tab" => load_delimited(path, delimiter.unwrap_or(b'\t')),
        "csv" | "txt" => load_delimited(path, delimiter.unwrap_or(b',')),
        other => bail!(Error::unreadable(path, format!("unsupported file extension '.{other}'"))),
    }?;

    info!(
        "loaded {} rows × {} datasets from {}",
        table.n_rows(),
        table.n_datasets(),
        path.display()
    );
    if !table.axis_is_monotonic() {
        warn!(
            "x-axis in {} is not monotonic; bounds snap to the nearest row anywhere in the file",
            path.display()
        );
    }
    Ok(table)
}

pub(crate) fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Layout (as exported from the spectrometer software or a spreadsheet):
///
/// ```text
/// ,sample_1,sample_2
/// 4000.0,0.012,0.020
/// 3998.0,0.013,0.019
/// ```
///
/// Cell A1 is ignored and the labels are kept exactly as written. Data cells
/// are trimmed. An empty or missing cell means the dataset has no value on
/// that row, which surfaces as a ragged-column error. Rows that are empty in
/// every cell are skipped.
fn load_delimited(path: &Path, delimiter: u8) -> Result<SampleTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| Error::unreadable(path, e))?;

    let mut records = reader.records();
    let header = match records.next() {
        Some(rec) => rec.map_err(|e| Error::unreadable(path, e))?,
        None => bail!(Error::unreadable(path, "missing header row")),
    };
    let labels: Vec<String> = header.iter().skip(1).map(str::to_string).collect();

    let mut axis = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); labels.len()];

    for result in records {
        let mut record = result.map_err(|e| Error::unreadable(path, e))?;
        record.trim();
        let line = record.position().map_or(0, |p| p.line());

        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.iter().skip(labels.len() + 1).any(|c| !c.is_empty()) {
            bail!(Error::unreadable(
                path,
                format!(
                    "line {line}: {} cells but the header has {}",
                    record.len(),
                    labels.len() + 1
                )
            ));
        }

        let x_text = record.get(0).unwrap_or("");
        if x_text.is_empty() {
            bail!(Error::unreadable(path, format!("line {line}: missing x-axis value")));
        }
        axis.push(parse_cell(path, x_text, line, "x-axis")?);

        for (j, col) in columns.iter_mut().enumerate() {
            match record.get(j + 1) {
                Some(text) if !text.is_empty() => col.push(parse_cell(path, text, line, &labels[j])?),
                _ => {}
            }
        }
    }

    let table = SampleTable::new(axis, labels, columns)
        .with_context(|| format!("validating table shape of {}", path.display()))?;
    Ok(table)
}

fn parse_cell(path: &Path, text: &str, line: u64, column: &str) -> Result<f64> {
    text.parse::<f64>().map_err(|_| {
        Error::unreadable(
            path,
            format!("line {line}, column '{column}': '{text}' is not a number"),
        )
        .into()
    })
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a wide Parquet table.
///
/// Expected schema:
/// - first column: the x-axis (Float64, Float32, Int32 or Int64, no nulls)
/// - every other column: one dataset, named by its field name
///
/// A null in a dataset column counts as a missing value.
fn load_parquet(path: &Path) -> Result<SampleTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| Error::unreadable(path, e))?;
    let schema = builder.schema().clone();
    let reader = builder.build().map_err(|e| Error::unreadable(path, e))?;

    if schema.fields().is_empty() {
        bail!(Error::unreadable(path, "parquet file has no columns"));
    }
    let labels: Vec<String> = schema
        .fields()
        .iter()
        .skip(1)
        .map(|f| f.name().clone())
        .collect();

    let mut axis = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); labels.len()];

    for batch_result in reader {
        let batch = batch_result.map_err(|e| Error::unreadable(path, e))?;

        let x = extract_f64_column(batch.column(0))
            .map_err(|e| Error::unreadable(path, format!("x-axis column: {e}")))?;
        for v in x {
            match v {
                Some(v) => axis.push(v),
                None => bail!(Error::unreadable(
                    path,
                    format!("null x-axis value at row {}", axis.len())
                )),
            }
        }

        for (j, col) in columns.iter_mut().enumerate() {
            let values = extract_f64_column(batch.column(j + 1))
                .map_err(|e| Error::unreadable(path, format!("column '{}': {e}", labels[j])))?;
            col.extend(values.into_iter().flatten());
        }
    }

    let table = SampleTable::new(axis, labels, columns)
        .with_context(|| format!("validating table shape of {}", path.display()))?;
    Ok(table)
}

// -- Arrow helpers --

/// Read a numeric Arrow column as `f64`, keeping nulls as `None`.
fn extract_f64_column(col: &Arc<dyn Array>) -> Result<Vec<Option<f64>>> {
    let any = col.as_any();
    let values: Vec<Option<f64>> = match col.data_type() {
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .iter()
            .collect(),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .iter()
            .map(|v| v.map(f64::from))
            .collect(),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .iter()
            .map(|v| v.map(f64::from))
            .collect(),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .iter()
            .map(|v| v.map(|i| i as f64))
            .collect(),
        other => bail!("expected a numeric column, got {other:?}"),
    };
    Ok(values)
}

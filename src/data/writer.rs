use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::info;
use parquet::arrow::ArrowWriter;

use super::loader::extension;
use super::model::{ResultTable, SampleTable};
use crate::error::Error;

/// How the result table is laid out on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Overrides the extension's default delimiter for text output.
    pub delimiter: Option<u8>,
    /// Prepend the bound range to every row.
    pub label_ranges: bool,
}

// ---------------------------------------------------------------------------
// Result table
// ---------------------------------------------------------------------------

/// Write integration results, overwriting anything at `path`.  Dispatch by
/// extension.
///
/// * `.csv` / `.txt` / `.tsv` / `.tab` – header of dataset labels, one row per range
/// * `.json` – `{ "labels": [...], "ranges": [[lo, hi], ...], "values": [[...], ...] }`
/// * `.parquet` – one Float64 column per dataset, one row per range
pub fn write_results(path: &Path, results: &ResultTable, opts: &WriteOptions) -> Result<()> {
    match extension(path).as_str() {
        "parquet" | "pq" => write_results_parquet(path, results, opts.label_ranges),
        "json" => write_results_json(path, results),
        "tsv" | "tab" => write_results_delimited(path, results, opts.delimiter.unwrap_or(b'\t'), opts.label_ranges),
        "csv" | "txt" => write_results_delimited(path, results, opts.delimiter.unwrap_or(b','), opts.label_ranges),
        other => bail!(Error::write_failure(path, format!("unsupported file extension '.{other}'"))),
    }?;
    info!(
        "wrote {} ranges × {} datasets to {}",
        results.n_ranges(),
        results.labels().len(),
        path.display()
    );
    Ok(())
}

/// Numbers go out bare; a label is quoted only when it holds the delimiter,
/// a quote or a line break.
fn write_results_delimited(path: &Path, results: &ResultTable, delimiter: u8, label_ranges: bool) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(path)
        .map_err(|e| Error::write_failure(path, e))?;

    let mut header: Vec<&str> = Vec::with_capacity(results.labels().len() + 1);
    if label_ranges {
        header.push("range");
    }
    header.extend(results.labels().iter().map(String::as_str));
    writer
        .write_record(&header)
        .map_err(|e| Error::write_failure(path, e))?;

    for (range, values) in results.rows() {
        let mut record: Vec<String> = Vec::with_capacity(values.len() + 1);
        if label_ranges {
            record.push(range.to_string());
        }
        record.extend(values.iter().map(|v| format!("{v:?}")));
        writer
            .write_record(&record)
            .map_err(|e| Error::write_failure(path, e))?;
    }

    writer.flush().map_err(|e| Error::write_failure(path, e))?;
    Ok(())
}

fn write_results_json(path: &Path, results: &ResultTable) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::write_failure(path, e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), results)
        .map_err(|e| Error::write_failure(path, e))?;
    Ok(())
}

fn write_results_parquet(path: &Path, results: &ResultTable, label_ranges: bool) -> Result<()> {
    let batch = results_to_batch(results, label_ranges)?;
    write_batch(path, &batch)
}

/// Arrow view of the result table: optional `lower`/`upper` columns, then
/// one Float64 column per dataset.
pub fn results_to_batch(results: &ResultTable, label_ranges: bool) -> Result<RecordBatch> {
    let mut fields = Vec::new();
    let mut arrays: Vec<ArrayRef> = Vec::new();

    if label_ranges {
        let lower: Vec<f64> = results.ranges().iter().map(|r| r.lower).collect();
        let upper: Vec<f64> = results.ranges().iter().map(|r| r.upper).collect();
        fields.push(Field::new("lower", DataType::Float64, false));
        arrays.push(Arc::new(Float64Array::from(lower)));
        fields.push(Field::new("upper", DataType::Float64, false));
        arrays.push(Arc::new(Float64Array::from(upper)));
    }

    for (j, label) in results.labels().iter().enumerate() {
        let column: Vec<f64> = results.rows().map(|(_, values)| values[j]).collect();
        fields.push(Field::new(label.as_str(), DataType::Float64, false));
        arrays.push(Arc::new(Float64Array::from(column)));
    }

    if arrays.is_empty() {
        bail!("result table has no columns to write");
    }
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).context("building result record batch")
}

/// Render results as an aligned text table for the terminal.
pub fn pretty_format(results: &ResultTable) -> Result<String> {
    let batch = results_to_batch(results, true)?;
    let table = arrow::util::pretty::pretty_format_batches(&[batch]).context("formatting results")?;
    Ok(table.to_string())
}

// ---------------------------------------------------------------------------
// Sample table
// ---------------------------------------------------------------------------

/// Write a sample table in the layout [`super::loader::load_file`] reads.
/// Only `.csv`, `.tsv` and `.parquet` are supported.
pub fn write_sample_table(path: &Path, table: &SampleTable) -> Result<()> {
    match extension(path).as_str() {
        "parquet" | "pq" => write_batch(path, &sample_to_batch(table)?),
        "tsv" | "tab" => write_sample_delimited(path, table, b'\t'),
        "csv" => write_sample_delimited(path, table, b','),
        other => bail!(Error::write_failure(path, format!("unsupported file extension '.{other}'"))),
    }
}

fn write_sample_delimited(path: &Path, table: &SampleTable, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(path)
        .map_err(|e| Error::write_failure(path, e))?;

    let mut header = vec![String::new()];
    header.extend(table.labels().iter().cloned());
    writer
        .write_record(&header)
        .map_err(|e| Error::write_failure(path, e))?;

    for (row, x) in table.axis().iter().enumerate() {
        let mut record = vec![format!("{x:?}")];
        record.extend(table.datasets().map(|(_, y)| format!("{:?}", y[row])));
        writer
            .write_record(&record)
            .map_err(|e| Error::write_failure(path, e))?;
    }

    writer.flush().map_err(|e| Error::write_failure(path, e))?;
    Ok(())
}

fn sample_to_batch(table: &SampleTable) -> Result<RecordBatch> {
    let mut fields = vec![Field::new("wavenumber", DataType::Float64, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(Float64Array::from(table.axis().to_vec()))];
    for (label, values) in table.datasets() {
        fields.push(Field::new(label, DataType::Float64, false));
        arrays.push(Arc::new(Float64Array::from(values.to_vec())));
    }
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).context("building sample record batch")
}

fn write_batch(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::write_failure(path, e))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).map_err(|e| Error::write_failure(path, e))?;
    writer.write(batch).map_err(|e| Error::write_failure(path, e))?;
    writer.close().map_err(|e| Error::write_failure(path, e))?;
    Ok(())
}

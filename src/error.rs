use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Every failure the integration pipeline can report.
///
/// The numerical core returns these directly. The loader, writer and batch
/// runner wrap them in `anyhow` context; callers can recover the variant with
/// `anyhow::Error::downcast_ref::<Error>()`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("input file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("unreadable input {}: {reason}", path.display())]
    UnreadableInput { path: PathBuf, reason: String },

    #[error("dataset '{label}' has {actual} values but the x-axis has {expected}")]
    RaggedDataset {
        label: String,
        expected: usize,
        actual: usize,
    },

    #[error("{labels} dataset labels given for {columns} dataset columns")]
    ShapeMismatch { labels: usize, columns: usize },

    #[error("{ranges} bound ranges given for {rows} result rows")]
    RangeRowMismatch { ranges: usize, rows: usize },

    #[error("result row {row} has {values} values for {labels} dataset labels")]
    ResultRowWidth {
        row: usize,
        values: usize,
        labels: usize,
    },

    #[error("x-axis is empty, cannot resolve a bound")]
    EmptyAxis,

    #[error(
        "range ({lower}, {upper}) resolves to rows {start}..{end}, which leaves no interior pairs"
    )]
    DegenerateRange {
        lower: f64,
        upper: f64,
        start: usize,
        end: usize,
    },

    #[error("cannot write {}: {reason}", path.display())]
    OutputWriteFailure { path: PathBuf, reason: String },

    #[error("invalid bound range '{text}': expected two finite numbers as LO:HI")]
    InvalidBoundRange { text: String },
}

impl Error {
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::UnreadableInput {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn write_failure(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::OutputWriteFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ---------------------------------------------------------------------------
// BoundRange – one integration interval in x-axis units
// ---------------------------------------------------------------------------

/// An integration interval `(lower, upper)` in x-axis units.
///
/// The pair is kept as supplied; [`BoundRange::normalized`] gives the
/// `lower <= upper` form. In config files a range is a two-element array
/// `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct BoundRange {
    pub lower: f64,
    pub upper: f64,
}

impl BoundRange {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// The same interval with `lower <= upper`.
    pub fn normalized(self) -> Self {
        if self.lower > self.upper {
            Self::new(self.upper, self.lower)
        } else {
            self
        }
    }

    pub fn is_finite(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }
}

impl From<(f64, f64)> for BoundRange {
    fn from((lower, upper): (f64, f64)) -> Self {
        Self::new(lower, upper)
    }
}

impl From<BoundRange> for (f64, f64) {
    fn from(r: BoundRange) -> Self {
        (r.lower, r.upper)
    }
}

impl fmt::Display for BoundRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lower, self.upper)
    }
}

/// Parses `"LO:HI"` or `"LO,HI"`.
impl FromStr for BoundRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidBoundRange {
            text: s.to_string(),
        };
        let (lo, hi) = s.split_once([':', ',']).ok_or_else(invalid)?;
        let lower: f64 = lo.trim().parse().map_err(|_| invalid())?;
        let upper: f64 = hi.trim().parse().map_err(|_| invalid())?;
        let range = BoundRange::new(lower, upper);
        if !range.is_finite() {
            return Err(invalid());
        }
        Ok(range)
    }
}

// ---------------------------------------------------------------------------
// SampleTable – x-axis plus equally long dataset columns
// ---------------------------------------------------------------------------

/// The loaded input: one x-axis column and any number of dataset columns,
/// each holding exactly one value per x-axis row.
///
/// Stored column-major so each dataset is a contiguous slice.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable {
    axis: Vec<f64>,
    labels: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl SampleTable {
    /// Build a table, rejecting ragged columns and label/column mismatches.
    pub fn new(axis: Vec<f64>, labels: Vec<String>, columns: Vec<Vec<f64>>) -> Result<Self, Error> {
        if labels.len() != columns.len() {
            return Err(Error::ShapeMismatch {
                labels: labels.len(),
                columns: columns.len(),
            });
        }
        for (label, col) in labels.iter().zip(&columns) {
            if col.len() != axis.len() {
                return Err(Error::RaggedDataset {
                    label: label.clone(),
                    expected: axis.len(),
                    actual: col.len(),
                });
            }
        }
        Ok(Self {
            axis,
            labels,
            columns,
        })
    }

    /// The x-axis values, in row order.
    pub fn axis(&self) -> &[f64] {
        &self.axis
    }

    /// Dataset labels, in column order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn column(&self, idx: usize) -> Option<&[f64]> {
        self.columns.get(idx).map(Vec::as_slice)
    }

    pub fn column_by_label(&self, label: &str) -> Option<&[f64]> {
        let idx = self.labels.iter().position(|l| l == label)?;
        self.column(idx)
    }

    /// `(label, values)` for every dataset, in column order.
    pub fn datasets(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Number of x-axis rows.
    pub fn n_rows(&self) -> usize {
        self.axis.len()
    }

    /// Number of dataset columns (x-axis excluded).
    pub fn n_datasets(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }

    /// Whether the axis is non-increasing or non-decreasing throughout.
    pub fn axis_is_monotonic(&self) -> bool {
        let ascending = self.axis.windows(2).all(|w| w[0] <= w[1]);
        let descending = self.axis.windows(2).all(|w| w[0] >= w[1]);
        ascending || descending
    }
}

// ---------------------------------------------------------------------------
// ResultTable – ranges x datasets
// ---------------------------------------------------------------------------

/// Integration results: one row per bound range, one column per dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTable {
    labels: Vec<String>,
    ranges: Vec<BoundRange>,
    values: Vec<Vec<f64>>,
}

impl ResultTable {
    /// Assemble a result table. Each row must have one value per label.
    pub fn new(labels: Vec<String>, ranges: Vec<BoundRange>, values: Vec<Vec<f64>>) -> Result<Self, Error> {
        if ranges.len() != values.len() {
            return Err(Error::RangeRowMismatch {
                ranges: ranges.len(),
                rows: values.len(),
            });
        }
        if let Some((row, short)) = values
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != labels.len())
        {
            return Err(Error::ResultRowWidth {
                row,
                values: short.len(),
                labels: labels.len(),
            });
        }
        Ok(Self {
            labels,
            ranges,
            values,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn ranges(&self) -> &[BoundRange] {
        &self.ranges
    }

    /// `(range, values)` pairs in range order.
    pub fn rows(&self) -> impl Iterator<Item = (&BoundRange, &[f64])> {
        self.ranges.iter().zip(self.values.iter().map(Vec::as_slice))
    }

    pub fn row(&self, range_idx: usize) -> Option<&[f64]> {
        self.values.get(range_idx).map(Vec::as_slice)
    }

    /// Value for a given range index and dataset label.
    pub fn get(&self, range_idx: usize, label: &str) -> Option<f64> {
        let col = self.labels.iter().position(|l| l == label)?;
        self.values.get(range_idx)?.get(col).copied()
    }

    pub fn n_ranges(&self) -> usize {
        self.ranges.len()
    }
}

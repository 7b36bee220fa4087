use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::locate::locate;
use crate::data::model::SampleTable;
use crate::error::Error;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Which adjacent row pairs between the two resolved rows are summed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Pairs `(k, k+1)` for `k` in `start..end-1`: the pair touching the
    /// `end` row is left out, so bounds on the same or adjacent rows give 0.
    /// Gives the same numbers as the lab's older integration script.
    #[default]
    Exclusive,
    /// Pairs `(k, k+1)` for `k` in `start..end`: the composite trapezoid
    /// over every interval between the two resolved rows.
    Inclusive,
}

/// What to do when a range leaves no pairs to sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    #[default]
    Zero,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrationOptions {
    pub window: WindowPolicy,
    pub degenerate: DegeneratePolicy,
}

// ---------------------------------------------------------------------------
// Window resolution
// ---------------------------------------------------------------------------

/// Rows a bound pair resolved to, and the pair indices summed between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// Lower resolved row index.
    pub start: usize,
    /// Upper resolved row index.
    pub end: usize,
    /// `k` values whose pair `(k, k+1)` contributes.
    pub pairs: std::ops::Range<usize>,
}

impl Window {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Snap both bounds to rows and work out which pairs to sum.
///
/// Two separate reorderings happen here. The bound values are swapped so
/// `lower <= upper`, then the resolved indices are swapped so
/// `start <= end`. On a descending axis the smaller value lands on the
/// larger index, so the second swap is not implied by the first.
pub fn resolve_window(axis: &[f64], lower: f64, upper: f64, policy: WindowPolicy) -> Result<Window, Error> {
    let (lower, upper) = if lower > upper {
        trace!("swapping bounds {lower} > {upper}");
        (upper, lower)
    } else {
        (lower, upper)
    };

    let idx_low = locate(axis, lower)?;
    let idx_high = locate(axis, upper)?;
    let (start, end) = if idx_low <= idx_high {
        (idx_low, idx_high)
    } else {
        (idx_high, idx_low)
    };

    let pairs = match policy {
        WindowPolicy::Exclusive => start..end.saturating_sub(1),
        WindowPolicy::Inclusive => start..end,
    };
    Ok(Window { start, end, pairs })
}

// ---------------------------------------------------------------------------
// Integration
// ---------------------------------------------------------------------------

/// Area under every dataset between `lower` and `upper` with default options.
pub fn integrate(table: &SampleTable, lower: f64, upper: f64) -> Result<Vec<f64>, Error> {
    integrate_with(table, lower, upper, &IntegrationOptions::default())
}

/// Area under every dataset between `lower` and `upper`, one value per
/// dataset in column order.
///
/// Each pair `(k, k+1)` contributes `(y[k] + y[k+1]) / 2 * (x[k] - x[k+1])`,
/// so areas come out positive on a descending axis and negative on an
/// ascending one.
pub fn integrate_with(
    table: &SampleTable,
    lower: f64,
    upper: f64,
    opts: &IntegrationOptions,
) -> Result<Vec<f64>, Error> {
    integrate_resolved(table, lower, upper, opts).map(|(_, areas)| areas)
}

/// Like [`integrate_with`], also returning the window the bounds resolved to.
pub fn integrate_resolved(
    table: &SampleTable,
    lower: f64,
    upper: f64,
    opts: &IntegrationOptions,
) -> Result<(Window, Vec<f64>), Error> {
    let axis = table.axis();
    let window = resolve_window(axis, lower, upper, opts.window)?;
    debug!(
        "range ({lower}, {upper}) -> rows {}..={} ({} pairs)",
        window.start,
        window.end,
        window.pairs.len()
    );

    if window.is_empty() && opts.degenerate == DegeneratePolicy::Error {
        return Err(Error::DegenerateRange {
            lower,
            upper,
            start: window.start,
            end: window.end,
        });
    }

    let areas = table
        .datasets()
        .map(|(_, y)| trapezoid_sum(axis, y, window.pairs.clone()))
        .collect();
    Ok((window, areas))
}

/// An empty window sums to `+0.0`; `Iterator::sum` would start from `-0.0`.
fn trapezoid_sum(x: &[f64], y: &[f64], pairs: std::ops::Range<usize>) -> f64 {
    pairs
        .map(|k| (y[k] + y[k + 1]) / 2.0 * (x[k] - x[k + 1]))
        .fold(0.0, |acc, area| acc + area)
}

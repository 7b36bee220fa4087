//! Band-area integration for sampled spectra.
//!
//! A [`SampleTable`] holds one x-axis (usually descending wavenumbers) and
//! any number of dataset columns. Each [`BoundRange`] is snapped to the
//! nearest rows and every dataset is integrated between them with the
//! trapezoidal rule; [`batch::run`] does this for a whole file and writes a
//! ranges × datasets [`ResultTable`].

pub mod batch;
pub mod config;
pub mod data;
pub mod error;
pub mod integrate;

pub use data::model::{BoundRange, ResultTable, SampleTable};
pub use error::Error;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::BoundRange;
use crate::data::writer::WriteOptions;
use crate::error::Error;
use crate::integrate::{DegeneratePolicy, IntegrationOptions, WindowPolicy};

/// Everything one batch run needs.
///
/// Loaded from a JSON file; every field falls back to its default when
/// absent. Command-line flags are layered on top in `main`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub input_path: PathBuf,
    /// Overwritten without confirmation.
    pub output_path: PathBuf,
    pub bound_ranges: Vec<BoundRange>,
    pub window: WindowPolicy,
    pub degenerate: DegeneratePolicy,
    /// Single-byte delimiter for text input and output; `None` picks one
    /// from the file extension.
    pub delimiter: Option<char>,
    pub label_ranges: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data.csv"),
            output_path: PathBuf::from("result.csv"),
            // O-H / N-H stretch and carbonyl bands
            bound_ranges: vec![BoundRange::new(3050.0, 3725.0), BoundRange::new(1550.0, 1775.0)],
            window: WindowPolicy::default(),
            degenerate: DegeneratePolicy::default(),
            delimiter: None,
            label_ranges: false,
        }
    }
}

impl RunConfig {
    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: RunConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject ranges with non-finite ends and delimiters that are not one byte.
    pub fn validate(&self) -> Result<()> {
        if let Some(range) = self.bound_ranges.iter().find(|r| !r.is_finite()) {
            return Err(Error::InvalidBoundRange {
                text: range.to_string(),
            }
            .into());
        }
        self.delimiter_byte()?;
        Ok(())
    }

    pub fn delimiter_byte(&self) -> Result<Option<u8>> {
        match self.delimiter {
            None => Ok(None),
            Some(c) if c.is_ascii() => Ok(Some(c as u8)),
            Some(c) => anyhow::bail!("delimiter '{c}' is not a single-byte ASCII character"),
        }
    }

    pub fn integration_options(&self) -> IntegrationOptions {
        IntegrationOptions {
            window: self.window,
            degenerate: self.degenerate,
        }
    }

    pub fn write_options(&self) -> Result<WriteOptions> {
        Ok(WriteOptions {
            delimiter: self.delimiter_byte()?,
            label_ranges: self.label_ranges,
        })
    }
}

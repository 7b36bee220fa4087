use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::RunConfig;
use crate::data::loader::load_file;
use crate::data::model::{BoundRange, ResultTable, SampleTable};
use crate::data::writer::write_results;
use crate::integrate::{integrate_resolved, IntegrationOptions};

/// Load, integrate every configured range, write the result table.
pub fn run(config: &RunConfig) -> Result<ResultTable> {
    config.validate()?;

    let table = load_file(&config.input_path, config.delimiter_byte()?)
        .with_context(|| format!("loading {}", config.input_path.display()))?;

    let results = integrate_table(&table, &config.bound_ranges, &config.integration_options())?;

    write_results(&config.output_path, &results, &config.write_options()?)
        .with_context(|| format!("writing {}", config.output_path.display()))?;

    Ok(results)
}

/// One row of results per range, in range order; columns follow the table's
/// dataset order.
pub fn integrate_table(table: &SampleTable, ranges: &[BoundRange], opts: &IntegrationOptions) -> Result<ResultTable> {
    info!(
        "integrating {} ranges over {} datasets",
        ranges.len(),
        table.n_datasets()
    );

    let mut values = Vec::with_capacity(ranges.len());
    for (i, range) in ranges.iter().enumerate() {
        let (window, row) = integrate_resolved(table, range.lower, range.upper, opts)
            .with_context(|| format!("integrating range #{i} ({range})"))?;
        if window.is_empty() {
            warn!(
                "range #{i} ({range}) resolves to rows {} and {}; every area is 0",
                window.start, window.end
            );
        }
        values.push(row);
    }

    let results = ResultTable::new(table.labels().to_vec(), ranges.to_vec(), values)?;
    Ok(results)
}

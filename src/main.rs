use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::LevelFilter;

use ir_integrate::batch;
use ir_integrate::config::RunConfig;
use ir_integrate::data::writer::pretty_format;
use ir_integrate::integrate::{DegeneratePolicy, WindowPolicy};
use ir_integrate::BoundRange;

#[derive(Clone, Copy, ValueEnum)]
enum Window {
    Exclusive,
    Inclusive,
}

impl From<Window> for WindowPolicy {
    fn from(w: Window) -> Self {
        match w {
            Window::Exclusive => WindowPolicy::Exclusive,
            Window::Inclusive => WindowPolicy::Inclusive,
        }
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Integrate sampled spectra between wavenumber bounds and write a ranges × samples table"
)]
struct Args {
    /// JSON run configuration; flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input table (.csv, .tsv, .txt or .parquet)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output table (.csv, .tsv, .txt, .json or .parquet); overwritten
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Bound range as LO:HI; repeat for several ranges
    #[arg(short, long = "range", value_name = "LO:HI")]
    ranges: Vec<BoundRange>,

    /// Which row pairs between the resolved bounds are summed
    #[arg(long, value_enum)]
    window: Option<Window>,

    /// Fail on ranges that leave nothing to integrate instead of writing 0
    #[arg(long)]
    strict: bool,

    /// Delimiter for text input and output
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Prefix each output row with its bound range
    #[arg(long)]
    label_ranges: bool,

    /// Also print the results as a table on stdout
    #[arg(long)]
    print: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Debug logging (RUST_LOG still takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };
        if let Some(input) = self.input {
            config.input_path = input;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if !self.ranges.is_empty() {
            config.bound_ranges = self.ranges;
        }
        if let Some(window) = self.window {
            config.window = window.into();
        }
        if self.strict {
            config.degenerate = DegeneratePolicy::Error;
        }
        if self.delimiter.is_some() {
            config.delimiter = self.delimiter;
        }
        if self.label_ranges {
            config.label_ranges = true;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    let print = args.print;
    let dump_config = args.dump_config;
    let config = args.into_config()?;

    if dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let results = batch::run(&config)?;
    if print {
        println!("{}", pretty_format(&results)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn parse(flags: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("ir-integrate").chain(flags.iter().copied())).unwrap()
    }

    #[test]
    fn no_flags_give_the_default_run() {
        assert_eq!(parse(&[]).into_config().unwrap(), RunConfig::default());
    }

    #[test]
    fn repeated_range_flags_replace_the_defaults() {
        let config = parse(&["-r", "3050:3725", "--range", "1775,1550", "-r", "2800:3000"])
            .into_config()
            .unwrap();
        assert_eq!(
            config.bound_ranges,
            vec![
                BoundRange::new(3050.0, 3725.0),
                BoundRange::new(1775.0, 1550.0),
                BoundRange::new(2800.0, 3000.0),
            ]
        );
    }

    #[test]
    fn flags_override_the_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.json");
        fs::write(
            &path,
            r#"{
                "input_path": "from_file.csv",
                "output_path": "from_file_out.csv",
                "bound_ranges": [[1000, 1100], [2000, 2100]],
                "delimiter": ";"
            }"#,
        )
        .unwrap();
        let cfg = path.to_str().unwrap();

        // file values survive where no flag is given
        let config = parse(&["--config", cfg]).into_config().unwrap();
        assert_eq!(config.input_path, PathBuf::from("from_file.csv"));
        assert_eq!(config.bound_ranges.len(), 2);
        assert_eq!(config.delimiter, Some(';'));
        assert_eq!(config.window, WindowPolicy::Exclusive);

        let config = parse(&[
            "--config",
            cfg,
            "-i",
            "cli.tsv",
            "-r",
            "3050:3725",
            "--window",
            "inclusive",
            "--strict",
            "-d",
            "|",
            "--label-ranges",
        ])
        .into_config()
        .unwrap();
        assert_eq!(config.input_path, PathBuf::from("cli.tsv"));
        assert_eq!(config.output_path, PathBuf::from("from_file_out.csv"));
        assert_eq!(config.bound_ranges, vec![BoundRange::new(3050.0, 3725.0)]);
        assert_eq!(config.window, WindowPolicy::Inclusive);
        assert_eq!(config.degenerate, DegeneratePolicy::Error);
        assert_eq!(config.delimiter, Some('|'));
        assert!(config.label_ranges);
    }

    #[test]
    fn malformed_ranges_are_rejected_at_parse_time() {
        let argv = ["ir-integrate", "-r", "3050"];
        assert!(Args::try_parse_from(argv).is_err());
        let argv = ["ir-integrate", "-r", "abc:1"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn missing_config_file_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.json");
        let args = parse(&["--config", missing.to_str().unwrap()]);
        assert!(args.into_config().is_err());
    }
}

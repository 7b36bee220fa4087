use std::fs;
use std::path::Path;

use ir_integrate::batch;
use ir_integrate::config::RunConfig;
use ir_integrate::data::loader::load_file;
use ir_integrate::data::writer::write_sample_table;
use ir_integrate::integrate::{integrate, DegeneratePolicy, WindowPolicy};
use ir_integrate::{BoundRange, Error, SampleTable};
use tempfile::TempDir;

fn config(dir: &Path, input: &str, output: &str, ranges: &[(f64, f64)]) -> RunConfig {
    RunConfig {
        input_path: dir.join(input),
        output_path: dir.join(output),
        bound_ranges: ranges.iter().copied().map(BoundRange::from).collect(),
        ..Default::default()
    }
}

/// Descending 2 cm^-1 grid, like a spectrometer export.
fn spectrum_csv() -> String {
    let mut text = String::from(",flat,ramp\n");
    for i in 0..=100 {
        let wn = 4000.0 - 2.0 * i as f64;
        text.push_str(&format!("{wn},1.0,{}\n", i as f64));
    }
    text
}

#[test]
fn csv_in_csv_out() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("data.csv"), spectrum_csv()).unwrap();

    // 3990 -> row 5, 3950 -> row 25: pairs 5..24 (19 pairs of width 2)
    let cfg = config(dir.path(), "data.csv", "result.csv", &[(3950.0, 3990.0), (3800.0, 3800.0)]);
    let results = batch::run(&cfg).unwrap();

    assert_eq!(results.get(0, "flat"), Some(38.0));
    // ramp: sum over k=5..23 of (k + k+1) / 2 * 2 = sum of (2k + 1)
    let expected: f64 = (5..24).map(|k| 2.0 * k as f64 + 1.0).sum();
    assert_eq!(results.get(0, "ramp"), Some(expected));
    assert_eq!(results.row(1), Some(&[0.0, 0.0][..]));

    let text = fs::read_to_string(dir.path().join("result.csv")).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, ["flat,ramp", format!("38.0,{expected:?}").as_str(), "0.0,0.0"]);
}

#[test]
fn matches_the_single_call_results() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("data.csv"), spectrum_csv()).unwrap();
    let table = load_file(&dir.path().join("data.csv"), None).unwrap();

    let ranges = [(3725.0, 3850.0), (3999.0, 3801.0), (3900.5, 3899.5)];
    let cfg = config(dir.path(), "data.csv", "result.json", &ranges);
    let results = batch::run(&cfg).unwrap();

    for (i, &(lo, hi)) in ranges.iter().enumerate() {
        assert_eq!(results.row(i).unwrap(), integrate(&table, lo, hi).unwrap().as_slice());
        assert_eq!(integrate(&table, lo, hi).unwrap(), integrate(&table, hi, lo).unwrap());
    }
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("result.json")).unwrap()).unwrap();
    assert_eq!(json["labels"], serde_json::json!(["flat", "ramp"]));
}

#[test]
fn inclusive_window_adds_the_last_pair() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("data.csv"), spectrum_csv()).unwrap();

    let mut cfg = config(dir.path(), "data.csv", "result.csv", &[(3950.0, 3990.0)]);
    cfg.window = WindowPolicy::Inclusive;
    let results = batch::run(&cfg).unwrap();
    assert_eq!(results.get(0, "flat"), Some(40.0));
}

#[test]
fn parquet_input_and_tsv_output() {
    let dir = TempDir::new().unwrap();
    let table = SampleTable::new(
        vec![1004.0, 1003.0, 1002.0, 1001.0, 1000.0],
        vec!["A".into()],
        vec![vec![0.0, 1.0, 2.0, 1.0, 0.0]],
    )
    .unwrap();
    write_sample_table(&dir.path().join("data.parquet"), &table).unwrap();

    let mut cfg = config(dir.path(), "data.parquet", "result.tsv", &[(1001.0, 1003.0)]);
    cfg.label_ranges = true;
    batch::run(&cfg).unwrap();

    let text = fs::read_to_string(dir.path().join("result.tsv")).unwrap();
    assert_eq!(text, "range\tA\n1001:1003\t1.5\n");
}

#[test]
fn ragged_input_aborts_before_writing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("data.csv"), ",a,b\n3,1,1\n2,1\n1,1,1\n").unwrap();

    let cfg = config(dir.path(), "data.csv", "result.csv", &[(1.0, 3.0)]);
    let err = batch::run(&cfg).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::RaggedDataset { label, .. }) if label == "b"
    ));
    assert!(!dir.path().join("result.csv").exists());
}

#[test]
fn missing_input_is_reported() {
    let dir = TempDir::new().unwrap();
    let cfg = config(dir.path(), "absent.csv", "result.csv", &[(1.0, 3.0)]);
    let err = batch::run(&cfg).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::FileNotFound { .. })));
}

#[test]
fn strict_mode_rejects_degenerate_ranges() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("data.csv"), spectrum_csv()).unwrap();

    let mut cfg = config(dir.path(), "data.csv", "result.csv", &[(3950.0, 3990.0), (3900.0, 3901.0)]);
    cfg.degenerate = DegeneratePolicy::Error;
    let err = batch::run(&cfg).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::DegenerateRange { .. })));
}

#[test]
fn config_file_drives_the_run() {
    let dir = TempDir::new().unwrap();
    let cfg_path = dir.path().join("run.json");
    fs::write(
        &cfg_path,
        serde_json::json!({
            "input_path": dir.path().join("data.csv"),
            "output_path": dir.path().join("out.csv"),
            "bound_ranges": [[3990, 3950]],
            "delimiter": ";"
        })
        .to_string(),
    )
    .unwrap();

    // the configured delimiter applies to the input as well
    fs::write(dir.path().join("data.csv"), spectrum_csv().replace(',', ";")).unwrap();

    let cfg = RunConfig::from_file(&cfg_path).unwrap();
    let results = batch::run(&cfg).unwrap();
    assert_eq!(results.get(0, "flat"), Some(38.0));
    let text = fs::read_to_string(dir.path().join("out.csv")).unwrap();
    assert!(text.starts_with("flat;ramp\n"));
}

//! Integration tests for outlier detection and capping.
//!
//! These tests exercise the public API end to end: record sets, CSV-backed
//! data frames and reports.

use lex_outliers::{
    OutlierConfig, OutlierError, OutlierHandler, OutlierTreatment, Record, ReportGenerator,
    ReportParams, cap, cap_column, compute_bounds, detect_outliers,
};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_csv(filename: &str) -> DataFrame {
    let path = fixtures_path().join(filename);
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path))
        .expect("Failed to create CSV reader")
        .finish()
        .expect("Failed to read CSV file")
}

fn temp_output_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lex_outliers_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn random_column(rng: &mut StdRng) -> Vec<f64> {
    let len = rng.gen_range(1..60);
    (0..len)
        .map(|_| {
            if rng.gen_bool(0.05) {
                let sign = if rng.gen_bool(0.5) { -1.0 } else { 1.0 };
                sign * rng.gen_range(0.5..1.0) * f64::MAX
            } else if rng.gen_bool(0.1) {
                rng.gen_range(-1e6..1e6)
            } else {
                rng.gen_range(-50.0..50.0)
            }
        })
        .collect()
}

// ============================================================================
// Reference Examples
// ============================================================================

#[test]
fn test_reference_example_end_to_end() {
    let column = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
    let bounds = compute_bounds(&column).unwrap();
    assert_eq!((bounds.q1, bounds.q3, bounds.iqr), (2.25, 4.75, 2.5));
    assert_eq!((bounds.lower, bounds.upper), (-1.5, 8.5));

    let records: Vec<Record> = column
        .iter()
        .map(|&v| Record::new().with("value", v))
        .collect();
    let outliers = detect_outliers(&records, "value", bounds.lower, bounds.upper).unwrap();
    assert_eq!(outliers.len(), 1);
    assert_eq!(outliers[0].numeric("value").unwrap(), 100.0);

    assert_eq!(cap(100.0, bounds.lower, bounds.upper).unwrap(), 8.5);
}

#[test]
fn test_zero_spread_example() {
    let bounds = compute_bounds(&[10.0, 10.0, 10.0, 10.0]).unwrap();
    assert_eq!((bounds.lower, bounds.upper), (10.0, 10.0));

    let records: Vec<Record> = [10.0, 9.99, 10.0, 42.0]
        .iter()
        .map(|&v| Record::new().with("value", v))
        .collect();
    let outliers = detect_outliers(&records, "value", bounds.lower, bounds.upper).unwrap();
    assert_eq!(outliers.len(), 2);
    assert_eq!(cap(42.0, bounds.lower, bounds.upper).unwrap(), 10.0);
    assert_eq!(cap(9.99, bounds.lower, bounds.upper).unwrap(), 10.0);
}

// ============================================================================
// Properties Over Random Columns
// ============================================================================

#[test]
fn test_properties_hold_for_random_columns() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let column = random_column(&mut rng);
        let bounds = compute_bounds(&column).unwrap();

        // lower never exceeds upper
        assert!(bounds.lower <= bounds.upper);

        // every capped value is inside the bounds, and capping is idempotent
        let capped = cap_column(&column, &bounds).unwrap();
        assert_eq!(capped.len(), column.len());
        for &v in &capped {
            assert!(bounds.contains(v));
            assert_eq!(cap(v, bounds.lower, bounds.upper).unwrap(), v);
        }

        // detection count equals rows minus rows already within bounds
        let records: Vec<Record> = column
            .iter()
            .map(|&v| Record::new().with("x", v))
            .collect();
        let outliers = detect_outliers(&records, "x", bounds.lower, bounds.upper).unwrap();
        let within = column.iter().filter(|&&v| bounds.contains(v)).count();
        assert_eq!(outliers.len(), column.len() - within);
    }
}

#[test]
fn test_bounds_do_not_depend_on_order() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut column = random_column(&mut rng);
    let before = compute_bounds(&column).unwrap();
    column.reverse();
    assert_eq!(compute_bounds(&column).unwrap(), before);
}

#[test]
fn test_records_near_f64_limits_are_handled() {
    let mut records: Vec<Record> = [-1e308, -1e308, 1e308, 1e308, 0.0]
        .iter()
        .map(|&v| Record::new().with("x", v))
        .collect();
    let before = records.clone();

    let summary =
        OutlierHandler::handle_records(&mut records, "x", &OutlierConfig::default()).unwrap();
    assert!(summary.bounds.lower.is_finite() && summary.bounds.upper.is_finite());
    assert_eq!(summary.outlier_count(), 0);
    assert_eq!(records, before);
}

// ============================================================================
// CSV / Data Frame Tests
// ============================================================================

#[test]
fn test_sales_fixture_selected_columns() {
    let mut df = load_csv("sales.csv");
    let rows = df.height();
    let config = OutlierConfig::builder()
        .columns(["units", "revenue"])
        .build()
        .unwrap();

    let summaries = OutlierHandler::handle_numeric_columns(&mut df, &config).unwrap();
    assert_eq!(summaries.len(), 2);

    let units = &summaries[0];
    assert_eq!(units.column, "units");
    assert_eq!((units.bounds.q1, units.bounds.q3), (12.0, 15.0));
    assert_eq!((units.bounds.lower, units.bounds.upper), (7.5, 19.5));
    assert_eq!(units.outlier_rows, vec![7, 9]);
    assert_eq!((units.low_count, units.high_count), (1, 1));

    let revenue = &summaries[1];
    assert_eq!(revenue.outlier_rows, vec![7, 9]);

    // capping keeps every row
    assert_eq!(df.height(), rows);
    let capped_units = df.column("units").unwrap().f64().unwrap();
    assert_eq!(capped_units.max(), Some(19.5));
    assert_eq!(capped_units.min(), Some(7.5));

    // untouched columns stay as loaded
    assert_eq!(df.column("region").unwrap().dtype(), &DataType::String);
    assert_eq!(df.column("discount").unwrap().dtype(), &DataType::Float64);
}

#[test]
fn test_sales_fixture_flag_mode_keeps_values() {
    let mut df = load_csv("sales.csv");
    let config = OutlierConfig::builder()
        .columns(["units"])
        .treatment(OutlierTreatment::Flag)
        .build()
        .unwrap();

    let summaries = OutlierHandler::handle_numeric_columns(&mut df, &config).unwrap();
    assert_eq!(summaries[0].outlier_count(), 2);
    assert!(!summaries[0].capped);
    assert_eq!(df.column("units").unwrap().dtype(), &DataType::Int64);

    let mask = OutlierHandler::outlier_mask(&df, "units", &summaries[0].bounds).unwrap();
    assert_eq!(mask.into_iter().flatten().filter(|&b| b).count(), 2);
}

#[test]
fn test_sales_fixture_all_numeric_columns() {
    let mut df = load_csv("sales.csv");
    let summaries =
        OutlierHandler::handle_numeric_columns(&mut df, &OutlierConfig::default()).unwrap();

    let names: Vec<&str> = summaries.iter().map(|s| s.column.as_str()).collect();
    assert_eq!(names, vec!["order_id", "units", "revenue", "discount"]);
    assert_eq!(summaries[0].outlier_count(), 0);
}

#[test]
fn test_missing_values_are_rejected() {
    let mut df = load_csv("with_missing.csv");
    let config = OutlierConfig::builder().columns(["score"]).build().unwrap();

    let err = OutlierHandler::handle_numeric_columns(&mut df, &config).unwrap_err();
    assert!(matches!(err, OutlierError::InvalidInput(_)));
}

#[test]
fn test_skip_invalid_leaves_bad_columns_untouched() {
    let mut df = load_csv("with_missing.csv");
    let config = OutlierConfig::builder().skip_invalid(true).build().unwrap();

    let summaries = OutlierHandler::handle_numeric_columns(&mut df, &config).unwrap();
    let names: Vec<&str> = summaries.iter().map(|s| s.column.as_str()).collect();
    assert_eq!(names, vec!["id"]);
    assert_eq!(df.column("score").unwrap().null_count(), 1);
    assert_eq!(df.height(), 4);
}

#[test]
fn test_categorical_column_selected_explicitly() {
    let mut df = load_csv("sales.csv");
    let config = OutlierConfig::builder().columns(["region"]).build().unwrap();

    let err = OutlierHandler::handle_numeric_columns(&mut df, &config).unwrap_err();
    assert_eq!(err.error_code(), "NON_NUMERIC_COLUMN");
}

// ============================================================================
// Reporting
// ============================================================================

#[test]
fn test_report_files_are_written() {
    let out_dir = temp_output_dir("report");
    let mut df = load_csv("sales.csv");
    let config = OutlierConfig::builder()
        .columns(["units"])
        .output_dir(&out_dir)
        .build()
        .unwrap();

    let summaries = OutlierHandler::handle_numeric_columns(&mut df, &config).unwrap();
    let generator = ReportGenerator::new(config.output_dir.clone());
    let csv_path = generator.write_capped_csv(&mut df, "sales").unwrap();
    let csv_display = csv_path.display().to_string();

    let report = ReportGenerator::build_report(ReportParams {
        input_file: Some("sales.csv"),
        output_file: Some(&csv_display),
        config: &config,
        rows: df.height(),
        summaries: &summaries,
        skipped_columns: &[],
    });
    let report_path = generator.write_report_to_file(&report, "sales").unwrap();

    assert!(csv_path.ends_with("sales_capped.csv"));
    assert!(report_path.ends_with("sales_outliers.json"));

    let reread = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(csv_path))
        .unwrap()
        .finish()
        .unwrap();
    assert_eq!(reread.height(), 12);
    assert_eq!(reread.column("units").unwrap().f64().unwrap().max(), Some(19.5));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["total_outliers"], 2);
    assert_eq!(json["columns"][0]["column"], "units");

    let _ = std::fs::remove_dir_all(&out_dir);
}

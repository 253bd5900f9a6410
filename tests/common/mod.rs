//! Shared test utilities and fixture generators

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// Small credit-style sample with known category/target structure
///
/// - `target`: binary outcome, 6 bad out of 12
/// - `grade`: string categories, strongly tied to the target
/// - `region`: string categories, independent of the target
/// - `bucket`: integer categories with one null
pub fn create_scoring_dataframe() -> DataFrame {
    df! {
        "target" => [0i32, 0, 0, 0, 1, 0, 1, 1, 0, 1, 1, 1],
        "grade" => ["A", "A", "A", "A", "A", "B", "B", "B", "C", "C", "C", "C"],
        "region" => ["N", "S", "N", "S", "N", "S", "N", "S", "N", "S", "N", "S"],
        "bucket" => [Some(1i32), Some(1), Some(2), Some(2), Some(3), Some(1), Some(2), Some(3), Some(1), None, Some(3), Some(3)],
    }
    .unwrap()
}

/// Truth/score pairs whose ROC AUC is exactly 0.8
pub fn create_auc_dataframe() -> DataFrame {
    df! {
        "y_true" => [0i32, 1, 1, 0, 1, 0, 1, 0, 1, 0],
        "y_score" => [0.1f64, 0.4, 0.35, 0.8, 0.7, 0.2, 0.5, 0.3, 0.6, 0.15],
    }
    .unwrap()
}

/// Truth/score pairs whose KS statistic is 5/7
pub fn create_ks_dataframe() -> DataFrame {
    df! {
        "y_true" => [0i32, 1, 1, 0, 1, 0, 1, 1, 0, 0, 1, 0, 0],
        "y_score" => [0.1f64, 0.4, 0.35, 0.8, 0.7, 0.2, 0.5, 0.9, 0.3, 0.6, 0.4, 0.2, 0.1],
    }
    .unwrap()
}

/// A (40% null), B (100% null) and C (no nulls)
pub fn create_null_ratio_dataframe() -> DataFrame {
    df! {
        "A" => [Some(1.0f64), None, Some(3.0), None, Some(5.0)],
        "B" => [None::<f64>, None, None, None, None],
        "C" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
    }
    .unwrap()
}

/// Random categorical features (integer codes 0..5) plus a binary target
pub fn create_large_test_dataframe(rows: usize, cols: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut columns: Vec<Column> = Vec::with_capacity(cols + 1);
    let target: Vec<i32> = (0..rows).map(|_| rng.gen_range(0..2)).collect();
    columns.push(Column::new("target".into(), target));

    for i in 0..cols {
        let values: Vec<i32> = (0..rows).map(|_| rng.gen_range(0..5)).collect();
        columns.push(Column::new(format!("feature_{}", i).into(), values));
    }

    DataFrame::new(columns).unwrap()
}

/// Random scores with a binary truth column
pub fn create_random_scores(rows: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let truth: Vec<i32> = (0..rows).map(|_| rng.gen_range(0..2)).collect();
    let score: Vec<f64> = truth
        .iter()
        .map(|&t| t as f64 * 0.3 + rng.gen::<f64>())
        .collect();

    df! {
        "y_true" => truth,
        "y_score" => score,
    }
    .unwrap()
}

/// Create a temporary directory holding `file_name`
pub fn temp_path(file_name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(file_name);
    (temp_dir, path)
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let (temp_dir, csv_path) = temp_path("test_data.csv");
    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();
    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let (temp_dir, parquet_path) = temp_path("test_data.parquet");
    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();
    (temp_dir, parquet_path)
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}

/// Assert two floats agree, treating matching infinities and NaN as equal
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    if expected.is_nan() {
        assert!(actual.is_nan(), "expected NaN, got {}", actual);
    } else if expected.is_infinite() {
        assert_eq!(actual, expected);
    } else {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {} within {}, got {}",
            expected,
            tol,
            actual
        );
    }
}

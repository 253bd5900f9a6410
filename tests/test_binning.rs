//! Integration tests for the quantile binner

use polars::prelude::*;
use polarscore::pipeline::{
    compute_iv, ColumnSelection, ParallelFeatureTransformer, QuantileBinner, Remainder,
    Transformer,
};
use polarscore::ScoreError;

#[path = "common/mod.rs"]
mod common;

fn numeric_dataframe() -> DataFrame {
    df! {
        "x" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
        "n" => [1i32, 1, 1, 1, 1, 2, 2, 2, 2, 2],
        "label" => ["a", "b", "a", "b", "a", "b", "a", "b", "a", "b"],
    }
    .unwrap()
}

fn labels(df: &DataFrame, column: &str) -> Vec<Option<String>> {
    df.column(column)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect()
}

#[test]
fn test_fit_stores_breakpoints_for_numeric_columns_only() {
    let mut binner = QuantileBinner::new(4, true).unwrap();
    binner.fit(&numeric_dataframe(), None).unwrap();

    let breakpoints = binner.breakpoints().unwrap();
    assert_eq!(breakpoints.len(), 2);
    assert!(!breakpoints.contains_key("label"));

    let x = &breakpoints["x"];
    assert_eq!(x.len(), 3);
    common::assert_close(x[0], 3.25, 1e-12);
    common::assert_close(x[1], 5.5, 1e-12);
    common::assert_close(x[2], 7.75, 1e-12);
}

#[test]
fn test_transform_labels_and_passthrough() {
    let df = numeric_dataframe();
    let mut binner = QuantileBinner::new(4, true).unwrap();
    let out = binner.fit_transform(&df, None).unwrap();

    let x = labels(&out, "x");
    assert_eq!(x[0].as_deref(), Some("(-inf, 3.25]"));
    assert_eq!(x[4].as_deref(), Some("(3.25, 5.5]"));
    assert_eq!(x[9].as_deref(), Some("(7.75, inf]"));

    // Non-numeric columns are untouched
    assert!(out
        .column("label")
        .unwrap()
        .as_materialized_series()
        .equals_missing(df.column("label").unwrap().as_materialized_series()));
    common::assert_shape(&out, 10, 3);
}

#[test]
fn test_values_outside_fit_range_use_open_bins() {
    let mut binner = QuantileBinner::new(4, true).unwrap();
    binner.fit(&numeric_dataframe(), None).unwrap();

    let new = df! { "x" => [Some(-100.0f64), Some(1000.0), None] }.unwrap();
    let out = binner.transform(&new).unwrap();
    let x = labels(&out, "x");
    assert_eq!(x[0].as_deref(), Some("(-inf, 3.25]"));
    assert_eq!(x[1].as_deref(), Some("(7.75, inf]"));
    assert_eq!(x[2], None);
}

#[test]
fn test_repeated_transform_is_deterministic() {
    let df = numeric_dataframe();
    let mut binner = QuantileBinner::new(3, true).unwrap();
    binner.fit(&df, None).unwrap();

    let first = binner.transform(&df).unwrap();
    let second = binner.transform(&df).unwrap();
    assert!(first.equals_missing(&second));
}

#[test]
fn test_duplicate_quantiles_rejected_when_disallowed() {
    let df = df! { "n" => [1i32, 1, 1, 1, 1, 1, 1, 2] }.unwrap();
    let mut strict = QuantileBinner::new(4, false).unwrap();
    let err = strict.fit(&df, None).unwrap_err();
    assert!(matches!(err, ScoreError::DuplicateBreakpoints { ref column } if column == "n"));

    let mut lenient = QuantileBinner::new(4, true).unwrap();
    lenient.fit(&df, None).unwrap();
    assert_eq!(lenient.breakpoints().unwrap()["n"], vec![1.0]);
}

#[test]
fn test_breakpoints_survive_save_and_load() {
    let df = numeric_dataframe();
    let mut binner = QuantileBinner::new(4, true).unwrap();
    binner.fit(&df, None).unwrap();

    let (_dir, path) = common::temp_path("breakpoints.json");
    binner.save_breakpoints(&path).unwrap();
    let restored = QuantileBinner::load_breakpoints(&path).unwrap();

    assert_eq!(restored.q(), 4);
    assert_eq!(restored.breakpoints().unwrap(), binner.breakpoints().unwrap());
    assert!(restored
        .transform(&df)
        .unwrap()
        .equals_missing(&binner.transform(&df).unwrap()));
}

#[test]
fn test_unfitted_binner_cannot_be_saved() {
    let binner = QuantileBinner::new(4, true).unwrap();
    let (_dir, path) = common::temp_path("breakpoints.json");
    assert!(matches!(binner.save_breakpoints(&path), Err(ScoreError::NotFitted(_))));
}

#[test]
fn test_binned_feature_feeds_iv() {
    let df = df! {
        "target" => [0i32, 0, 0, 1, 0, 1, 0, 1, 1, 1],
        "score" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
    }
    .unwrap();

    let mut pft = ParallelFeatureTransformer::new(
        vec![(
            ColumnSelection::names(["score"]),
            Box::new(QuantileBinner::new(2, true).unwrap()) as Box<dyn Transformer>,
        )],
        Remainder::Passthrough,
    );
    let binned = pft.fit_transform(&df, None).unwrap();
    common::assert_has_columns(&binned, &["score", "target"]);

    // Median split at 5.5: lower half 4 good / 1 bad, upper half 1 good / 4 bad
    let iv = compute_iv(&binned, "target").unwrap();
    let expected = 2.0 * (0.8 - 0.2) * 4.0f64.ln();
    common::assert_close(iv.get("score").unwrap(), expected, 1e-12);
}

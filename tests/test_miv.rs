//! Integration tests for marginal information value

use polars::prelude::*;
use polarscore::pipeline::{compute_miv, compute_multiple_miv, compute_multiple_miv_deferred};
use polarscore::EvalOptions;

#[path = "common/mod.rs"]
mod common;

/// Scoring fixture with a model prediction that only partly follows `grade`
fn scored_dataframe() -> DataFrame {
    let mut df = common::create_scoring_dataframe();
    let pred = Column::new(
        "pred".into(),
        [0.2f64, 0.2, 0.2, 0.2, 0.2, 0.5, 0.5, 0.5, 0.6, 0.6, 0.6, 0.6],
    );
    df.with_column(pred).unwrap();
    df.drop("bucket").unwrap()
}

#[test]
fn test_miv_rows_per_category() {
    let df = scored_dataframe();
    let table = compute_miv(&df, "target", "pred", "grade").unwrap();
    assert_eq!(table.len(), 3);
    assert!(table.rows.iter().all(|r| r.feature_name == "grade"));

    // Predicted mass: good Σ(1 - p), bad Σ p
    let a = &table.rows[0];
    let total_bad_pred = 5.0 * 0.2 + 3.0 * 0.5 + 4.0 * 0.6;
    common::assert_close(a.bad_pred, 1.0 / total_bad_pred, 1e-12);
}

#[test]
fn test_miv_formula_per_row() {
    let df = scored_dataframe();
    let table = compute_miv(&df, "target", "pred", "grade").unwrap();

    for row in &table.rows {
        let expected = (row.woe_actual - row.woe_pred) * (row.bad_actual - row.good_actual);
        common::assert_close(row.miv, expected, 1e-12);
        common::assert_close(row.woe_actual, (row.bad_actual / row.good_actual).ln(), 1e-12);
    }
}

#[test]
fn test_multiple_miv_concatenates_features() {
    let df = scored_dataframe();
    let table = compute_multiple_miv(&df, "target", "pred", &EvalOptions::default()).unwrap();

    let totals = table.totals();
    let names: Vec<&str> = totals.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["grade", "region"]);
    assert_eq!(table.len(), 5);

    let single = compute_miv(&df, "target", "pred", "region").unwrap();
    let single_total: f64 = single.rows.iter().map(|r| r.miv).sum();
    common::assert_close(table.total("region").unwrap(), single_total, 1e-12);

    let out = table.to_dataframe().unwrap();
    common::assert_shape(&out, 5, 9);
    common::assert_has_columns(&out, &["feature_name", "category", "miv"]);
}

#[test]
fn test_deferred_miv_matches_eager() {
    let df = scored_dataframe();
    let eager = compute_multiple_miv(&df, "target", "pred", &EvalOptions::default()).unwrap();
    let deferred =
        compute_multiple_miv_deferred(df.lazy(), "target", "pred", EvalOptions::default())
            .unwrap()
            .collect()
            .unwrap();

    assert_eq!(eager.len(), deferred.len());
    for ((name_a, a), (name_b, b)) in eager.totals().into_iter().zip(deferred.totals()) {
        assert_eq!(name_a, name_b);
        common::assert_close(a, b, 1e-12);
    }
}

//! Ranking metrics for binary classifiers: ROC curve, ROC AUC, KS and Gini
//!
//! Everything is derived from one pass of cumulative counts over rows sorted by
//! descending score. The sort is stable and tied scores are not merged: each row adds its
//! own step to the curve. Rows where either the truth or the score is null are skipped.
//!
//! A sample without positives (or without negatives) divides by zero and yields `NaN`
//! rates; that is returned as-is.

use serde::Serialize;

use super::category::float_values;
use super::frame::TabularSource;
use crate::error::Result;

/// ROC curve points, index-aligned with rows sorted by descending score
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RocCurve {
    /// True positive rate after each row
    pub tpr: Vec<f64>,
    /// False positive rate after each row
    pub fpr: Vec<f64>,
}

impl RocCurve {
    pub fn len(&self) -> usize {
        self.tpr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tpr.is_empty()
    }

    /// Trapezoidal area under the curve; the point before the first row is (0, 0).
    pub fn auc(&self) -> f64 {
        let mut prev_tpr = 0.0;
        let mut prev_fpr = 0.0;
        let mut area = 0.0;

        for (&tpr, &fpr) in self.tpr.iter().zip(self.fpr.iter()) {
            area += (fpr - prev_fpr) * (tpr + prev_tpr) / 2.0;
            prev_tpr = tpr;
            prev_fpr = fpr;
        }

        area
    }

    /// Largest vertical gap `|tpr - fpr|`; `NaN` if any rate is `NaN` or the curve is empty.
    pub fn ks(&self) -> f64 {
        self.tpr
            .iter()
            .zip(self.fpr.iter())
            .map(|(t, f)| (t - f).abs())
            .fold(None, |acc: Option<f64>, gap| match acc {
                None => Some(gap),
                Some(a) if a.is_nan() || gap.is_nan() => Some(f64::NAN),
                Some(a) => Some(a.max(gap)),
            })
            .unwrap_or(f64::NAN)
    }
}

/// ROC curve from paired truth labels and scores.
///
/// Positives are rows with truth `1`, negatives rows with truth `0`; any other truth value
/// advances neither count.
pub fn roc_curve_from_slices(truth: &[Option<f64>], score: &[Option<f64>]) -> RocCurve {
    let mut pairs: Vec<(f64, f64)> = truth
        .iter()
        .zip(score.iter())
        .filter_map(|(t, s)| match (t, s) {
            (Some(t), Some(s)) => Some((*t, *s)),
            _ => None,
        })
        .collect();

    // Stable: tied scores keep their input order
    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));

    let positives = pairs.iter().filter(|(t, _)| *t == 1.0).count() as f64;
    let negatives = pairs.iter().filter(|(t, _)| *t == 0.0).count() as f64;

    let mut cum_tp = 0.0;
    let mut cum_fp = 0.0;
    let mut curve = RocCurve {
        tpr: Vec::with_capacity(pairs.len()),
        fpr: Vec::with_capacity(pairs.len()),
    };

    for (t, _) in &pairs {
        if *t == 1.0 {
            cum_tp += 1.0;
        } else if *t == 0.0 {
            cum_fp += 1.0;
        }
        curve.tpr.push(cum_tp / positives);
        curve.fpr.push(cum_fp / negatives);
    }

    curve
}

pub fn roc_auc_score_from_slices(truth: &[Option<f64>], score: &[Option<f64>]) -> f64 {
    roc_curve_from_slices(truth, score).auc()
}

pub fn ks_score_from_slices(truth: &[Option<f64>], score: &[Option<f64>]) -> f64 {
    roc_curve_from_slices(truth, score).ks()
}

pub fn gini_from_slices(truth: &[Option<f64>], score: &[Option<f64>]) -> f64 {
    2.0 * roc_auc_score_from_slices(truth, score) - 1.0
}

/// ROC curve of the `score` column against the binary `truth` column.
pub fn roc_curve<S: TabularSource + ?Sized>(source: &S, truth: &str, score: &str) -> Result<RocCurve> {
    let df = source.materialize(&[truth.to_string(), score.to_string()])?;
    let t = float_values(df.column(truth)?)?;
    let s = float_values(df.column(score)?)?;
    Ok(roc_curve_from_slices(&t, &s))
}

/// Area under the ROC curve.
pub fn roc_auc_score<S: TabularSource + ?Sized>(source: &S, truth: &str, score: &str) -> Result<f64> {
    Ok(roc_curve(source, truth, score)?.auc())
}

/// Kolmogorov-Smirnov statistic: `max |tpr - fpr|`.
pub fn ks_score<S: TabularSource + ?Sized>(source: &S, truth: &str, score: &str) -> Result<f64> {
    Ok(roc_curve(source, truth, score)?.ks())
}

/// Gini coefficient: `2 * AUC - 1`.
pub fn gini<S: TabularSource + ?Sized>(source: &S, truth: &str, score: &str) -> Result<f64> {
    Ok(2.0 * roc_auc_score(source, truth, score)? - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_perfect_ranking() {
        let curve = roc_curve_from_slices(&some(&[1.0, 1.0, 0.0, 0.0]), &some(&[0.9, 0.8, 0.2, 0.1]));
        assert_eq!(curve.tpr, vec![0.5, 1.0, 1.0, 1.0]);
        assert_eq!(curve.fpr, vec![0.0, 0.0, 0.5, 1.0]);
        assert!((curve.auc() - 1.0).abs() < 1e-12);
        assert!((curve.ks() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_inverted_ranking() {
        let curve = roc_curve_from_slices(&some(&[0.0, 0.0, 1.0, 1.0]), &some(&[0.9, 0.8, 0.2, 0.1]));
        assert!(curve.auc().abs() < 1e-12);
    }

    #[test]
    fn test_ties_are_not_merged() {
        // Same score: the positive listed first is counted first
        let curve = roc_curve_from_slices(&some(&[1.0, 0.0]), &some(&[0.5, 0.5]));
        assert_eq!(curve.tpr, vec![1.0, 1.0]);
        assert_eq!(curve.fpr, vec![0.0, 1.0]);
        assert!((curve.auc() - 1.0).abs() < 1e-12);

        let flipped = roc_curve_from_slices(&some(&[0.0, 1.0]), &some(&[0.5, 0.5]));
        assert!(flipped.auc().abs() < 1e-12);
    }

    #[test]
    fn test_single_class_yields_nan() {
        let curve = roc_curve_from_slices(&some(&[1.0, 1.0]), &some(&[0.3, 0.7]));
        assert!(curve.fpr.iter().all(|f| f.is_nan()));
        assert!(curve.ks().is_nan());
    }

    #[test]
    fn test_nulls_are_skipped() {
        let truth = vec![Some(1.0), None, Some(0.0), Some(1.0)];
        let score = vec![Some(0.9), Some(0.8), None, Some(0.1)];
        let curve = roc_curve_from_slices(&truth, &score);
        assert_eq!(curve.len(), 2);
    }

    #[test]
    fn test_empty_curve() {
        let curve = roc_curve_from_slices(&[], &[]);
        assert!(curve.is_empty());
        assert_eq!(curve.auc(), 0.0);
        assert!(curve.ks().is_nan());
    }

    #[test]
    fn test_dataframe_metrics() {
        let df = df! {
            "true" => [0i32, 1, 1, 0, 1, 0, 1, 0, 1, 0],
            "pred" => [0.1f64, 0.4, 0.35, 0.8, 0.7, 0.2, 0.5, 0.3, 0.6, 0.15],
        }
        .unwrap();

        let auc = roc_auc_score(&df, "true", "pred").unwrap();
        assert!((auc - 0.8).abs() < 1e-9);
        let g = gini(&df, "true", "pred").unwrap();
        assert!((g - (2.0 * auc - 1.0)).abs() < 1e-12);
        assert!(roc_auc_score(&df, "missing", "pred").is_err());
    }
}

//! Jeffrey divergence of a categorical feature against a benchmark target label
//!
//! For each distinct target value `v`, the feature's categories give a distribution
//! `p_v(c) = count(c, v) / count(v)`. The divergence between `v` and the benchmark `b` is
//! the symmetrised Kullback-Leibler form
//!
//! `J(v, b) = Σ_c (p_v(c) - p_b(c)) * ln(p_v(c) / p_b(c))`
//!
//! and the reported value is the largest `J(v, b)` over all non-benchmark values. With a
//! binary target this is simply the divergence between the two class-conditional
//! distributions.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::batch::map_features;
use super::category::{category_keys, CategoryKey};
use super::frame::{feature_columns, TabularSource};
use crate::config::{EvalOptions, ZeroCountPolicy};
use crate::error::{Result, ScoreError};

/// Divergence of one feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivergenceRow {
    pub feature_name: String,
    #[serde(rename = "divergence_value")]
    pub divergence: f64,
}

/// Divergences for a set of features, in column order
#[derive(Debug, Clone, Default, Serialize)]
pub struct DivergenceTable {
    pub rows: Vec<DivergenceRow>,
}

impl DivergenceTable {
    pub fn get(&self, feature_name: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.feature_name == feature_name)
            .map(|r| r.divergence)
    }

    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let names: Vec<&str> = self.rows.iter().map(|r| r.feature_name.as_str()).collect();
        let values: Vec<f64> = self.rows.iter().map(|r| r.divergence).collect();
        Ok(DataFrame::new(vec![
            Column::new("feature_name".into(), names),
            Column::new("divergence_value".into(), values),
        ])?)
    }
}

/// Sorted distinct non-null target labels and the resolved benchmark.
fn resolve_labels(
    targets: &[CategoryKey],
    target: &str,
    benchmark: Option<&CategoryKey>,
) -> Result<(Vec<CategoryKey>, CategoryKey)> {
    let labels: Vec<CategoryKey> = targets
        .iter()
        .filter(|k| !k.is_missing())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let benchmark = match benchmark {
        Some(b) => b.clone(),
        None => labels.first().cloned().ok_or_else(|| {
            ScoreError::InvalidArgument(format!(
                "target column '{}' has no non-null values",
                target
            ))
        })?,
    };

    if !labels.contains(&benchmark) {
        return Err(ScoreError::BenchmarkNotFound {
            benchmark: benchmark.to_string(),
            column: target.to_string(),
        });
    }

    Ok((labels, benchmark))
}

/// Maximum that lets a NaN anywhere poison the result.
fn nan_max(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some(v),
        Some(a) if a.is_nan() || v.is_nan() => Some(f64::NAN),
        Some(a) => Some(a.max(v)),
    })
}

fn divergence_from_frame(
    df: &DataFrame,
    feature: &str,
    target: &str,
    benchmark: Option<&CategoryKey>,
    policy: ZeroCountPolicy,
) -> Result<f64> {
    let features = category_keys(df.column(feature)?)?;
    let targets = category_keys(df.column(target)?)?;
    let (labels, benchmark) = resolve_labels(&targets, target, benchmark)?;

    let position: HashMap<&CategoryKey, usize> =
        labels.iter().enumerate().map(|(i, k)| (k, i)).collect();
    let bench_idx = position[&benchmark];

    // category -> count per target label, indexed by `position`
    let mut counts: BTreeMap<&CategoryKey, Vec<f64>> = BTreeMap::new();
    for (category, label) in features.iter().zip(targets.iter()) {
        let Some(&idx) = position.get(label) else {
            continue;
        };
        counts
            .entry(category)
            .or_insert_with(|| vec![0.0; labels.len()])[idx] += 1.0;
    }

    let totals: Vec<f64> = (0..labels.len())
        .map(|i| counts.values().map(|c| c[i]).sum())
        .collect();

    let contributions = (0..labels.len()).filter(|&i| i != bench_idx).map(|i| {
        counts
            .values()
            .map(|c| {
                let p_v = policy.ratio(c[i], totals[i]);
                let p_b = policy.ratio(c[bench_idx], totals[bench_idx]);
                (p_v - p_b) * (p_v / p_b).ln()
            })
            .sum::<f64>()
    });

    // A single label has nothing to diverge from
    Ok(nan_max(contributions).unwrap_or(0.0))
}

/// Jeffrey divergence of `feature` against the `benchmark` label of `target`.
///
/// Without a benchmark the smallest distinct target value is used. A benchmark that does
/// not occur in `target` fails with [`ScoreError::BenchmarkNotFound`].
pub fn jeffrey_divergence<S: TabularSource + ?Sized>(
    source: &S,
    feature: &str,
    target: &str,
    benchmark: Option<&CategoryKey>,
) -> Result<DivergenceRow> {
    let df = source.materialize(&[feature.to_string(), target.to_string()])?;
    let divergence =
        divergence_from_frame(&df, feature, target, benchmark, ZeroCountPolicy::Propagate)?;

    Ok(DivergenceRow {
        feature_name: feature.to_string(),
        divergence,
    })
}

/// Jeffrey divergence of every non-target column, one row per feature in column order.
pub fn jeffrey_divergence_all<S: TabularSource + ?Sized>(
    source: &S,
    target: &str,
    benchmark: Option<&CategoryKey>,
    opts: &EvalOptions,
) -> Result<DivergenceTable> {
    opts.validate()?;
    let features = feature_columns(source, &[target])?;
    let mut columns = features.clone();
    columns.push(target.to_string());
    let df = source.materialize(&columns)?;

    let rows = map_features(&features, opts, "Calculating divergence", |feature| {
        let divergence = divergence_from_frame(&df, feature, target, benchmark, opts.zero_counts)?;
        debug!(feature, divergence, "jeffrey divergence computed");
        Ok(DivergenceRow {
            feature_name: feature.to_string(),
            divergence,
        })
    })?;

    Ok(DivergenceTable { rows })
}

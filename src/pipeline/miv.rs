//! Marginal Information Value (MIV)
//!
//! MIV compares the WoE a feature shows against the actual outcome with the WoE it shows
//! against a model's predicted outcome:
//!
//! `miv = (woe_actual - woe_pred) * (bad_ratio_actual - good_ratio_actual)`
//!
//! Good and bad mass are `Σ (1 - y)` and `Σ y` per category, so a predicted column holding
//! probabilities contributes fractional mass; it is never thresholded here.

use std::collections::BTreeMap;

use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::batch::map_features;
use super::category::{category_keys, float_values, CategoryKey};
use super::frame::{feature_columns, Deferred, TabularSource};
use crate::config::{EvalOptions, ZeroCountPolicy};
use crate::error::Result;

/// MIV statistics for one category of one feature
#[derive(Debug, Clone, Serialize)]
pub struct MivRow {
    pub feature_name: String,
    pub category: CategoryKey,
    /// Normalized good mass under the actual outcome
    pub good_actual: f64,
    /// Normalized bad mass under the actual outcome
    pub bad_actual: f64,
    /// Normalized good mass under the predicted outcome
    pub good_pred: f64,
    /// Normalized bad mass under the predicted outcome
    pub bad_pred: f64,
    pub woe_actual: f64,
    pub woe_pred: f64,
    pub miv: f64,
}

/// Per-category MIV rows, grouped by feature in column order
#[derive(Debug, Clone, Default, Serialize)]
pub struct MivTable {
    pub rows: Vec<MivRow>,
}

impl MivTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows belonging to `feature_name`.
    pub fn feature(&self, feature_name: &str) -> impl Iterator<Item = &MivRow> {
        let name = feature_name.to_string();
        self.rows.iter().filter(move |r| r.feature_name == name)
    }

    /// Summed MIV of one feature, if present.
    pub fn total(&self, feature_name: &str) -> Option<f64> {
        let mut rows = self.feature(feature_name).peekable();
        rows.peek()?;
        Some(rows.map(|r| r.miv).sum())
    }

    /// Summed MIV per feature, in the order features first appear.
    pub fn totals(&self) -> Vec<(String, f64)> {
        let mut totals: Vec<(String, f64)> = Vec::new();
        for row in &self.rows {
            match totals.last_mut() {
                Some((name, sum)) if *name == row.feature_name => *sum += row.miv,
                _ => totals.push((row.feature_name.clone(), row.miv)),
            }
        }
        totals
    }

    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let names: Vec<&str> = self.rows.iter().map(|r| r.feature_name.as_str()).collect();
        let categories: Vec<Option<String>> = self.rows.iter().map(|r| r.category.label()).collect();
        let col_f64 = |name: &str, f: fn(&MivRow) -> f64| {
            Column::new(name.into(), self.rows.iter().map(f).collect::<Vec<f64>>())
        };

        Ok(DataFrame::new(vec![
            Column::new("feature_name".into(), names),
            Column::new("category".into(), categories),
            col_f64("good_actual", |r| r.good_actual),
            col_f64("bad_actual", |r| r.bad_actual),
            col_f64("good_pred", |r| r.good_pred),
            col_f64("bad_pred", |r| r.bad_pred),
            col_f64("woe_actual", |r| r.woe_actual),
            col_f64("woe_pred", |r| r.woe_pred),
            col_f64("miv", |r| r.miv),
        ])?)
    }
}

#[derive(Default)]
struct MivAccumulator {
    good_actual: f64,
    bad_actual: f64,
    good_pred: f64,
    bad_pred: f64,
}

fn miv_from_frame(
    df: &DataFrame,
    actual: &str,
    predicted: &str,
    feature: &str,
    policy: ZeroCountPolicy,
) -> Result<Vec<MivRow>> {
    let keys = category_keys(df.column(feature)?)?;
    let y = float_values(df.column(actual)?)?;
    let y_pred = float_values(df.column(predicted)?)?;

    let mut groups: BTreeMap<CategoryKey, MivAccumulator> = BTreeMap::new();
    for ((key, y), y_pred) in keys.into_iter().zip(y).zip(y_pred) {
        let acc = groups.entry(key).or_default();
        // Null outcomes add no mass, matching a null-skipping sum
        if let Some(y) = y {
            acc.good_actual += 1.0 - y;
            acc.bad_actual += y;
        }
        if let Some(p) = y_pred {
            acc.good_pred += 1.0 - p;
            acc.bad_pred += p;
        }
    }

    let total = |f: fn(&MivAccumulator) -> f64| groups.values().map(f).sum::<f64>();
    let total_good_actual = total(|a| a.good_actual);
    let total_bad_actual = total(|a| a.bad_actual);
    let total_good_pred = total(|a| a.good_pred);
    let total_bad_pred = total(|a| a.bad_pred);

    let rows = groups
        .into_iter()
        .map(|(category, acc)| {
            let good_actual = policy.ratio(acc.good_actual, total_good_actual);
            let bad_actual = policy.ratio(acc.bad_actual, total_bad_actual);
            let good_pred = policy.ratio(acc.good_pred, total_good_pred);
            let bad_pred = policy.ratio(acc.bad_pred, total_bad_pred);
            let woe_actual = (bad_actual / good_actual).ln();
            let woe_pred = (bad_pred / good_pred).ln();

            MivRow {
                feature_name: feature.to_string(),
                category,
                good_actual,
                bad_actual,
                good_pred,
                bad_pred,
                woe_actual,
                woe_pred,
                miv: (woe_actual - woe_pred) * (bad_actual - good_actual),
            }
        })
        .collect();

    Ok(rows)
}

/// Per-category MIV of `feature`, comparing the `actual` and `predicted` outcome columns.
pub fn compute_miv<S: TabularSource + ?Sized>(
    source: &S,
    actual: &str,
    predicted: &str,
    feature: &str,
) -> Result<MivTable> {
    let columns = vec![feature.to_string(), actual.to_string(), predicted.to_string()];
    let df = source.materialize(&columns)?;
    Ok(MivTable {
        rows: miv_from_frame(&df, actual, predicted, feature, ZeroCountPolicy::Propagate)?,
    })
}

fn multiple_miv_from_frame(
    df: &DataFrame,
    actual: &str,
    predicted: &str,
    features: &[String],
    opts: &EvalOptions,
) -> Result<MivTable> {
    let per_feature = map_features(features, opts, "Calculating MIV", |feature| {
        let rows = miv_from_frame(df, actual, predicted, feature, opts.zero_counts)?;
        debug!(feature, categories = rows.len(), "marginal information value computed");
        Ok(rows)
    })?;

    Ok(MivTable {
        rows: per_feature.into_iter().flatten().collect(),
    })
}

fn miv_columns<S: TabularSource + ?Sized>(
    source: &S,
    actual: &str,
    predicted: &str,
) -> Result<(Vec<String>, Vec<String>)> {
    let features = feature_columns(source, &[actual, predicted])?;
    let mut columns = features.clone();
    columns.push(actual.to_string());
    columns.push(predicted.to_string());
    Ok((features, columns))
}

/// MIV of every column other than `actual` and `predicted`, concatenated with a
/// `feature_name` discriminator. The source is materialized once for the whole batch.
pub fn compute_multiple_miv<S: TabularSource + ?Sized>(
    source: &S,
    actual: &str,
    predicted: &str,
    opts: &EvalOptions,
) -> Result<MivTable> {
    opts.validate()?;
    let (features, columns) = miv_columns(source, actual, predicted)?;
    let df = source.materialize(&columns)?;
    multiple_miv_from_frame(&df, actual, predicted, &features, opts)
}

/// Plan a multi-feature MIV batch over a lazy source; evaluated on `collect()`.
pub fn compute_multiple_miv_deferred(
    plan: LazyFrame,
    actual: &str,
    predicted: &str,
    opts: EvalOptions,
) -> Result<Deferred<MivTable>> {
    opts.validate()?;
    let (features, columns) = miv_columns(&plan, actual, predicted)?;
    let actual = actual.to_string();
    let predicted = predicted.to_string();

    Ok(Deferred::new(plan, columns, move |df: &DataFrame| {
        multiple_miv_from_frame(df, &actual, &predicted, &features, &opts)
    }))
}

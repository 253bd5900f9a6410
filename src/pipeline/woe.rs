//! Weight of Evidence (WoE) and Information Value (IV)
//!
//! For a feature column grouped into categories and a binary target:
//!
//! - `good` counts rows with target 0, `bad` counts rows with target 1
//! - each count is normalized by its own total across all categories
//! - `woe = ln(bad_ratio / good_ratio)`, so WoE > 0 marks a higher-risk category
//! - `iv = Σ woe * (bad_ratio - good_ratio)`
//!
//! A category without good rows has `woe = +inf`, one without bad rows `woe = -inf`.
//! These values are kept as-is unless [`ZeroCountPolicy::Laplace`] is requested.

use std::collections::BTreeMap;

use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::batch::map_features;
use super::category::{category_keys, float_values, CategoryKey};
use super::frame::{feature_columns, Deferred, TabularSource};
use crate::config::{EvalOptions, ZeroCountPolicy};
use crate::error::Result;

/// WoE statistics for one category of a feature
#[derive(Debug, Clone, Serialize)]
pub struct WoeRow {
    /// Category value (missing values form their own category)
    pub category: CategoryKey,
    /// Rows with target 0 in this category
    pub good_count: f64,
    /// Rows with target 1 in this category
    pub bad_count: f64,
    /// `good_count` normalized over all categories
    pub good_ratio: f64,
    /// `bad_count` normalized over all categories
    pub bad_ratio: f64,
    /// Weight of Evidence for this category
    pub woe: f64,
}

impl WoeRow {
    /// Contribution of this category to the feature's IV.
    pub fn iv_contribution(&self) -> f64 {
        self.woe * (self.bad_ratio - self.good_ratio)
    }
}

/// Per-category WoE table for a single feature, categories in ascending order
#[derive(Debug, Clone, Serialize)]
pub struct WoeTable {
    pub feature_name: String,
    pub rows: Vec<WoeRow>,
}

impl WoeTable {
    /// Information Value: sum of per-category contributions.
    pub fn iv(&self) -> f64 {
        self.rows.iter().map(WoeRow::iv_contribution).sum()
    }

    /// WoE of `category`, if it was observed.
    pub fn woe_of(&self, category: &CategoryKey) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| &row.category == category)
            .map(|row| row.woe)
    }

    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let categories: Vec<Option<String>> = self.rows.iter().map(|r| r.category.label()).collect();
        let good_count: Vec<f64> = self.rows.iter().map(|r| r.good_count).collect();
        let bad_count: Vec<f64> = self.rows.iter().map(|r| r.bad_count).collect();
        let good_ratio: Vec<f64> = self.rows.iter().map(|r| r.good_ratio).collect();
        let bad_ratio: Vec<f64> = self.rows.iter().map(|r| r.bad_ratio).collect();
        let woe: Vec<f64> = self.rows.iter().map(|r| r.woe).collect();

        Ok(DataFrame::new(vec![
            Column::new("category".into(), categories),
            Column::new("good_count".into(), good_count),
            Column::new("bad_count".into(), bad_count),
            Column::new("good_ratio".into(), good_ratio),
            Column::new("bad_ratio".into(), bad_ratio),
            Column::new("woe".into(), woe),
        ])?)
    }
}

/// Information Value of one feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IvRow {
    pub feature_name: String,
    pub iv: f64,
}

/// Information Values for a set of features, in column order
#[derive(Debug, Clone, Default, Serialize)]
pub struct IvTable {
    pub rows: Vec<IvRow>,
}

impl IvTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// IV of `feature_name`, if it was part of the batch.
    pub fn get(&self, feature_name: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.feature_name == feature_name)
            .map(|r| r.iv)
    }

    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let names: Vec<&str> = self.rows.iter().map(|r| r.feature_name.as_str()).collect();
        let ivs: Vec<f64> = self.rows.iter().map(|r| r.iv).collect();
        Ok(DataFrame::new(vec![
            Column::new("feature_name".into(), names),
            Column::new("iv".into(), ivs),
        ])?)
    }
}

/// Good/bad counts per category, accumulated in category order
pub(crate) fn good_bad_counts(
    keys: &[CategoryKey],
    targets: &[Option<f64>],
) -> BTreeMap<CategoryKey, (f64, f64)> {
    let mut counts: BTreeMap<CategoryKey, (f64, f64)> = BTreeMap::new();

    for (key, target) in keys.iter().zip(targets.iter()) {
        // Every observed category forms a group, even if its targets are all null
        let entry = counts.entry(key.clone()).or_insert((0.0, 0.0));
        match target {
            Some(t) if *t == 0.0 => entry.0 += 1.0,
            Some(t) if *t == 1.0 => entry.1 += 1.0,
            _ => {}
        }
    }

    counts
}

/// Turn grouped good/bad counts into WoE rows.
pub(crate) fn woe_rows(
    counts: BTreeMap<CategoryKey, (f64, f64)>,
    policy: ZeroCountPolicy,
) -> Vec<WoeRow> {
    let total_good: f64 = counts.values().map(|(g, _)| g).sum();
    let total_bad: f64 = counts.values().map(|(_, b)| b).sum();

    counts
        .into_iter()
        .map(|(category, (good_count, bad_count))| {
            let good_ratio = policy.ratio(good_count, total_good);
            let bad_ratio = policy.ratio(bad_count, total_bad);
            WoeRow {
                category,
                good_count,
                bad_count,
                good_ratio,
                bad_ratio,
                woe: (bad_ratio / good_ratio).ln(),
            }
        })
        .collect()
}

/// WoE table for `feature` from an already materialized frame.
fn woe_from_frame(
    df: &DataFrame,
    target: &str,
    feature: &str,
    policy: ZeroCountPolicy,
) -> Result<WoeTable> {
    let keys = category_keys(df.column(feature)?)?;
    let targets = float_values(df.column(target)?)?;

    Ok(WoeTable {
        feature_name: feature.to_string(),
        rows: woe_rows(good_bad_counts(&keys, &targets), policy),
    })
}

/// Compute the per-category WoE table of `feature` against the binary `target`.
pub fn compute_woe<S: TabularSource + ?Sized>(
    source: &S,
    target: &str,
    feature: &str,
) -> Result<WoeTable> {
    compute_woe_with(source, target, feature, ZeroCountPolicy::Propagate)
}

/// [`compute_woe`] with an explicit zero-count policy.
pub fn compute_woe_with<S: TabularSource + ?Sized>(
    source: &S,
    target: &str,
    feature: &str,
    policy: ZeroCountPolicy,
) -> Result<WoeTable> {
    let df = source.materialize(&[feature.to_string(), target.to_string()])?;
    woe_from_frame(&df, target, feature, policy)
}

fn iv_from_frame(
    df: &DataFrame,
    target: &str,
    features: &[String],
    opts: &EvalOptions,
) -> Result<IvTable> {
    let rows = map_features(features, opts, "Calculating IV", |feature| {
        let table = woe_from_frame(df, target, feature, opts.zero_counts)?;
        let iv = table.iv();
        debug!(feature, iv, categories = table.rows.len(), "information value computed");
        Ok(IvRow {
            feature_name: feature.to_string(),
            iv,
        })
    })?;

    Ok(IvTable { rows })
}

/// Information Value of every non-target column, one row per feature in column order.
pub fn compute_iv<S: TabularSource + ?Sized>(source: &S, target: &str) -> Result<IvTable> {
    compute_iv_with(source, target, &EvalOptions::default())
}

/// [`compute_iv`] with explicit evaluation options.
///
/// The source is materialized once; a lazy source therefore runs a single scan for all
/// features.
pub fn compute_iv_with<S: TabularSource + ?Sized>(
    source: &S,
    target: &str,
    opts: &EvalOptions,
) -> Result<IvTable> {
    opts.validate()?;
    let features = feature_columns(source, &[target])?;
    let mut columns = features.clone();
    columns.push(target.to_string());

    let df = source.materialize(&columns)?;
    iv_from_frame(&df, target, &features, opts)
}

/// Plan an IV batch over a lazy source without evaluating it.
///
/// Only the schema is resolved here; the data is scanned when the returned
/// [`Deferred`] is collected.
pub fn compute_iv_deferred(
    plan: LazyFrame,
    target: &str,
    opts: EvalOptions,
) -> Result<Deferred<IvTable>> {
    opts.validate()?;
    let features = feature_columns(&plan, &[target])?;
    let mut columns = features.clone();
    columns.push(target.to_string());

    let target = target.to_string();
    Ok(Deferred::new(plan, columns, move |df: &DataFrame| {
        iv_from_frame(df, &target, &features, &opts)
    }))
}

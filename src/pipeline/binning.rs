//! Quantile binning of numeric columns
//!
//! `fit` computes `q`-quantile cut points per numeric column (linear interpolation on the
//! non-null values), keeps only the cut points that close an occupied bin, drops infinite
//! ones and stores them sorted. `transform` maps every value of a fitted column to the
//! label of its right-closed bin: `(-inf, c0]`, `(c0, c1]`, ..., `(ck, inf]`. Values below
//! the first or above the last cut point land in the open-ended outer bins.

use std::collections::BTreeMap;
use std::path::Path;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::category::float_values;
use super::transform::Transformer;
use crate::error::{Result, ScoreError};

/// Linear-interpolation quantile of already sorted values.
fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    let idx = (n - 1) as f64 * p;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (idx - lower as f64)
}

/// Cut points for `q` equal-frequency bins over `values`.
///
/// Nulls and NaN are ignored. With `allow_duplicates == false`, quantiles that collapse
/// onto the same value are an error; otherwise they are merged. Only cut points whose bin
/// receives at least one value are returned, in ascending order.
pub fn qcut_breakpoints(
    values: &[Option<f64>],
    q: usize,
    allow_duplicates: bool,
    column: &str,
) -> Result<Vec<f64>> {
    let mut sorted: Vec<f64> = values.iter().flatten().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return Ok(Vec::new());
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut cuts: Vec<f64> = (1..q)
        .map(|i| quantile_sorted(&sorted, i as f64 / q as f64))
        .collect();

    let before = cuts.len();
    cuts.dedup();
    if !allow_duplicates && cuts.len() != before {
        return Err(ScoreError::DuplicateBreakpoints {
            column: column.to_string(),
        });
    }

    // Keep the cut points that are the upper edge of an occupied bin
    let mut lower = f64::NEG_INFINITY;
    let mut used = Vec::with_capacity(cuts.len());
    for &cut in &cuts {
        let start = sorted.partition_point(|&v| v <= lower);
        let end = sorted.partition_point(|&v| v <= cut);
        if end > start {
            used.push(cut);
        }
        lower = cut;
    }

    Ok(used.into_iter().filter(|c| c.is_finite()).collect())
}

/// Label of the right-closed bin that contains `value`.
fn bin_label(value: f64, cuts: &[f64]) -> String {
    let idx = cuts.partition_point(|&c| c < value);
    let lower = if idx == 0 { f64::NEG_INFINITY } else { cuts[idx - 1] };
    let upper = cuts.get(idx).copied().unwrap_or(f64::INFINITY);
    format!("({}, {}]", lower, upper)
}

/// Bins numeric columns into quantile-based intervals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantileBinner {
    q: usize,
    allow_duplicates: bool,
    breakpoints: Option<BTreeMap<String, Vec<f64>>>,
}

impl QuantileBinner {
    /// Create an unfitted binner with `q` quantile buckets.
    pub fn new(q: usize, allow_duplicates: bool) -> Result<Self> {
        if q == 0 {
            return Err(ScoreError::InvalidArgument(
                "number of quantiles must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            q,
            allow_duplicates,
            breakpoints: None,
        })
    }

    pub fn q(&self) -> usize {
        self.q
    }

    pub fn allow_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    pub fn is_fitted(&self) -> bool {
        self.breakpoints.is_some()
    }

    /// Fitted cut points per column.
    pub fn breakpoints(&self) -> Result<&BTreeMap<String, Vec<f64>>> {
        self.breakpoints
            .as_ref()
            .ok_or(ScoreError::NotFitted("QuantileBinner"))
    }

    /// Write the fitted binner (including its breakpoints) as JSON.
    pub fn save_breakpoints(&self, path: &Path) -> Result<()> {
        self.breakpoints()?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Restore a binner written by [`QuantileBinner::save_breakpoints`].
    pub fn load_breakpoints(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl Transformer for QuantileBinner {
    fn fit(&mut self, df: &DataFrame, _target: Option<&Column>) -> Result<()> {
        let numeric: Vec<&Column> = df
            .get_columns()
            .iter()
            .filter(|c| c.dtype().is_primitive_numeric())
            .collect();

        if numeric.is_empty() {
            return Err(ScoreError::NoNumericColumns);
        }

        let mut breakpoints = BTreeMap::new();
        for column in numeric {
            let name = column.name().to_string();
            let values = float_values(column)?;
            let cuts = qcut_breakpoints(&values, self.q, self.allow_duplicates, &name)?;
            debug!(column = %name, breakpoints = cuts.len(), "quantile breakpoints fitted");
            breakpoints.insert(name, cuts);
        }

        self.breakpoints = Some(breakpoints);
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let breakpoints = self.breakpoints()?;

        let columns = df
            .get_columns()
            .iter()
            .map(|column| -> Result<Column> {
                match breakpoints.get(column.name().as_str()) {
                    Some(cuts) => {
                        let labels: Vec<Option<String>> = float_values(column)?
                            .into_iter()
                            .map(|v| v.filter(|x| !x.is_nan()).map(|x| bin_label(x, cuts)))
                            .collect();
                        Ok(Column::new(column.name().clone(), labels))
                    }
                    None => Ok(column.clone()),
                }
            })
            .collect::<Result<Vec<Column>>>()?;

        Ok(DataFrame::new(columns)?)
    }
}

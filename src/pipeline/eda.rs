//! Exploratory statistics on columns and frames

use std::collections::HashMap;

use polars::prelude::*;

use super::category::{category_keys, CategoryKey};
use crate::error::Result;

/// Column-level exploratory statistics.
///
/// Methods that would collide with inherent `Column` methods carry an `eda_` prefix.
pub trait EdaExt {
    /// Number of null values.
    fn eda_null_count(&self) -> usize;

    /// Share of null values; `NaN` for an empty column.
    fn null_ratio(&self) -> f64;

    /// Number of distinct values, null counted as one value.
    fn eda_n_unique(&self) -> Result<usize>;

    /// Share of rows equal to the most frequent value.
    ///
    /// Null competes for the mode like any other value; when it is strictly the most
    /// frequent the ratio is `NaN`, since nothing equals a null mode. With `ignore_nulls`
    /// the denominator is the non-null count; otherwise nulls count as rows that differ
    /// from the mode. `NaN` when the denominator is zero.
    fn identical_ratio(&self, ignore_nulls: bool) -> Result<f64>;
}

impl EdaExt for Column {
    fn eda_null_count(&self) -> usize {
        self.null_count()
    }

    fn null_ratio(&self) -> f64 {
        self.null_count() as f64 / self.len() as f64
    }

    fn eda_n_unique(&self) -> Result<usize> {
        Ok(self.as_materialized_series().n_unique()?)
    }

    fn identical_ratio(&self, ignore_nulls: bool) -> Result<f64> {
        let mut counts: HashMap<CategoryKey, usize> = HashMap::new();
        for key in category_keys(self)? {
            if !key.is_missing() {
                *counts.entry(key).or_default() += 1;
            }
        }

        let mode_count = counts.values().copied().max().unwrap_or(0);
        if self.null_count() > mode_count {
            return Ok(f64::NAN);
        }

        let denominator = if ignore_nulls {
            self.len() - self.null_count()
        } else {
            self.len()
        };

        Ok(mode_count as f64 / denominator as f64)
    }
}

/// Per-column exploratory tables over a whole frame.
pub trait EdaFrameExt {
    /// Long table `{var, null_count}`, one row per column in schema order.
    fn eda_null_count(&self) -> Result<DataFrame>;

    /// Long table `{var, null_ratio}`, one row per column in schema order.
    fn eda_null_ratio(&self) -> Result<DataFrame>;
}

impl EdaFrameExt for DataFrame {
    fn eda_null_count(&self) -> Result<DataFrame> {
        let vars: Vec<&str> = self.get_columns().iter().map(|c| c.name().as_str()).collect();
        let counts: Vec<u32> = self
            .get_columns()
            .iter()
            .map(|c| c.null_count() as u32)
            .collect();

        Ok(DataFrame::new(vec![
            Column::new("var".into(), vars),
            Column::new("null_count".into(), counts),
        ])?)
    }

    fn eda_null_ratio(&self) -> Result<DataFrame> {
        let vars: Vec<&str> = self.get_columns().iter().map(|c| c.name().as_str()).collect();
        let ratios: Vec<f64> = self.get_columns().iter().map(|c| c.null_ratio()).collect();

        Ok(DataFrame::new(vec![
            Column::new("var".into(), vars),
            Column::new("null_ratio".into(), ratios),
        ])?)
    }
}

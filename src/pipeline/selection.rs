//! Column selectors that drop sparse or near-constant features

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::eda::EdaExt;
use super::transform::Transformer;
use crate::config::validate_threshold;
use crate::error::{Result, ScoreError};

/// Default threshold of both ratio selectors.
pub const DEFAULT_THRESHOLD: f64 = 0.95;

/// A fitted selector that knows which columns to remove.
pub trait ColumnSelector {
    /// Columns identified for removal during fit.
    fn columns_to_drop(&self) -> Result<&[String]>;
}

/// Drop the selector's columns from `df`. Columns already absent are ignored.
pub fn drop_selected<S: ColumnSelector + ?Sized>(df: &DataFrame, selector: &S) -> Result<DataFrame> {
    let to_drop = selector.columns_to_drop()?;
    let keep: Vec<&str> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .filter(|name| !to_drop.iter().any(|d| d == name))
        .collect();
    Ok(df.select(keep)?)
}

/// Drops columns whose share of nulls is at or above `threshold`.
///
/// # Example
/// A (40% null), B (100% null) and C (no nulls) with the default threshold of 0.95
/// drop only B.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NullRatioThreshold {
    threshold: f64,
    cols_to_drop: Option<Vec<String>>,
}

impl NullRatioThreshold {
    pub fn new(threshold: f64) -> Result<Self> {
        Ok(Self {
            threshold: validate_threshold(threshold)?,
            cols_to_drop: None,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for NullRatioThreshold {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            cols_to_drop: None,
        }
    }
}

impl ColumnSelector for NullRatioThreshold {
    fn columns_to_drop(&self) -> Result<&[String]> {
        self.cols_to_drop
            .as_deref()
            .ok_or(ScoreError::NotFitted("NullRatioThreshold"))
    }
}

impl Transformer for NullRatioThreshold {
    fn fit(&mut self, df: &DataFrame, _target: Option<&Column>) -> Result<()> {
        // An empty frame has no ratios to compare
        let drop: Vec<String> = if df.height() == 0 {
            Vec::new()
        } else {
            df.get_columns()
                .iter()
                .filter(|c| c.null_ratio() >= self.threshold)
                .map(|c| c.name().to_string())
                .collect()
        };

        debug!(threshold = self.threshold, dropped = drop.len(), "null ratio selector fitted");
        self.cols_to_drop = Some(drop);
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        drop_selected(df, self)
    }
}

/// Drops columns where the most frequent value covers more than `threshold` of the
/// non-null rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeRatioThreshold {
    threshold: f64,
    cols_to_drop: Option<Vec<String>>,
}

impl ModeRatioThreshold {
    pub fn new(threshold: f64) -> Result<Self> {
        Ok(Self {
            threshold: validate_threshold(threshold)?,
            cols_to_drop: None,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for ModeRatioThreshold {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            cols_to_drop: None,
        }
    }
}

impl ColumnSelector for ModeRatioThreshold {
    fn columns_to_drop(&self) -> Result<&[String]> {
        self.cols_to_drop
            .as_deref()
            .ok_or(ScoreError::NotFitted("ModeRatioThreshold"))
    }
}

impl Transformer for ModeRatioThreshold {
    fn fit(&mut self, df: &DataFrame, _target: Option<&Column>) -> Result<()> {
        let mut drop = Vec::new();
        for column in df.get_columns() {
            // NaN (all-null column) never exceeds the threshold
            if column.identical_ratio(true)? > self.threshold {
                drop.push(column.name().to_string());
            }
        }

        debug!(threshold = self.threshold, dropped = drop.len(), "mode ratio selector fitted");
        self.cols_to_drop = Some(drop);
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        drop_selected(df, self)
    }
}

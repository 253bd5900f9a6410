//! Error types for the scoring primitives.
//!
//! Dataset-level failures (a column that does not exist, a cast that polars refuses) are
//! passed through untouched as [`ScoreError::Polars`]. Degenerate numerics such as a
//! `ln(0)` inside a WoE are *not* errors; they surface as `inf`/`NaN` in the result tables.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised by the scoring, binning and selection APIs.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// An argument is outside the set of values the operation accepts.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested benchmark label does not occur in the target column.
    #[error("benchmark value '{benchmark}' not found in unique values of '{column}'")]
    BenchmarkNotFound {
        /// Benchmark label as supplied by the caller
        benchmark: String,
        /// Target column that was searched
        column: String,
    },

    /// `transform` (or a fitted accessor) was called before `fit`.
    #[error("{0} is not fitted yet; call fit before using it")]
    NotFitted(&'static str),

    /// Quantile fitting requires at least one numeric column.
    #[error("input DataFrame contains no numeric columns")]
    NoNumericColumns,

    /// Quantile cut produced repeated breakpoints while duplicates were disallowed.
    #[error("quantile breakpoints for column '{column}' are not unique; enable allow_duplicates")]
    DuplicateBreakpoints {
        /// Column whose quantiles collapsed
        column: String,
    },

    /// A category seen at transform time has no fitted mapping.
    #[error("category '{value}' of column '{column}' was not seen during fit")]
    UnknownCategory {
        /// Column being transformed
        column: String,
        /// Offending category, rendered for display
        value: String,
    },

    /// Errors from the dataframe engine, including missing columns.
    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScoreError>;

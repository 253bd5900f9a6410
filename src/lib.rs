//! polarscore: credit-scoring feature statistics on polars data
//!
//! Weight of evidence, information value, marginal information value and Jeffrey
//! divergence for categorical features; ROC AUC, KS and Gini for scored samples; and a
//! small fit/transform layer (quantile binning, WoE encoding, null/mode-ratio selection)
//! for preparing features. Every engine accepts an eager `DataFrame` or a lazy
//! `LazyFrame`.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use config::{EvalOptions, ZeroCountPolicy};
pub use error::{Result, ScoreError};

//! Evaluation options shared by the WoE/IV, MIV and divergence engines

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoreError};

/// How zero counts are treated before ratios enter a logarithm.
///
/// The default keeps the raw ratios, so a category without "good" rows yields `+inf`
/// WoE and a category without "bad" rows yields `-inf`. `Laplace(s)` applies
/// `(count + s) / (total + s)` to every ratio instead.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ZeroCountPolicy {
    #[default]
    Propagate,
    Laplace(f64),
}

impl ZeroCountPolicy {
    /// Normalize `count` against `total` under this policy.
    pub fn ratio(&self, count: f64, total: f64) -> f64 {
        match self {
            ZeroCountPolicy::Propagate => count / total,
            ZeroCountPolicy::Laplace(s) => (count + s) / (total + s),
        }
    }
}

impl std::fmt::Display for ZeroCountPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZeroCountPolicy::Propagate => write!(f, "propagate"),
            ZeroCountPolicy::Laplace(s) => write!(f, "laplace({})", s),
        }
    }
}

/// Options for batch evaluation over many feature columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalOptions {
    /// Treatment of zero counts inside logarithms
    pub zero_counts: ZeroCountPolicy,
    /// Fan per-feature work out over the rayon thread pool
    pub parallel: bool,
    /// Draw a progress bar while features are processed
    pub show_progress: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            zero_counts: ZeroCountPolicy::Propagate,
            parallel: true,
            show_progress: false,
        }
    }
}

impl EvalOptions {
    pub fn with_zero_counts(mut self, policy: ZeroCountPolicy) -> Self {
        self.zero_counts = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Reject smoothing constants that are negative or not finite.
    pub fn validate(&self) -> Result<()> {
        if let ZeroCountPolicy::Laplace(s) = self.zero_counts {
            if !s.is_finite() || s < 0.0 {
                return Err(ScoreError::InvalidArgument(format!(
                    "Laplace smoothing must be a finite non-negative number, got {}",
                    s
                )));
            }
        }
        Ok(())
    }
}

/// Validate a selector threshold; ratios live in [0, 1].
pub(crate) fn validate_threshold(threshold: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&threshold) {
        Err(ScoreError::InvalidArgument(format!(
            "threshold must be between 0.0 and 1.0, got {}",
            threshold
        )))
    } else {
        Ok(threshold)
    }
}

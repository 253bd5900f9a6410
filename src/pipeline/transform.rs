//! Fit/transform lifecycle and side-by-side composition of transformers

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScoreError};

/// Minimal fit/transform protocol shared by binners, selectors and encoders.
pub trait Transformer: Send + Sync {
    /// Learn state from `df`. Supervised transformers read `target`; others ignore it.
    fn fit(&mut self, df: &DataFrame, target: Option<&Column>) -> Result<()>;

    /// Apply the fitted state to `df`, keeping its row count.
    fn transform(&self, df: &DataFrame) -> Result<DataFrame>;

    fn fit_transform(&mut self, df: &DataFrame, target: Option<&Column>) -> Result<DataFrame> {
        self.fit(df, target)?;
        self.transform(df)
    }
}

/// Which columns a composed transformer receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnSelection {
    /// Explicit column names, in the given order
    Names(Vec<String>),
    /// Every numeric column
    Numeric,
    /// Every column
    All,
}

impl ColumnSelection {
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ColumnSelection::Names(names.into_iter().map(Into::into).collect())
    }

    /// Resolve against the schema of `df`.
    pub fn resolve(&self, df: &DataFrame) -> Vec<String> {
        match self {
            ColumnSelection::Names(names) => names.clone(),
            ColumnSelection::Numeric => df
                .get_columns()
                .iter()
                .filter(|c| c.dtype().is_primitive_numeric())
                .map(|c| c.name().to_string())
                .collect(),
            ColumnSelection::All => df
                .get_column_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// What happens to columns no transformer selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Remainder {
    #[default]
    Drop,
    Passthrough,
}

impl FromStr for Remainder {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "drop" => Ok(Remainder::Drop),
            "passthrough" => Ok(Remainder::Passthrough),
            _ => Err(ScoreError::InvalidArgument(format!(
                "remainder must be 'drop' or 'passthrough', got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for Remainder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Remainder::Drop => write!(f, "drop"),
            Remainder::Passthrough => write!(f, "passthrough"),
        }
    }
}

/// One composed step: a column selection and the transformer it feeds.
pub type TransformerStep = (ColumnSelection, Box<dyn Transformer>);

/// Applies each transformer to its own column subset and concatenates the outputs
/// horizontally, followed by the remainder columns when they are passed through.
///
/// Output column names must be unique across all steps; a clash is reported by polars.
pub struct ParallelFeatureTransformer {
    steps: Vec<TransformerStep>,
    remainder: Remainder,
    remainder_cols: Option<Vec<String>>,
}

impl ParallelFeatureTransformer {
    pub fn new(steps: Vec<TransformerStep>, remainder: Remainder) -> Self {
        Self {
            steps,
            remainder,
            remainder_cols: None,
        }
    }

    pub fn remainder(&self) -> Remainder {
        self.remainder
    }

    /// Columns passed through untouched; empty with [`Remainder::Drop`].
    pub fn remainder_columns(&self) -> Result<&[String]> {
        self.remainder_cols
            .as_deref()
            .ok_or(ScoreError::NotFitted("ParallelFeatureTransformer"))
    }
}

impl fmt::Debug for ParallelFeatureTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selections: Vec<&ColumnSelection> = self.steps.iter().map(|(s, _)| s).collect();
        f.debug_struct("ParallelFeatureTransformer")
            .field("steps", &selections)
            .field("remainder", &self.remainder)
            .field("remainder_cols", &self.remainder_cols)
            .finish()
    }
}

impl Transformer for ParallelFeatureTransformer {
    fn fit(&mut self, df: &DataFrame, target: Option<&Column>) -> Result<()> {
        let used: Vec<Vec<String>> = self
            .steps
            .par_iter_mut()
            .map(|(selection, transformer)| -> Result<Vec<String>> {
                let columns = selection.resolve(df);
                let subset = df.select(columns.iter().map(|c| c.as_str()))?;
                transformer.fit(&subset, target)?;
                Ok(columns)
            })
            .collect::<Result<_>>()?;

        let used: HashSet<String> = used.into_iter().flatten().collect();
        let remainder_cols = match self.remainder {
            Remainder::Drop => Vec::new(),
            Remainder::Passthrough => df
                .get_column_names()
                .iter()
                .map(|s| s.to_string())
                .filter(|name| !used.contains(name))
                .collect(),
        };

        debug!(
            steps = self.steps.len(),
            remainder = %self.remainder,
            passthrough = remainder_cols.len(),
            "parallel feature transformer fitted"
        );
        self.remainder_cols = Some(remainder_cols);
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let remainder_cols = self.remainder_columns()?;

        let outputs: Vec<DataFrame> = self
            .steps
            .par_iter()
            .map(|(selection, transformer)| -> Result<DataFrame> {
                let columns = selection.resolve(df);
                let subset = df.select(columns.iter().map(|c| c.as_str()))?;
                transformer.transform(&subset)
            })
            .collect::<Result<_>>()?;

        let mut columns: Vec<Column> = outputs
            .into_iter()
            .flat_map(|out| out.take_columns())
            .collect();
        for name in remainder_cols {
            columns.push(df.column(name)?.clone());
        }

        Ok(DataFrame::new(columns)?)
    }
}

//! Eager and lazy dataset sources
//!
//! Every engine in this crate reads its input through [`TabularSource`]. An eager
//! `DataFrame` projects the requested columns immediately; a `LazyFrame` resolves its
//! schema without scanning and is collected exactly once per engine call, so a batch
//! over many features costs one evaluation of the query plan rather than one per feature.

use polars::prelude::*;

use crate::error::Result;

/// Minimal capability the scoring engines need from a dataset.
pub trait TabularSource {
    /// Column names in schema order.
    fn column_names(&self) -> Result<Vec<String>>;

    /// Evaluate the source and keep only `columns`, in the given order.
    fn materialize(&self, columns: &[String]) -> Result<DataFrame>;
}

impl TabularSource for DataFrame {
    fn column_names(&self) -> Result<Vec<String>> {
        Ok(self
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect())
    }

    fn materialize(&self, columns: &[String]) -> Result<DataFrame> {
        Ok(self.select(columns.iter().map(|c| c.as_str()))?)
    }
}

impl TabularSource for LazyFrame {
    fn column_names(&self) -> Result<Vec<String>> {
        let mut lf = self.clone();
        let schema = lf.collect_schema()?;
        Ok(schema.iter_names().map(|s| s.to_string()).collect())
    }

    fn materialize(&self, columns: &[String]) -> Result<DataFrame> {
        let exprs: Vec<Expr> = columns.iter().map(|c| col(c.as_str())).collect();
        Ok(self.clone().select(exprs).collect()?)
    }
}

/// Column names of an eager or lazy dataset.
pub fn column_names<S: TabularSource + ?Sized>(source: &S) -> Result<Vec<String>> {
    source.column_names()
}

/// Feature columns of `source`: every column except those in `exclude`, in schema order.
pub(crate) fn feature_columns<S: TabularSource + ?Sized>(
    source: &S,
    exclude: &[&str],
) -> Result<Vec<String>> {
    Ok(source
        .column_names()?
        .into_iter()
        .filter(|name| !exclude.contains(&name.as_str()))
        .collect())
}

type Compute<T> = Box<dyn FnOnce(&DataFrame) -> Result<T> + Send>;

/// A computation over a lazy query plan that runs when [`Deferred::collect`] is called.
///
/// The plan is projected to the columns the computation reads and evaluated once; every
/// per-feature result is then derived from that single materialization.
pub struct Deferred<T> {
    plan: LazyFrame,
    columns: Vec<String>,
    compute: Compute<T>,
}

impl<T> Deferred<T> {
    pub(crate) fn new<F>(plan: LazyFrame, columns: Vec<String>, compute: F) -> Self
    where
        F: FnOnce(&DataFrame) -> Result<T> + Send + 'static,
    {
        Self {
            plan,
            columns,
            compute: Box::new(compute),
        }
    }

    /// Columns the plan will be projected to.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Evaluate the plan and run the computation.
    pub fn collect(self) -> Result<T> {
        let df = self.plan.materialize(&self.columns)?;
        (self.compute)(&df)
    }
}

impl<T> std::fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deferred")
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

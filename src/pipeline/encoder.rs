//! Weight-of-evidence encoding of categorical features

use std::collections::{BTreeMap, HashMap};

use polars::prelude::*;
use tracing::debug;

use super::category::{category_keys, float_values, CategoryKey};
use super::transform::Transformer;
use super::woe::{good_bad_counts, woe_rows, WoeTable};
use crate::config::ZeroCountPolicy;
use crate::error::{Result, ScoreError};

/// Replaces every category with the WoE it had against the target at fit time.
///
/// Replacement is strict: a category never seen during fit is an error. A null value is
/// encoded with the WoE of the missing group when one was fitted and stays null otherwise.
/// Columns that were not part of the fitted frame pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct WoeEncoder {
    policy: ZeroCountPolicy,
    tables: Option<BTreeMap<String, WoeTable>>,
}

impl WoeEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoder whose WoE values are computed under `policy`.
    pub fn with_policy(policy: ZeroCountPolicy) -> Self {
        Self {
            policy,
            tables: None,
        }
    }

    /// Fitted WoE tables keyed by column name.
    pub fn tables(&self) -> Result<&BTreeMap<String, WoeTable>> {
        self.tables.as_ref().ok_or(ScoreError::NotFitted("WoeEncoder"))
    }

    fn encode(&self, column: &Column, table: &WoeTable) -> Result<Column> {
        let lookup: HashMap<&CategoryKey, f64> =
            table.rows.iter().map(|r| (&r.category, r.woe)).collect();

        let encoded = category_keys(column)?
            .iter()
            .map(|key| match lookup.get(key) {
                Some(woe) => Ok(Some(*woe)),
                None if key.is_missing() => Ok(None),
                None => Err(ScoreError::UnknownCategory {
                    column: column.name().to_string(),
                    value: key.to_string(),
                }),
            })
            .collect::<Result<Vec<Option<f64>>>>()?;

        Ok(Column::new(column.name().clone(), encoded))
    }
}

impl Transformer for WoeEncoder {
    fn fit(&mut self, df: &DataFrame, target: Option<&Column>) -> Result<()> {
        let target = target.ok_or_else(|| {
            ScoreError::InvalidArgument("WoeEncoder requires a target column".to_string())
        })?;
        if target.len() != df.height() {
            return Err(ScoreError::InvalidArgument(format!(
                "target has {} rows but the frame has {}",
                target.len(),
                df.height()
            )));
        }

        let targets = float_values(target)?;
        let mut tables = BTreeMap::new();
        for column in df.get_columns() {
            if column.name() == target.name() {
                continue;
            }
            let keys = category_keys(column)?;
            let table = WoeTable {
                feature_name: column.name().to_string(),
                rows: woe_rows(good_bad_counts(&keys, &targets), self.policy),
            };
            debug!(column = %column.name(), categories = table.rows.len(), "woe mapping fitted");
            tables.insert(column.name().to_string(), table);
        }

        self.tables = Some(tables);
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let tables = self.tables()?;

        let columns = df
            .get_columns()
            .iter()
            .map(|column| match tables.get(column.name().as_str()) {
                Some(table) => self.encode(column, table),
                None => Ok(column.clone()),
            })
            .collect::<Result<Vec<Column>>>()?;

        Ok(DataFrame::new(columns)?)
    }
}

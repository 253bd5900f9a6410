//! JSON export of scoring results

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::config::EvalOptions;
use crate::pipeline::{DivergenceTable, IvTable, MivTable};

use super::summary::{IvStrength, RankingSummary};

/// Metadata about the scoring run
#[derive(Debug, Serialize)]
pub struct ExportMetadata {
    /// Timestamp of the export (ISO 8601)
    pub timestamp: String,
    pub polarscore_version: String,
    /// Dataset the results were computed from, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_file: Option<String>,
    pub target_column: String,
    /// Zero-count treatment used for the logarithms
    pub zero_counts: String,
}

impl ExportMetadata {
    pub fn new(target_column: &str, input_file: Option<&Path>, opts: &EvalOptions) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            polarscore_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.map(|p| p.display().to_string()),
            target_column: target_column.to_string(),
            zero_counts: opts.zero_counts.to_string(),
        }
    }
}

/// One feature's IV with its conventional reading
#[derive(Debug, Serialize)]
pub struct IvExportEntry {
    pub feature_name: String,
    /// `null` in the JSON when the value is infinite or undefined
    pub iv: f64,
    pub strength: IvStrength,
}

/// Per-feature MIV total
#[derive(Debug, Serialize)]
pub struct MivExportEntry {
    pub feature_name: String,
    pub miv: f64,
}

/// Everything a scoring run produced, ready for `serde_json`.
///
/// Sections that were not computed are omitted from the output.
#[derive(Debug, Serialize)]
pub struct ScoringExport {
    pub metadata: ExportMetadata,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub information_value: Vec<IvExportEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub marginal_information_value: Vec<MivExportEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub divergence: Option<DivergenceTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking: Option<RankingSummary>,
}

impl ScoringExport {
    pub fn new(metadata: ExportMetadata) -> Self {
        Self {
            metadata,
            information_value: Vec::new(),
            marginal_information_value: Vec::new(),
            divergence: None,
            ranking: None,
        }
    }

    pub fn with_iv(mut self, iv: &IvTable) -> Self {
        self.information_value = iv
            .rows
            .iter()
            .map(|row| IvExportEntry {
                feature_name: row.feature_name.clone(),
                iv: row.iv,
                strength: IvStrength::from_iv(row.iv),
            })
            .collect();
        self
    }

    pub fn with_miv(mut self, miv: &MivTable) -> Self {
        self.marginal_information_value = miv
            .totals()
            .into_iter()
            .map(|(feature_name, miv)| MivExportEntry { feature_name, miv })
            .collect();
        self
    }

    pub fn with_divergence(mut self, divergence: &DivergenceTable) -> Self {
        self.divergence = Some(divergence.clone());
        self
    }

    pub fn with_ranking(mut self, ranking: RankingSummary) -> Self {
        self.ranking = Some(ranking);
        self
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize scoring results to JSON")
    }

    /// Write the export as pretty-printed JSON to `output_path`.
    pub fn write(&self, output_path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(output_path, json).with_context(|| {
            format!("Failed to write scoring results to {}", output_path.display())
        })?;
        Ok(())
    }
}

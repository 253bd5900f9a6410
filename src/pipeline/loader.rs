//! Dataset loading and writing for CSV and Parquet files

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::debug;

/// On-disk dataset formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Parquet,
}

impl DatasetFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "csv" => Ok(DatasetFormat::Csv),
            "parquet" => Ok(DatasetFormat::Parquet),
            _ => anyhow::bail!(
                "Unsupported file format: '{}'. Supported formats: csv, parquet",
                extension
            ),
        }
    }
}

/// Scan a dataset lazily; nothing is read until the plan is collected.
pub fn load_dataset(path: &Path) -> Result<LazyFrame> {
    let lf = match DatasetFormat::from_path(path)? {
        DatasetFormat::Csv => LazyCsvReader::new(path)
            .with_has_header(true)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        DatasetFormat::Parquet => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
    };

    debug!(path = %path.display(), "dataset scan planned");
    Ok(lf)
}

/// Write `df` to `path` in the format implied by its extension.
pub fn write_dataset(df: &mut DataFrame, path: &Path) -> Result<()> {
    let format = DatasetFormat::from_path(path)?;
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;

    match format {
        DatasetFormat::Csv => {
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        DatasetFormat::Parquet => {
            ParquetWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
    }

    debug!(path = %path.display(), rows = df.height(), "dataset written");
    Ok(())
}

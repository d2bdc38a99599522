//! JSON export of model fits and flat exports of tabular data

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::{ModelFit, PanelFit, SelectedCountry};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct AnalysisMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    pub econpanel_version: String,
    pub input_file: String,
    /// Observations after loading and enrichment
    pub observations: usize,
    pub dropped_incomplete: usize,
    pub rejected_degenerate: usize,
}

/// Complete export of one run. Failed or skipped analyses are omitted.
#[derive(Serialize)]
pub struct AnalysisExport<'a> {
    pub metadata: AnalysisMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ols: Option<&'a ModelFit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel: Option<&'a PanelFit>,
    pub comparable_countries: &'a [SelectedCountry],
}

/// Counts and source path recorded in the export metadata
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub observations: usize,
    pub dropped_incomplete: usize,
    pub rejected_degenerate: usize,
}

/// Export model results and the country selection to a JSON file
pub fn export_analysis_json(
    output_path: &Path,
    params: &ExportParams,
    ols: Option<&ModelFit>,
    panel: Option<&PanelFit>,
    selected: &[SelectedCountry],
) -> Result<()> {
    let export = AnalysisExport {
        metadata: AnalysisMetadata {
            timestamp: Utc::now().to_rfc3339(),
            econpanel_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            observations: params.observations,
            dropped_incomplete: params.dropped_incomplete,
            rejected_degenerate: params.rejected_degenerate,
        },
        ols,
        panel,
        comparable_countries: selected,
    };

    // serde_json writes non-finite floats as null
    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize analysis results to JSON")?;

    std::fs::write(output_path, json).with_context(|| {
        format!("Failed to write analysis results to {}", output_path.display())
    })?;

    Ok(())
}

/// Save a DataFrame to CSV or Parquet based on the file extension
pub fn save_dataframe(df: &mut DataFrame, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        "parquet" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
        _ => anyhow::bail!(
            "Unsupported output format: {}. Supported formats: csv, parquet",
            extension
        ),
    }

    Ok(())
}

//! Command-line argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::pipeline::{ChartKind, LoadOptions, SelectionConfig};
use crate::utils::OutputConfig;

/// econpanel - Relate sectoral composition to GDP per capita on a country-year panel
#[derive(Parser, Debug)]
#[command(name = "econpanel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input file path (Latin-1 encoded CSV with a header row)
    #[arg(short, long, default_value = "Global Economy Indicators.csv")]
    pub input: PathBuf,

    /// Where to write the OLS summary (overwritten on every run)
    #[arg(long, default_value = "regression_summary.txt")]
    pub ols_output: PathBuf,

    /// Where to write the fixed-effects summary (overwritten on every run)
    #[arg(long, default_value = "panel_regression_summary.txt")]
    pub panel_output: PathBuf,

    /// Lower bound (inclusive) on mean population for comparable countries
    #[arg(long, default_value = "10000000", value_parser = validate_population)]
    pub min_population: f64,

    /// Upper bound (inclusive) on mean population for comparable countries
    #[arg(long, default_value = "50000000", value_parser = validate_population)]
    pub max_population: f64,

    /// Maximum comparable countries taken from each income group
    #[arg(long, default_value = "3", value_parser = validate_per_group)]
    pub per_group: usize,

    /// Number of rows to use for schema inference.
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Suppress warnings and spinners
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run OLS, fixed effects and country selection in one batch
    Run {
        /// Also export model fits and the country selection as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Fit the pooled OLS model and write its summary
    Ols,

    /// Fit the country fixed-effects model and write its summary
    Panel,

    /// List comparable countries across income groups
    Select,

    /// Write the enriched dataset (CSV or Parquet, by extension)
    Export {
        /// Output file path
        output: PathBuf,
    },

    /// Write the data series behind one chart kind
    Chart {
        /// Chart kind: bar, line, facet, scatter or box
        kind: ChartKind,

        /// Output file path (defaults to chart_<kind>.csv)
        output: Option<PathBuf>,
    },

    /// Interactive action menu (default when no subcommand is given)
    Menu,
}

impl Cli {
    /// Selection bounds, rejecting an inverted population band
    pub fn selection_config(&self) -> anyhow::Result<SelectionConfig> {
        if self.min_population > self.max_population {
            anyhow::bail!(
                "min-population ({}) must not exceed max-population ({})",
                self.min_population,
                self.max_population
            );
        }
        Ok(SelectionConfig {
            min_population: self.min_population,
            max_population: self.max_population,
            per_group: self.per_group,
        })
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            infer_schema_length: self.infer_schema_length,
        }
    }

    pub fn output_config(&self) -> OutputConfig {
        OutputConfig::new(self.quiet)
    }

    /// Default log filter derived from the verbosity flags
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "info",
            (false, _) => "debug",
        }
    }
}

/// Default output path for a chart kind's data
pub fn default_chart_path(kind: ChartKind) -> PathBuf {
    PathBuf::from(format!("chart_{}.csv", kind.name()))
}

/// Validator for population bounds
fn validate_population(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !value.is_finite() || value < 0.0 {
        Err(format!(
            "population bound must be a non-negative number, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}

/// Validator for per_group parameter
fn validate_per_group(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid count", s))?;

    if value == 0 {
        Err("per-group must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

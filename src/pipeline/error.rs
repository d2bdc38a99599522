//! Error types for loading, enrichment and model fitting.
//!
//! Each enum covers one stage of the pipeline. Loading failures are terminal
//! for the whole run; a `DataError` concerns a single row; a
//! `RegressionError` is fatal only to the fit that raised it.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading and cleaning the source file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input path does not resolve to a file.
    #[error("The file '{}' was not found", .path.display())]
    SourceNotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// A required column is absent from the header (after trimming).
    #[error("Required column '{column}' not found. Available columns: {available:?}")]
    MissingColumn {
        /// Raw column label that was expected
        column: String,
        /// Trimmed header names present in the file
        available: Vec<String>,
    },

    /// The file exists but could not be read.
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV parser or a column operation failed.
    #[error("Failed to parse '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: polars::error::PolarsError,
    },
}

/// Row-level numeric degeneracy found while deriving ratios.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// A ratio denominator is zero or not a finite number.
    #[error("Row {row} ({country}, {year}): {field} is {value}, cannot derive ratios")]
    ZeroDenominator {
        /// Zero-based position in the cleaned dataset
        row: usize,
        country: String,
        year: i64,
        /// Name of the offending denominator column
        field: &'static str,
        value: f64,
    },
}

/// Errors raised by the OLS and fixed-effects engines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    /// The design matrix is singular or too close to singular to invert
    /// reliably, or leaves no residual degrees of freedom.
    #[error("Degenerate design matrix: {reason}")]
    DegenerateDesign { reason: String },

    /// A (Country, Year) pair occurs more than once in panel input.
    #[error("Duplicate panel key ({country}, {year})")]
    DuplicatePanelKey { country: String, year: i64 },

    /// Not enough usable observations to attempt a fit.
    #[error("Insufficient data: {reason}")]
    InsufficientData { reason: String },
}

impl RegressionError {
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        RegressionError::DegenerateDesign {
            reason: reason.into(),
        }
    }
}

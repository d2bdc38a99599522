//! Dataset loader for the Latin-1 country-year indicator CSV

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use encoding_rs::WINDOWS_1252;
use log::{debug, info};
use polars::prelude::*;

use super::dataset::{
    Dataset, Observation, AGRICULTURE, COUNTRY, GDP, MANUFACTURING, PER_CAPITA_GNI, POPULATION,
    TRANSPORT_COMM, YEAR,
};
use super::error::LoadError;

/// Raw header labels retained from the source, paired with their short names
pub const REQUIRED_COLUMNS: [(&str, &str); 8] = [
    ("Country", COUNTRY),
    ("Year", YEAR),
    ("Population", POPULATION),
    ("Gross Domestic Product (GDP)", GDP),
    ("Per capita GNI", PER_CAPITA_GNI),
    ("Agriculture, hunting, forestry, fishing (ISIC A-B)", AGRICULTURE),
    ("Manufacturing (ISIC D)", MANUFACTURING),
    ("Transport, storage and communication (ISIC I)", TRANSPORT_COMM),
];

/// Options controlling CSV parsing
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Rows used for schema inference; 0 scans the whole file
    pub infer_schema_length: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            infer_schema_length: 10_000,
        }
    }
}

impl LoadOptions {
    fn schema_length(&self) -> Option<usize> {
        if self.infer_schema_length == 0 {
            None
        } else {
            Some(self.infer_schema_length)
        }
    }
}

/// Result of loading: the cleaned dataset and how many rows were discarded
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub dataset: Dataset,
    /// Data rows in the source file
    pub total_rows: usize,
    /// Rows dropped because a retained field was absent
    pub dropped_rows: usize,
}

/// Load, select, rename and clean the indicator table at `path`.
///
/// The file is decoded as Latin-1, header names are trimmed, and only the
/// eight [`REQUIRED_COLUMNS`] are kept. Any row missing one of them (empty
/// cell, unparseable number such as `NA`, NaN or blank country) is dropped,
/// wherever it sits relative to the schema inference window.
pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<LoadOutcome, LoadError> {
    let df = read_latin1_csv(path, options)?;
    let df = select_required_columns(df).map_err(|e| match e {
        SelectError::Missing(err) => err,
        SelectError::Polars(source) => parse_error(path, source),
    })?;

    let total_rows = df.height();
    let (observations, dropped_rows) =
        extract_observations(&df).map_err(|source| parse_error(path, source))?;

    info!(
        "Loaded {} rows from {} ({} dropped as incomplete)",
        observations.len(),
        path.display(),
        dropped_rows
    );

    Ok(LoadOutcome {
        dataset: Dataset::new(observations),
        total_rows,
        dropped_rows,
    })
}

/// Read the file bytes, decode them as Latin-1 and parse the CSV
fn read_latin1_csv(path: &Path, options: &LoadOptions) -> Result<DataFrame, LoadError> {
    if !path.is_file() {
        return Err(LoadError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => LoadError::SourceNotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let (text, _, had_errors) = WINDOWS_1252.decode(&bytes);
    if had_errors {
        debug!("Replaced undecodable bytes while reading {}", path.display());
    }

    let header_line = text.lines().next().unwrap_or_default();
    let overwrite = required_as_text(header_line).map_err(|source| parse_error(path, source))?;

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(options.schema_length())
        .with_schema_overwrite(Some(Arc::new(overwrite)))
        .into_reader_with_file_handle(Cursor::new(text.into_owned().into_bytes()))
        .finish()
        .map_err(|source| parse_error(path, source))
}

/// Schema forcing the required columns to text under their untrimmed names.
///
/// Inference only sees the first rows, so a numeric column could hit a token
/// like `NA` further down and fail the whole parse. Read as text, such cells
/// fail to parse as numbers and the row is dropped as incomplete.
fn required_as_text(header_line: &str) -> PolarsResult<Schema> {
    let header = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(format!("{}\n", header_line).into_bytes()))
        .finish()?;

    Ok(header
        .get_column_names()
        .into_iter()
        .filter(|name| {
            REQUIRED_COLUMNS
                .iter()
                .any(|(raw, _)| *raw == name.as_str().trim())
        })
        .map(|name| (name.clone(), DataType::String))
        .collect())
}

enum SelectError {
    Missing(LoadError),
    Polars(PolarsError),
}

impl From<PolarsError> for SelectError {
    fn from(err: PolarsError) -> Self {
        SelectError::Polars(err)
    }
}

/// Trim header names, keep the required columns and rename them
fn select_required_columns(mut df: DataFrame) -> Result<DataFrame, SelectError> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    for name in &names {
        let trimmed = name.trim();
        if trimmed != name {
            df.rename(name, trimmed.into())?;
        }
    }

    let available: Vec<String> = names.iter().map(|n| n.trim().to_string()).collect();
    if let Some((missing, _)) = REQUIRED_COLUMNS
        .iter()
        .find(|(raw, _)| !available.iter().any(|a| a == raw))
    {
        return Err(SelectError::Missing(LoadError::MissingColumn {
            column: missing.to_string(),
            available,
        }));
    }

    let mut selected = df.select(REQUIRED_COLUMNS.iter().map(|(raw, _)| *raw))?;
    for (raw, short) in REQUIRED_COLUMNS {
        if raw != short {
            selected.rename(raw, short.into())?;
        }
    }

    Ok(selected)
}

fn float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?;
    let values: Vec<Option<f64>> = match column.dtype() {
        DataType::String => column
            .str()?
            .into_iter()
            .map(|v| v.and_then(|s| s.trim().parse::<f64>().ok()))
            .collect(),
        _ => column.cast(&DataType::Float64)?.f64()?.into_iter().collect(),
    };
    Ok(values
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

fn year_values(df: &DataFrame) -> PolarsResult<Vec<Option<i64>>> {
    let column = df.column(YEAR)?;
    Ok(match column.dtype() {
        DataType::String => column
            .str()?
            .into_iter()
            .map(|v| v.and_then(|s| s.trim().parse::<i64>().ok()))
            .collect(),
        _ => column.cast(&DataType::Int64)?.i64()?.into_iter().collect(),
    })
}

/// Convert the renamed frame into typed observations, skipping incomplete rows
fn extract_observations(df: &DataFrame) -> PolarsResult<(Vec<Observation>, usize)> {
    let country_col = df.column(COUNTRY)?.cast(&DataType::String)?;
    let countries = country_col.str()?;
    let years = year_values(df)?;

    let population = float_values(df, POPULATION)?;
    let gdp = float_values(df, GDP)?;
    let gni = float_values(df, PER_CAPITA_GNI)?;
    let agriculture = float_values(df, AGRICULTURE)?;
    let manufacturing = float_values(df, MANUFACTURING)?;
    let transport = float_values(df, TRANSPORT_COMM)?;

    let mut observations = Vec::with_capacity(df.height());
    let mut dropped = 0usize;

    for (i, (country, year)) in countries.into_iter().zip(years).enumerate() {
        let country = country.map(str::trim).filter(|c| !c.is_empty());
        let row = (
            country,
            year,
            population[i],
            gdp[i],
            gni[i],
            agriculture[i],
            manufacturing[i],
            transport[i],
        );

        match row {
            (Some(c), Some(y), Some(p), Some(g), Some(n), Some(a), Some(m), Some(t)) => {
                observations.push(Observation {
                    country: c.to_string(),
                    year: y,
                    population: p,
                    gdp: g,
                    per_capita_gni: n,
                    agriculture: a,
                    manufacturing: m,
                    transport_comm: t,
                });
            }
            _ => dropped += 1,
        }
    }

    Ok((observations, dropped))
}

fn parse_error(path: &Path, source: PolarsError) -> LoadError {
    LoadError::Parse {
        path: path.to_path_buf(),
        source,
    }
}

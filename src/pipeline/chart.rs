//! Tabular series for the charting collaborator
//!
//! Rendering happens elsewhere; these functions only shape the enriched
//! dataset into the frame each chart kind plots.

use std::fmt;
use std::str::FromStr;

use polars::prelude::*;
use thiserror::Error;

use super::dataset::{
    EnrichedDataset, IncomeGroup, COUNTRY, GDP_PER_CAPITA, INCOME_GROUP, SECTOR_SHARES, YEAR,
};

const MEAN_GDP_PER_CAPITA: &str = "Mean_GDP_per_capita";
const GROUP_RANK: &str = "Group_Rank";

/// Kinds of chart the collaborator can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Mean GDP per capita per income group
    IncomeGroupBar,
    /// Mean GDP per capita per income group and year
    IncomeGroupTrend,
    /// Per-country trend grid for the selected countries
    CountryFacets,
    /// Sector share against GDP per capita
    SectorScatter,
    /// Distribution of GDP per capita per income group
    IncomeGroupBox,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::IncomeGroupBar,
        ChartKind::IncomeGroupTrend,
        ChartKind::CountryFacets,
        ChartKind::SectorScatter,
        ChartKind::IncomeGroupBox,
    ];

    /// Short name used on the command line and in file names
    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::IncomeGroupBar => "bar",
            ChartKind::IncomeGroupTrend => "line",
            ChartKind::CountryFacets => "facet",
            ChartKind::SectorScatter => "scatter",
            ChartKind::IncomeGroupBox => "box",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ChartKind::IncomeGroupBar => "Bar Plot: average GDP per capita by income group",
            ChartKind::IncomeGroupTrend => "Line Plot: income groups over time",
            ChartKind::CountryFacets => "Facet Chart: selected countries",
            ChartKind::SectorScatter => "Scatter Plot: sector shares vs GDP per capita",
            ChartKind::IncomeGroupBox => "Box Plot: GDP per capita distribution",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown chart kind '{}', expected one of: bar, line, facet, scatter, box",
                    s
                )
            })
    }
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("No countries selected for the facet chart")]
    NoSelection,

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Build the frame for `kind`. `selected` is only used by the facet chart.
pub fn prepare_chart_data(
    dataset: &EnrichedDataset,
    kind: ChartKind,
    selected: &[String],
) -> Result<DataFrame, ChartError> {
    match kind {
        ChartKind::IncomeGroupBar => income_group_bar(dataset),
        ChartKind::IncomeGroupTrend => income_group_trend(dataset),
        ChartKind::CountryFacets => country_facets(dataset, selected),
        ChartKind::SectorScatter => sector_scatter(dataset),
        ChartKind::IncomeGroupBox => income_group_box(dataset),
    }
}

fn income_group_bar(dataset: &EnrichedDataset) -> Result<DataFrame, ChartError> {
    let df = dataset
        .to_dataframe()?
        .lazy()
        .group_by_stable([col(INCOME_GROUP)])
        .agg([col(GDP_PER_CAPITA).mean().alias(MEAN_GDP_PER_CAPITA)])
        .sort(
            [MEAN_GDP_PER_CAPITA],
            SortMultipleOptions::default().with_order_descending(true),
        )
        .collect()?;
    Ok(df)
}

fn income_group_trend(dataset: &EnrichedDataset) -> Result<DataFrame, ChartError> {
    let ranks: Vec<u32> = dataset
        .iter()
        .map(|o| o.income_group.priority_rank() as u32)
        .collect();
    let mut base = dataset.to_dataframe()?;
    base.with_column(Column::new(GROUP_RANK.into(), ranks))?;

    let df = base
        .lazy()
        .group_by_stable([col(YEAR), col(INCOME_GROUP), col(GROUP_RANK)])
        .agg([col(GDP_PER_CAPITA).mean().alias(MEAN_GDP_PER_CAPITA)])
        .sort([YEAR, GROUP_RANK], SortMultipleOptions::default())
        .select([col(YEAR), col(INCOME_GROUP), col(MEAN_GDP_PER_CAPITA)])
        .collect()?;
    Ok(df)
}

fn country_facets(dataset: &EnrichedDataset, selected: &[String]) -> Result<DataFrame, ChartError> {
    if selected.is_empty() {
        return Err(ChartError::NoSelection);
    }

    let rows = EnrichedDataset::new(
        dataset
            .iter()
            .filter(|o| selected.iter().any(|s| s == o.country()))
            .cloned()
            .collect(),
    );
    let df = rows
        .to_dataframe()?
        .select([COUNTRY, YEAR, INCOME_GROUP, GDP_PER_CAPITA])?;
    Ok(df)
}

fn sector_scatter(dataset: &EnrichedDataset) -> Result<DataFrame, ChartError> {
    let mut columns = vec![COUNTRY, YEAR, INCOME_GROUP, GDP_PER_CAPITA];
    columns.extend(SECTOR_SHARES);
    Ok(dataset.to_dataframe()?.select(columns)?)
}

/// Five-number summary of GDP per capita per group
fn income_group_box(dataset: &EnrichedDataset) -> Result<DataFrame, ChartError> {
    let mut groups = Vec::new();
    let mut stats: [Vec<f64>; 6] = Default::default();

    for group in IncomeGroup::PRIORITY {
        let mut values: Vec<f64> = dataset
            .iter()
            .filter(|o| o.income_group == group)
            .map(|o| o.gdp_per_capita)
            .collect();
        if values.is_empty() {
            continue;
        }
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        groups.push(group.label().to_string());
        stats[0].push(values[0]);
        stats[1].push(quantile_sorted(&values, 0.25));
        stats[2].push(quantile_sorted(&values, 0.5));
        stats[3].push(quantile_sorted(&values, 0.75));
        stats[4].push(values[values.len() - 1]);
        stats[5].push(values.len() as f64);
    }

    let [min, q1, median, q3, max, count] = stats;
    let df = DataFrame::new(vec![
        Column::new(INCOME_GROUP.into(), groups),
        Column::new("Min".into(), min),
        Column::new("Q1".into(), q1),
        Column::new("Median".into(), median),
        Column::new("Q3".into(), q3),
        Column::new("Max".into(), max),
        Column::new("Count".into(), count.into_iter().map(|c| c as u64).collect::<Vec<u64>>()),
    ])?;
    Ok(df)
}

/// Linear-interpolation quantile of sorted, non-empty data
fn quantile_sorted(values: &[f64], q: f64) -> f64 {
    let pos = q * (values.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    values[lower] + (values[upper] - values[lower]) * weight
}

//! One-way entity fixed-effects regression via the within transformation
//!
//! Each country's mean is subtracted from its own observations, for the
//! response and every regressor, and OLS is run on the demeaned data without
//! an intercept. Residual degrees of freedom account for the absorbed entity
//! means: `N - entities - regressors`.

use std::collections::{BTreeSet, HashMap, HashSet};

use faer::Mat;
use log::{debug, info};
use serde::Serialize;

use super::inference::{summarize, FitSpec, ModelFit};
use super::linalg::solve_least_squares;
use crate::pipeline::dataset::{EnrichedDataset, EnrichedObservation, GDP_PER_CAPITA, SECTOR_SHARES};
use crate::pipeline::error::RegressionError;

/// Years covered by the observations used in a panel fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSpan {
    pub first_year: i64,
    pub last_year: i64,
    /// Distinct years present
    pub periods: usize,
}

/// Recovered intercept for one entity: mean(y) - mean(x) . beta
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityEffect {
    pub country: String,
    pub effect: f64,
    pub n_obs: usize,
}

/// Fixed-effects fit with panel metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelFit {
    pub model: ModelFit,
    pub n_entities: usize,
    /// Entities with a single observation, left out of the fit
    pub excluded_entities: Vec<String>,
    pub time_span: TimeSpan,
    pub entity_effects: Vec<EntityEffect>,
}

/// Reject the dataset if any (Country, Year) pair occurs twice
pub fn check_unique_keys(dataset: &EnrichedDataset) -> Result<(), RegressionError> {
    let mut seen: HashSet<(&str, i64)> = HashSet::with_capacity(dataset.len());
    for obs in dataset {
        if !seen.insert((obs.country(), obs.year())) {
            return Err(RegressionError::DuplicatePanelKey {
                country: obs.country().to_string(),
                year: obs.year(),
            });
        }
    }
    Ok(())
}

/// Group row references by country, in first-seen order
fn group_by_entity(dataset: &EnrichedDataset) -> Vec<(&str, Vec<&EnrichedObservation>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&EnrichedObservation>)> = Vec::new();

    for obs in dataset {
        let slot = *index.entry(obs.country()).or_insert_with(|| {
            groups.push((obs.country(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(obs);
    }

    groups
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    sum / count as f64
}

/// Fit GDP per capita on the three sector shares with country fixed effects.
pub fn fit_fixed_effects(dataset: &EnrichedDataset) -> Result<PanelFit, RegressionError> {
    check_unique_keys(dataset)?;

    let (entities, singletons): (Vec<_>, Vec<_>) = group_by_entity(dataset)
        .into_iter()
        .partition(|(_, rows)| rows.len() > 1);

    let excluded_entities: Vec<String> = singletons
        .iter()
        .map(|(country, _)| country.to_string())
        .collect();
    if !excluded_entities.is_empty() {
        info!(
            "Excluding {} entit(ies) with a single observation: {}",
            excluded_entities.len(),
            excluded_entities.join(", ")
        );
    }

    if entities.is_empty() {
        return Err(RegressionError::InsufficientData {
            reason: "no entity has at least two observations".to_string(),
        });
    }

    let k = SECTOR_SHARES.len();
    let n_entities = entities.len();
    let n: usize = entities.iter().map(|(_, rows)| rows.len()).sum();

    if n < n_entities + k + 1 {
        return Err(RegressionError::degenerate(format!(
            "{} observations across {} entities leave no residual degrees of freedom for {} regressors",
            n, n_entities, k
        )));
    }

    // Within transformation, keeping entity means for the effect estimates
    let mut y = Vec::with_capacity(n);
    let mut x_rows: Vec<[f64; 3]> = Vec::with_capacity(n);
    let mut entity_means: Vec<(f64, [f64; 3])> = Vec::with_capacity(n_entities);

    for (_, rows) in &entities {
        let y_mean = mean(rows.iter().map(|o| o.gdp_per_capita));
        let mut x_mean = [0.0; 3];
        for (j, slot) in x_mean.iter_mut().enumerate() {
            *slot = mean(rows.iter().map(|o| o.shares()[j]));
        }

        for obs in rows {
            y.push(obs.gdp_per_capita - y_mean);
            let shares = obs.shares();
            x_rows.push([
                shares[0] - x_mean[0],
                shares[1] - x_mean[1],
                shares[2] - x_mean[2],
            ]);
        }
        entity_means.push((y_mean, x_mean));
    }

    let x = Mat::from_fn(n, k, |i, j| x_rows[i][j]);
    let solution = solve_least_squares(&x, &y)?;

    let total_sum_squares = y.iter().map(|v| v * v).sum();
    let fit = summarize(
        &solution,
        FitSpec {
            dependent: GDP_PER_CAPITA,
            names: &SECTOR_SHARES,
            df_model: k,
            df_resid: n - n_entities - k,
            total_sum_squares,
            total_df: n - n_entities,
        },
    );

    let entity_effects = entities
        .iter()
        .zip(&entity_means)
        .map(|((country, rows), (y_mean, x_mean))| {
            let explained: f64 = x_mean
                .iter()
                .zip(&solution.coefficients)
                .map(|(x, b)| x * b)
                .sum();
            EntityEffect {
                country: country.to_string(),
                effect: y_mean - explained,
                n_obs: rows.len(),
            }
        })
        .collect();

    let years: BTreeSet<i64> = entities
        .iter()
        .flat_map(|(_, rows)| rows.iter().map(|o| o.year()))
        .collect();
    let time_span = TimeSpan {
        first_year: years.first().copied().unwrap_or_default(),
        last_year: years.last().copied().unwrap_or_default(),
        periods: years.len(),
    };

    debug!(
        "Fixed effects fitted on {} rows, {} entities, within R^2 = {:.4}",
        n, n_entities, fit.r_squared
    );

    Ok(PanelFit {
        model: fit,
        n_entities,
        excluded_entities,
        time_span,
        entity_effects,
    })
}

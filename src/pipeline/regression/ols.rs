//! Pooled cross-sectional OLS of GDP per capita on sector shares

use faer::Mat;
use log::debug;

use super::inference::{summarize, FitSpec, ModelFit};
use super::linalg::solve_least_squares;
use crate::pipeline::dataset::{EnrichedDataset, GDP_PER_CAPITA, SECTOR_SHARES};
use crate::pipeline::error::RegressionError;

/// Name of the intercept term in fitted models
pub const INTERCEPT: &str = "const";

/// Fit `GDP_per_capita ~ 1 + Agriculture_Share + Manufacturing_Share + Transport_Comm_Share`.
///
/// Every row is used as an independent observation; the country-year
/// structure is ignored.
pub fn fit_ols(dataset: &EnrichedDataset) -> Result<ModelFit, RegressionError> {
    let n = dataset.len();
    if n == 0 {
        return Err(RegressionError::InsufficientData {
            reason: "dataset is empty".to_string(),
        });
    }

    let k = SECTOR_SHARES.len() + 1;
    let rows: Vec<[f64; 3]> = dataset.iter().map(|obs| obs.shares()).collect();
    let x = Mat::from_fn(n, k, |i, j| if j == 0 { 1.0 } else { rows[i][j - 1] });
    let y: Vec<f64> = dataset.iter().map(|obs| obs.gdp_per_capita).collect();

    let solution = solve_least_squares(&x, &y)?;

    let mean = y.iter().sum::<f64>() / n as f64;
    let total_sum_squares = y.iter().map(|v| (v - mean).powi(2)).sum();

    let names = [INTERCEPT, SECTOR_SHARES[0], SECTOR_SHARES[1], SECTOR_SHARES[2]];
    let fit = summarize(
        &solution,
        FitSpec {
            dependent: GDP_PER_CAPITA,
            names: &names,
            df_model: k - 1,
            df_resid: n - k,
            total_sum_squares,
            total_df: n - 1,
        },
    );

    debug!(
        "OLS fitted on {} rows: R^2 = {:.4}, F = {:.4}",
        fit.n_obs, fit.r_squared, fit.f_statistic
    );

    Ok(fit)
}

//! Standard errors, test statistics and goodness of fit

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

use super::linalg::LeastSquaresSolution;

/// Confidence level used for coefficient intervals
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// Estimate and inference for one coefficient
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermEstimate {
    pub name: String,
    pub coefficient: f64,
    pub std_error: f64,
    pub t_statistic: f64,
    pub p_value: f64,
    pub conf_low: f64,
    pub conf_high: f64,
}

/// Coefficients plus model-level statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelFit {
    pub dependent: String,
    pub terms: Vec<TermEstimate>,
    pub n_obs: usize,
    /// Regressors excluding any intercept
    pub df_model: usize,
    pub df_resid: usize,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_p_value: f64,
    pub residual_std_error: f64,
    pub sum_squared_residuals: f64,
}

impl ModelFit {
    pub fn term(&self, name: &str) -> Option<&TermEstimate> {
        self.terms.iter().find(|t| t.name == name)
    }

    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.term(name).map(|t| t.coefficient)
    }
}

/// Everything [`summarize`] needs besides the solution itself
pub(crate) struct FitSpec<'a> {
    pub dependent: &'a str,
    pub names: &'a [&'a str],
    pub df_model: usize,
    pub df_resid: usize,
    /// Total sum of squares the R^2 is measured against
    pub total_sum_squares: f64,
    /// Degrees of freedom of `total_sum_squares`
    pub total_df: usize,
}

pub(crate) fn summarize(solution: &LeastSquaresSolution, spec: FitSpec<'_>) -> ModelFit {
    let ssr = solution.sum_squared_residuals();
    let df_resid = spec.df_resid as f64;
    let sigma2 = ssr / df_resid;
    let t_crit = t_critical(CONFIDENCE_LEVEL, df_resid);

    let terms = spec
        .names
        .iter()
        .enumerate()
        .map(|(j, name)| {
            let coefficient = solution.coefficients[j];
            let std_error = (sigma2 * solution.xtx_inverse[(j, j)]).sqrt();
            let t_statistic = coefficient / std_error;
            TermEstimate {
                name: name.to_string(),
                coefficient,
                std_error,
                t_statistic,
                p_value: two_sided_p_value(t_statistic, df_resid),
                conf_low: coefficient - t_crit * std_error,
                conf_high: coefficient + t_crit * std_error,
            }
        })
        .collect();

    let r_squared = if spec.total_sum_squares > 0.0 {
        1.0 - ssr / spec.total_sum_squares
    } else {
        f64::NAN
    };
    let adj_r_squared = 1.0 - (1.0 - r_squared) * spec.total_df as f64 / df_resid;

    let df_model = spec.df_model as f64;
    let f_statistic = if spec.df_model == 0 {
        f64::NAN
    } else {
        (r_squared / df_model) / ((1.0 - r_squared) / df_resid)
    };

    ModelFit {
        dependent: spec.dependent.to_string(),
        terms,
        n_obs: solution.residuals.len(),
        df_model: spec.df_model,
        df_resid: spec.df_resid,
        r_squared,
        adj_r_squared,
        f_statistic,
        f_p_value: f_p_value(f_statistic, df_model, df_resid),
        residual_std_error: sigma2.sqrt(),
        sum_squared_residuals: ssr,
    }
}

/// Two-sided p-value of a t statistic with `df` degrees of freedom
pub fn two_sided_p_value(t: f64, df: f64) -> f64 {
    if t.is_nan() {
        return f64::NAN;
    }
    if t.is_infinite() {
        return 0.0;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).min(1.0),
        Err(_) => f64::NAN,
    }
}

/// Upper-tail p-value of an F statistic
pub fn f_p_value(f: f64, df_num: f64, df_den: f64) -> f64 {
    if f.is_nan() {
        return f64::NAN;
    }
    if f.is_infinite() {
        return 0.0;
    }
    match FisherSnedecor::new(df_num, df_den) {
        Ok(dist) => dist.sf(f.max(0.0)),
        Err(_) => f64::NAN,
    }
}

/// Two-sided critical value of Student's t for the given confidence level
pub fn t_critical(level: f64, df: f64) -> f64 {
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => dist.inverse_cdf(0.5 + level / 2.0),
        Err(_) => f64::NAN,
    }
}

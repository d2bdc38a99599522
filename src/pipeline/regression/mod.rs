//! Regression engines relating sector shares to GDP per capita
//!
//! Both engines share one QR least-squares kernel and one inference layer:
//! - `ols`: pooled cross-sectional OLS with an intercept
//! - `panel`: one-way country fixed effects (within estimator)

pub mod inference;
pub mod linalg;
pub mod ols;
pub mod panel;

pub use inference::{ModelFit, TermEstimate, CONFIDENCE_LEVEL};
pub use linalg::{solve_least_squares, LeastSquaresSolution, RANK_TOLERANCE};
pub use ols::{fit_ols, INTERCEPT};
pub use panel::{check_unique_keys, fit_fixed_effects, EntityEffect, PanelFit, TimeSpan};

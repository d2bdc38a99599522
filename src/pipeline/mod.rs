//! Pipeline module - loading, enrichment and the analyses run on the result

pub mod chart;
pub mod dataset;
pub mod error;
pub mod features;
pub mod loader;
pub mod regression;
pub mod selector;

pub use chart::*;
pub use dataset::*;
pub use error::*;
pub use features::*;
pub use loader::*;
pub use regression::{
    check_unique_keys, fit_fixed_effects, fit_ols, EntityEffect, ModelFit, PanelFit,
    TermEstimate, TimeSpan, CONFIDENCE_LEVEL, INTERCEPT,
};
pub use selector::*;

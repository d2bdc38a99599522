//! econpanel: sectoral composition and GDP per capita
//!
//! Loads a country-year panel of economic indicators, classifies income
//! groups, derives sector shares, and fits pooled OLS and country
//! fixed-effects regressions of GDP per capita on those shares.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;

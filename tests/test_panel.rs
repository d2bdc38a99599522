//! Tests for the country fixed-effects engine

use econpanel::pipeline::{
    check_unique_keys, fit_fixed_effects, EnrichedDataset, RegressionError, AGRICULTURE_SHARE,
    INTERCEPT, MANUFACTURING_SHARE, SECTOR_SHARES, TRANSPORT_COMM_SHARE,
};

#[path = "common/mod.rs"]
mod common;

use common::{enriched, linear_panel};

const BETA: [f64; 3] = [3.0, 0.5, -1.0];

fn assert_recovers_beta(dataset: &EnrichedDataset) {
    let panel = fit_fixed_effects(dataset).unwrap();
    let fit = &panel.model;

    for (name, expected) in [
        (AGRICULTURE_SHARE, BETA[0]),
        (MANUFACTURING_SHARE, BETA[1]),
        (TRANSPORT_COMM_SHARE, BETA[2]),
    ] {
        let coef = fit.coefficient(name).unwrap();
        assert!(
            (coef - expected).abs() < 1e-6,
            "{}: expected {}, got {}",
            name,
            expected,
            coef
        );
    }
}

#[test]
fn test_within_recovers_slopes_with_small_effects() {
    assert_recovers_beta(&linear_panel(BETA, &[0.0, 1.0, -2.0, 0.5, 3.0], 6));
}

#[test]
fn test_within_recovers_slopes_with_large_effects() {
    // Effects dwarf the regressors; pooled OLS would be biased here
    assert_recovers_beta(&linear_panel(BETA, &[10_000.0, -8_000.0, 25_000.0, 0.0, 4_000.0], 6));
}

#[test]
fn test_within_has_no_intercept_term() {
    let panel = fit_fixed_effects(&linear_panel(BETA, &[0.0, 1.0, 2.0], 5)).unwrap();

    let names: Vec<&str> = panel.model.terms.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, SECTOR_SHARES.to_vec());
    assert!(panel.model.term(INTERCEPT).is_none());
}

#[test]
fn test_entity_effects_absorb_intercept() {
    let effects = [100.0, -50.0, 7.5];
    let panel = fit_fixed_effects(&linear_panel(BETA, &effects, 6)).unwrap();

    assert_eq!(panel.entity_effects.len(), 3);
    for (estimate, effect) in panel.entity_effects.iter().zip(effects) {
        assert!(
            (estimate.effect - (2.0 + effect)).abs() < 1e-6,
            "{}: expected {}, got {}",
            estimate.country,
            2.0 + effect,
            estimate.effect
        );
        assert_eq!(estimate.n_obs, 6);
    }
}

#[test]
fn test_residual_degrees_of_freedom() {
    let panel = fit_fixed_effects(&linear_panel(BETA, &[0.0, 1.0, 2.0, 3.0, 4.0], 6)).unwrap();

    assert_eq!(panel.model.n_obs, 30);
    assert_eq!(panel.n_entities, 5);
    assert_eq!(panel.model.df_model, 3);
    assert_eq!(panel.model.df_resid, 30 - 5 - 3);
}

#[test]
fn test_time_span() {
    let panel = fit_fixed_effects(&linear_panel(BETA, &[0.0, 1.0, 2.0], 6)).unwrap();

    assert_eq!(panel.time_span.first_year, 2000);
    assert_eq!(panel.time_span.last_year, 2005);
    assert_eq!(panel.time_span.periods, 6);
}

#[test]
fn test_duplicate_key_is_rejected() {
    let mut dataset = linear_panel(BETA, &[0.0, 1.0, 2.0], 5);
    let duplicate = dataset.observations[3].clone();
    dataset.observations.push(duplicate);

    let err = fit_fixed_effects(&dataset).unwrap_err();

    assert_eq!(
        err,
        RegressionError::DuplicatePanelKey {
            country: "Country 0".to_string(),
            year: 2003,
        }
    );
    assert!(check_unique_keys(&dataset).is_err());
}

#[test]
fn test_singleton_entities_are_excluded() {
    let mut dataset = linear_panel(BETA, &[0.0, 1.0, 2.0, 3.0], 6);
    dataset
        .observations
        .push(enriched("Solo", 2001, 1.0e7, 800.0, 999.0, [10.0, 10.0, 10.0]));

    let panel = fit_fixed_effects(&dataset).unwrap();

    assert_eq!(panel.excluded_entities, vec!["Solo".to_string()]);
    assert_eq!(panel.n_entities, 4);
    assert_eq!(panel.model.n_obs, 24);
    assert!(panel.entity_effects.iter().all(|e| e.country != "Solo"));
}

#[test]
fn test_only_singletons_is_insufficient() {
    let dataset = EnrichedDataset::new(vec![
        enriched("A", 2000, 1.0e7, 800.0, 500.0, [10.0, 10.0, 10.0]),
        enriched("B", 2000, 1.0e7, 800.0, 600.0, [11.0, 9.0, 10.0]),
    ]);

    let err = fit_fixed_effects(&dataset).unwrap_err();
    assert!(matches!(err, RegressionError::InsufficientData { .. }));
}

#[test]
fn test_too_few_periods_is_degenerate() {
    // Two entities with two rows each: 4 - 2 - 3 < 1 residual degree of freedom
    let err = fit_fixed_effects(&linear_panel(BETA, &[0.0, 1.0], 2)).unwrap_err();
    assert!(matches!(err, RegressionError::DegenerateDesign { .. }));
}

#[test]
fn test_time_invariant_regressor_is_degenerate() {
    // Agriculture share never moves within a country, so demeaning wipes it out
    let mut dataset = linear_panel(BETA, &[0.0, 4.0, 8.0], 6);
    for obs in dataset.observations.iter_mut() {
        let entity: f64 = obs.raw.country.trim_start_matches("Country ").parse().unwrap();
        obs.agriculture_share = 10.0 + 3.0 * entity;
    }

    let err = fit_fixed_effects(&dataset).unwrap_err();
    assert!(
        matches!(err, RegressionError::DegenerateDesign { .. }),
        "got {:?}",
        err
    );
}

#[test]
fn test_within_r_squared_is_bounded() {
    let mut dataset = linear_panel(BETA, &[0.0, 5.0, 10.0, 15.0], 8);
    for (i, obs) in dataset.observations.iter_mut().enumerate() {
        obs.gdp_per_capita += 0.5 * (i as f64 * 1.7).cos();
    }

    let panel = fit_fixed_effects(&dataset).unwrap();
    let fit = &panel.model;

    assert!(fit.r_squared > 0.0 && fit.r_squared < 1.0);
    assert!(fit.f_statistic > 0.0);
    for term in &fit.terms {
        assert!((0.0..=1.0).contains(&term.p_value));
        assert!(term.conf_low < term.coefficient && term.coefficient < term.conf_high);
    }
}

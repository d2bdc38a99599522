//! End-to-end tests: load, enrich, fit and select from a CSV fixture

use econpanel::pipeline::{
    country_names, enrich, fit_fixed_effects, fit_ols, load_dataset, select_comparable_countries,
    IncomeGroup, LoadOptions, SelectionConfig, AGRICULTURE_SHARE,
};
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::{sample_raw_rows, write_indicator_csv, RawRow};

#[test]
fn test_full_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let mut rows = sample_raw_rows();
    let clean_rows = rows.len();

    let mut incomplete = RawRow::new("Kenya", 2020, 50_000_000.0, 1_800.0, 9.0e10);
    incomplete.transport = None;
    rows.push(incomplete);
    rows.push(RawRow::new("Tuvalu", 2020, 11_000.0, 6_000.0, 0.0));

    let path = write_indicator_csv(&temp_dir, "indicators.csv", &rows);

    let loaded = load_dataset(&path, &LoadOptions::default()).unwrap();
    assert_eq!(loaded.total_rows, clean_rows + 2);
    assert_eq!(loaded.dropped_rows, 1);

    let enrichment = enrich(loaded.dataset);
    assert_eq!(enrichment.rejected.len(), 1);
    let dataset = enrichment.dataset;
    assert_eq!(dataset.len(), clean_rows);
    assert_eq!(dataset.countries(), vec!["Kenya", "Peru", "Ghana", "Norway", "Chile"]);

    let ols = fit_ols(&dataset).unwrap();
    assert_eq!(ols.n_obs, clean_rows);
    assert_eq!(ols.df_resid, clean_rows - 4);

    let panel = fit_fixed_effects(&dataset).unwrap();
    assert_eq!(panel.n_entities, 5);
    assert_eq!(panel.model.df_resid, clean_rows - 5 - 3);
    assert!(panel.excluded_entities.is_empty());

    // Within estimator sees only the share slopes; noise is small
    let agriculture = panel.model.coefficient(AGRICULTURE_SHARE).unwrap();
    assert!((agriculture - 12.0).abs() < 1.0, "got {}", agriculture);

    let selected = select_comparable_countries(&dataset, &SelectionConfig::default());
    assert_eq!(
        country_names(&selected),
        vec!["Chile", "Peru", "Ghana", "Kenya"]
    );
    assert_eq!(selected[0].income_group, IncomeGroup::High);
}

#[test]
fn test_pipeline_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_indicator_csv(&temp_dir, "indicators.csv", &sample_raw_rows());

    let first = enrich(load_dataset(&path, &LoadOptions::default()).unwrap().dataset).dataset;
    let second = enrich(load_dataset(&path, &LoadOptions::default()).unwrap().dataset).dataset;

    assert_eq!(first, second);
    assert_eq!(fit_ols(&first).unwrap(), fit_ols(&second).unwrap());
}

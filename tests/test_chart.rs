//! Tests for chart data preparation

use econpanel::pipeline::{
    prepare_chart_data, ChartError, ChartKind, EnrichedDataset, COUNTRY, GDP_PER_CAPITA,
    INCOME_GROUP, SECTOR_SHARES, YEAR,
};

#[path = "common/mod.rs"]
mod common;

use common::enriched;

fn sample() -> EnrichedDataset {
    EnrichedDataset::new(vec![
        enriched("Kenya", 2001, 3e7, 900.0, 1_000.0, [30.0, 10.0, 8.0]),
        enriched("Kenya", 2000, 3e7, 900.0, 800.0, [31.0, 9.0, 8.0]),
        enriched("Chile", 2000, 1.7e7, 20_000.0, 15_000.0, [5.0, 12.0, 9.0]),
        enriched("Chile", 2001, 1.7e7, 20_000.0, 17_000.0, [5.0, 12.0, 9.5]),
        enriched("Ghana", 2000, 2.5e7, 2_000.0, 2_000.0, [20.0, 8.0, 7.0]),
    ])
}

#[test]
fn test_bar_means_sorted_descending() {
    let df = prepare_chart_data(&sample(), ChartKind::IncomeGroupBar, &[]).unwrap();

    assert_eq!(df.height(), 3);
    let groups: Vec<String> = df
        .column(INCOME_GROUP)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|g| g.unwrap().to_string())
        .collect();
    assert_eq!(groups, vec!["High income", "Lower middle income", "Low income"]);

    let means: Vec<f64> = df
        .column("Mean_GDP_per_capita")
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(means, vec![16_000.0, 2_000.0, 900.0]);
}

#[test]
fn test_trend_is_ordered_by_year() {
    let df = prepare_chart_data(&sample(), ChartKind::IncomeGroupTrend, &[]).unwrap();

    assert_eq!(df.get_column_names(), &[YEAR, INCOME_GROUP, "Mean_GDP_per_capita"]);
    let years: Vec<i64> = df
        .column(YEAR)
        .unwrap()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(years, vec![2000, 2000, 2000, 2001, 2001]);
}

#[test]
fn test_facets_need_a_selection() {
    let err = prepare_chart_data(&sample(), ChartKind::CountryFacets, &[]).unwrap_err();
    assert!(matches!(err, ChartError::NoSelection));
}

#[test]
fn test_facets_keep_selected_countries() {
    let selected = vec!["Chile".to_string()];
    let df = prepare_chart_data(&sample(), ChartKind::CountryFacets, &selected).unwrap();

    assert_eq!(df.height(), 2);
    assert_eq!(df.get_column_names(), &[COUNTRY, YEAR, INCOME_GROUP, GDP_PER_CAPITA]);
}

#[test]
fn test_scatter_columns() {
    let df = prepare_chart_data(&sample(), ChartKind::SectorScatter, &[]).unwrap();

    assert_eq!(df.height(), 5);
    for share in SECTOR_SHARES {
        assert!(df.column(share).is_ok(), "missing {}", share);
    }
}

#[test]
fn test_box_summary_per_group() {
    let df = prepare_chart_data(&sample(), ChartKind::IncomeGroupBox, &[]).unwrap();

    assert_eq!(df.height(), 3);
    let counts: Vec<u64> = df
        .column("Count")
        .unwrap()
        .u64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(counts, vec![2, 1, 2]);

    let medians: Vec<f64> = df
        .column("Median")
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(medians, vec![16_000.0, 2_000.0, 900.0]);
}

#[test]
fn test_chart_kind_parsing() {
    assert_eq!("bar".parse::<ChartKind>().unwrap(), ChartKind::IncomeGroupBar);
    assert_eq!(" BOX ".parse::<ChartKind>().unwrap(), ChartKind::IncomeGroupBox);
    assert!("pie".parse::<ChartKind>().is_err());
}

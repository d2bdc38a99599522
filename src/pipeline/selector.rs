//! Comparable-country selection across income tiers

use std::collections::HashMap;

use serde::Serialize;

use super::dataset::{EnrichedDataset, IncomeGroup};

/// Bounds and quota for [`select_comparable_countries`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionConfig {
    /// Lower bound (inclusive) on a country's mean population
    pub min_population: f64,
    /// Upper bound (inclusive) on a country's mean population
    pub max_population: f64,
    /// Maximum countries taken from each income group
    pub per_group: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_population: 10_000_000.0,
            max_population: 50_000_000.0,
            per_group: 3,
        }
    }
}

/// A country picked by the selector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedCountry {
    pub country: String,
    pub income_group: IncomeGroup,
    pub mean_population: f64,
}

struct CountryStats {
    population_sum: f64,
    count: usize,
    /// Label of the first row seen for this country
    first_group: IncomeGroup,
}

/// Pick up to `per_group` countries per income group with a mean population
/// inside the configured band.
///
/// Groups are visited in [`IncomeGroup::PRIORITY`] order and countries within
/// a group in the order they first appear in the dataset. A country whose GNI
/// crosses a threshold over time is labelled by its first row: this "keep
/// first" rule is a tie-break policy, not a property of the data.
pub fn select_comparable_countries(
    dataset: &EnrichedDataset,
    config: &SelectionConfig,
) -> Vec<SelectedCountry> {
    let mut order: Vec<&str> = Vec::new();
    let mut stats: HashMap<&str, CountryStats> = HashMap::new();

    for obs in dataset {
        let entry = stats.entry(obs.country()).or_insert_with(|| {
            order.push(obs.country());
            CountryStats {
                population_sum: 0.0,
                count: 0,
                first_group: obs.income_group,
            }
        });
        entry.population_sum += obs.raw.population;
        entry.count += 1;
    }

    let qualifying: Vec<SelectedCountry> = order
        .iter()
        .filter_map(|country| {
            let s = &stats[country];
            let mean_population = s.population_sum / s.count as f64;
            (config.min_population..=config.max_population)
                .contains(&mean_population)
                .then(|| SelectedCountry {
                    country: country.to_string(),
                    income_group: s.first_group,
                    mean_population,
                })
        })
        .collect();

    IncomeGroup::PRIORITY
        .iter()
        .flat_map(|group| {
            qualifying
                .iter()
                .filter(move |c| c.income_group == *group)
                .take(config.per_group)
                .cloned()
        })
        .collect()
}

/// Names of the selected countries, in selection order
pub fn country_names(selected: &[SelectedCountry]) -> Vec<String> {
    selected.iter().map(|c| c.country.clone()).collect()
}

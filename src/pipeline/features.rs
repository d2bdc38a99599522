//! Feature engineering: income classification and GDP-share ratios

use log::debug;

use super::dataset::{Dataset, EnrichedDataset, EnrichedObservation, IncomeGroup, Observation};
use super::error::DataError;

/// Upper bound (inclusive) of per-capita GNI for the low income tier
pub const LOW_INCOME_MAX_GNI: f64 = 1145.0;
/// Upper bound (inclusive) for the lower middle income tier
pub const LOWER_MIDDLE_INCOME_MAX_GNI: f64 = 4515.0;
/// Upper bound (inclusive) for the upper middle income tier
pub const UPPER_MIDDLE_INCOME_MAX_GNI: f64 = 14005.0;

/// Classify a per-capita GNI value. Each band is closed on its upper bound.
pub fn classify_income_group(gni: f64) -> IncomeGroup {
    if gni <= LOW_INCOME_MAX_GNI {
        IncomeGroup::Low
    } else if gni <= LOWER_MIDDLE_INCOME_MAX_GNI {
        IncomeGroup::LowerMiddle
    } else if gni <= UPPER_MIDDLE_INCOME_MAX_GNI {
        IncomeGroup::UpperMiddle
    } else {
        IncomeGroup::High
    }
}

/// Output of [`enrich`]: surviving rows and the rows rejected as degenerate
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub dataset: EnrichedDataset,
    pub rejected: Vec<DataError>,
}

/// Derive income group, GDP per capita and the three sector shares for one row.
///
/// `row` is only used to label the error. A zero or non-finite GDP or
/// Population is reported as [`DataError::ZeroDenominator`].
pub fn derive_observation(
    row: usize,
    obs: Observation,
) -> Result<EnrichedObservation, DataError> {
    check_denominator(row, &obs, "Population", obs.population)?;
    check_denominator(row, &obs, "GDP", obs.gdp)?;

    let gdp = obs.gdp;
    let share = |value: f64| value / gdp * 100.0;

    Ok(EnrichedObservation {
        income_group: classify_income_group(obs.per_capita_gni),
        gdp_per_capita: obs.gdp / obs.population,
        agriculture_share: share(obs.agriculture),
        manufacturing_share: share(obs.manufacturing),
        transport_comm_share: share(obs.transport_comm),
        raw: obs,
    })
}

fn check_denominator(
    row: usize,
    obs: &Observation,
    field: &'static str,
    value: f64,
) -> Result<(), DataError> {
    if value == 0.0 || !value.is_finite() {
        return Err(DataError::ZeroDenominator {
            row,
            country: obs.country.clone(),
            year: obs.year,
            field,
            value,
        });
    }
    Ok(())
}

/// Enrich every row in order. Degenerate rows are excluded and collected.
pub fn enrich(dataset: Dataset) -> Enrichment {
    let mut observations = Vec::with_capacity(dataset.len());
    let mut rejected = Vec::new();

    for (row, obs) in dataset.observations.into_iter().enumerate() {
        match derive_observation(row, obs) {
            Ok(enriched) => observations.push(enriched),
            Err(err) => {
                debug!("{}", err);
                rejected.push(err);
            }
        }
    }

    Enrichment {
        dataset: EnrichedDataset::new(observations),
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(gdp: f64, population: f64) -> Observation {
        Observation {
            country: "Kenya".to_string(),
            year: 2010,
            population,
            gdp,
            per_capita_gni: 1000.0,
            agriculture: 250.0,
            manufacturing: 100.0,
            transport_comm: 80.0,
        }
    }

    #[test]
    fn test_classify_bands() {
        assert_eq!(classify_income_group(0.0), IncomeGroup::Low);
        assert_eq!(classify_income_group(2000.0), IncomeGroup::LowerMiddle);
        assert_eq!(classify_income_group(10_000.0), IncomeGroup::UpperMiddle);
        assert_eq!(classify_income_group(50_000.0), IncomeGroup::High);
    }

    #[test]
    fn test_derive_shares() {
        let enriched = derive_observation(0, observation(1000.0, 50.0)).unwrap();
        assert_eq!(enriched.gdp_per_capita, 20.0);
        assert_eq!(enriched.agriculture_share, 25.0);
        assert_eq!(enriched.manufacturing_share, 10.0);
        assert_eq!(enriched.transport_comm_share, 8.0);
        assert_eq!(enriched.income_group, IncomeGroup::Low);
    }

    #[test]
    fn test_zero_gdp_rejected() {
        let err = derive_observation(7, observation(0.0, 50.0)).unwrap_err();
        match err {
            DataError::ZeroDenominator { row, field, .. } => {
                assert_eq!(row, 7);
                assert_eq!(field, "GDP");
            }
        }
    }

    #[test]
    fn test_zero_population_rejected() {
        let err = derive_observation(0, observation(1000.0, 0.0)).unwrap_err();
        assert!(matches!(
            err,
            DataError::ZeroDenominator {
                field: "Population",
                ..
            }
        ));
    }

    #[test]
    fn test_enrich_keeps_order_and_collects_rejections() {
        let mut second = observation(0.0, 10.0);
        second.country = "Chad".to_string();
        let mut third = observation(500.0, 10.0);
        third.country = "Peru".to_string();

        let result = enrich(Dataset::new(vec![observation(1000.0, 10.0), second, third]));

        assert_eq!(result.dataset.len(), 2);
        assert_eq!(result.dataset.observations[0].country(), "Kenya");
        assert_eq!(result.dataset.observations[1].country(), "Peru");
        assert_eq!(result.rejected.len(), 1);
    }
}

//! Country-year observations and the datasets built from them

use std::collections::HashSet;
use std::fmt;

use polars::prelude::*;
use serde::Serialize;

/// Raw column names retained after loading, in output order
pub const COUNTRY: &str = "Country";
pub const YEAR: &str = "Year";
pub const POPULATION: &str = "Population";
pub const GDP: &str = "GDP";
pub const PER_CAPITA_GNI: &str = "Per capita GNI";
pub const AGRICULTURE: &str = "Agriculture";
pub const MANUFACTURING: &str = "Manufacturing";
pub const TRANSPORT_COMM: &str = "Transport_Comm";

/// Derived column names used in exports and chart data
pub const INCOME_GROUP: &str = "Income_Group";
pub const GDP_PER_CAPITA: &str = "GDP_per_capita";
pub const AGRICULTURE_SHARE: &str = "Agriculture_Share";
pub const MANUFACTURING_SHARE: &str = "Manufacturing_Share";
pub const TRANSPORT_COMM_SHARE: &str = "Transport_Comm_Share";

/// Regressor names, in design-matrix order
pub const SECTOR_SHARES: [&str; 3] = [AGRICULTURE_SHARE, MANUFACTURING_SHARE, TRANSPORT_COMM_SHARE];

/// World Bank style income tier derived from per-capita GNI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum IncomeGroup {
    Low,
    LowerMiddle,
    UpperMiddle,
    High,
}

impl IncomeGroup {
    /// Order in which groups are reported and sampled
    pub const PRIORITY: [IncomeGroup; 4] = [
        IncomeGroup::High,
        IncomeGroup::UpperMiddle,
        IncomeGroup::LowerMiddle,
        IncomeGroup::Low,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            IncomeGroup::Low => "Low income",
            IncomeGroup::LowerMiddle => "Lower middle income",
            IncomeGroup::UpperMiddle => "Upper middle income",
            IncomeGroup::High => "High income",
        }
    }

    /// Position in [`IncomeGroup::PRIORITY`]
    pub fn priority_rank(&self) -> usize {
        match self {
            IncomeGroup::High => 0,
            IncomeGroup::UpperMiddle => 1,
            IncomeGroup::LowerMiddle => 2,
            IncomeGroup::Low => 3,
        }
    }
}

impl fmt::Display for IncomeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One country-year row with every retained raw field present
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub country: String,
    pub year: i64,
    pub population: f64,
    pub gdp: f64,
    pub per_capita_gni: f64,
    pub agriculture: f64,
    pub manufacturing: f64,
    pub transport_comm: f64,
}

/// An observation with its derived fields attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedObservation {
    #[serde(flatten)]
    pub raw: Observation,
    pub income_group: IncomeGroup,
    pub gdp_per_capita: f64,
    pub agriculture_share: f64,
    pub manufacturing_share: f64,
    pub transport_comm_share: f64,
}

impl EnrichedObservation {
    pub fn country(&self) -> &str {
        &self.raw.country
    }

    pub fn year(&self) -> i64 {
        self.raw.year
    }

    /// Sector shares in design-matrix order
    pub fn shares(&self) -> [f64; 3] {
        [
            self.agriculture_share,
            self.manufacturing_share,
            self.transport_comm_share,
        ]
    }
}

/// Cleaned observations in source row order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub observations: Vec<Observation>,
}

impl Dataset {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Observations with derived fields, read-only input to every analysis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedDataset {
    pub observations: Vec<EnrichedObservation>,
}

impl EnrichedDataset {
    pub fn new(observations: Vec<EnrichedObservation>) -> Self {
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnrichedObservation> {
        self.observations.iter()
    }

    /// Countries in first-seen row order
    pub fn countries(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.observations
            .iter()
            .filter(|obs| seen.insert(obs.country()))
            .map(|obs| obs.country().to_string())
            .collect()
    }

    /// Build a DataFrame holding raw and derived columns, in row order
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let obs = &self.observations;
        let float_col = |name: &str, f: fn(&EnrichedObservation) -> f64| {
            Column::new(name.into(), obs.iter().map(f).collect::<Vec<f64>>())
        };

        DataFrame::new(vec![
            Column::new(
                COUNTRY.into(),
                obs.iter().map(|o| o.country().to_string()).collect::<Vec<String>>(),
            ),
            Column::new(YEAR.into(), obs.iter().map(|o| o.year()).collect::<Vec<i64>>()),
            float_col(POPULATION, |o| o.raw.population),
            float_col(GDP, |o| o.raw.gdp),
            float_col(PER_CAPITA_GNI, |o| o.raw.per_capita_gni),
            float_col(AGRICULTURE, |o| o.raw.agriculture),
            float_col(MANUFACTURING, |o| o.raw.manufacturing),
            float_col(TRANSPORT_COMM, |o| o.raw.transport_comm),
            Column::new(
                INCOME_GROUP.into(),
                obs.iter()
                    .map(|o| o.income_group.label().to_string())
                    .collect::<Vec<String>>(),
            ),
            float_col(GDP_PER_CAPITA, |o| o.gdp_per_capita),
            float_col(AGRICULTURE_SHARE, |o| o.agriculture_share),
            float_col(MANUFACTURING_SHARE, |o| o.manufacturing_share),
            float_col(TRANSPORT_COMM_SHARE, |o| o.transport_comm_share),
        ])
    }
}

impl<'a> IntoIterator for &'a EnrichedDataset {
    type Item = &'a EnrichedObservation;
    type IntoIter = std::slice::Iter<'a, EnrichedObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

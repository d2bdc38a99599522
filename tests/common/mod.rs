//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::path::PathBuf;

use econpanel::pipeline::{
    classify_income_group, EnrichedDataset, EnrichedObservation, Observation,
};
use tempfile::TempDir;

/// Header of the source file, with the padding the published CSV carries
pub const RAW_HEADER: &str = " CountryID , Country , Year , AMA exchange rate , IMF based exchange rate , Population , Currency , Per capita GNI , Agriculture, hunting, forestry, fishing (ISIC A-B) , Manufacturing (ISIC D) , Transport, storage and communication (ISIC I) , Gross Domestic Product (GDP) ";

/// One source row; `None` leaves the cell empty
#[derive(Debug, Clone)]
pub struct RawRow {
    pub country: String,
    pub year: i64,
    pub population: Option<f64>,
    pub gni: Option<f64>,
    pub agriculture: Option<f64>,
    pub manufacturing: Option<f64>,
    pub transport: Option<f64>,
    pub gdp: Option<f64>,
}

impl RawRow {
    pub fn new(country: &str, year: i64, population: f64, gni: f64, gdp: f64) -> Self {
        Self {
            country: country.to_string(),
            year,
            population: Some(population),
            gni: Some(gni),
            agriculture: Some(gdp * 0.2),
            manufacturing: Some(gdp * 0.15),
            transport: Some(gdp * 0.1),
            gdp: Some(gdp),
        }
    }

    /// Set sector values from percentage shares of GDP
    pub fn with_shares(mut self, shares: [f64; 3]) -> Self {
        let gdp = self.gdp.unwrap_or(0.0);
        self.agriculture = Some(gdp * shares[0] / 100.0);
        self.manufacturing = Some(gdp * shares[1] / 100.0);
        self.transport = Some(gdp * shares[2] / 100.0);
        self
    }

    fn to_csv_line(&self, id: usize) -> String {
        let cell = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        // Embedded commas in the sector headers are quoted, values never are
        format!(
            "{},{},{},1.0,1.0,{},USD,{},{},{},{},{}",
            id,
            self.country,
            self.year,
            cell(self.population),
            cell(self.gni),
            cell(self.agriculture),
            cell(self.manufacturing),
            cell(self.transport),
            cell(self.gdp)
        )
    }
}

/// Header line with the comma-bearing labels quoted
fn header_line() -> String {
    RAW_HEADER
        .replace(
            " Agriculture, hunting, forestry, fishing (ISIC A-B) ",
            "\" Agriculture, hunting, forestry, fishing (ISIC A-B) \"",
        )
        .replace(
            " Transport, storage and communication (ISIC I) ",
            "\" Transport, storage and communication (ISIC I) \"",
        )
}

/// Encode text as Latin-1; every char must be below U+0100
pub fn latin1_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            let code = c as u32;
            assert!(code < 0x100, "'{}' is not representable in Latin-1", c);
            code as u8
        })
        .collect()
}

/// Write rows under the raw header as a Latin-1 CSV in `dir`
pub fn write_indicator_csv(dir: &TempDir, name: &str, rows: &[RawRow]) -> PathBuf {
    let mut text = header_line();
    text.push('\n');
    for (i, row) in rows.iter().enumerate() {
        text.push_str(&row.to_csv_line(i + 1));
        text.push('\n');
    }
    let path = dir.path().join(name);
    std::fs::write(&path, latin1_bytes(&text)).unwrap();
    path
}

/// Build an enriched row directly from its target derived values
pub fn enriched(
    country: &str,
    year: i64,
    population: f64,
    gni: f64,
    gdp_per_capita: f64,
    shares: [f64; 3],
) -> EnrichedObservation {
    let gdp = gdp_per_capita * population;
    EnrichedObservation {
        raw: Observation {
            country: country.to_string(),
            year,
            population,
            gdp,
            per_capita_gni: gni,
            agriculture: gdp * shares[0] / 100.0,
            manufacturing: gdp * shares[1] / 100.0,
            transport_comm: gdp * shares[2] / 100.0,
        },
        income_group: classify_income_group(gni),
        gdp_per_capita,
        agriculture_share: shares[0],
        manufacturing_share: shares[1],
        transport_comm_share: shares[2],
    }
}

/// Deterministic, non-collinear sector shares for entity `i` at period `t`
pub fn varied_shares(i: usize, t: usize) -> [f64; 3] {
    let (i, t) = (i as f64, t as f64);
    [
        20.0 + 6.0 * (1.3 * t + i).sin(),
        15.0 + 4.0 * (0.7 * t + 2.0 * i).cos(),
        8.0 + 0.15 * t * t + 0.5 * i,
    ]
}

/// Panel where y = 2 + beta . shares + effects[i], for `periods` years from 2000
pub fn linear_panel(beta: [f64; 3], effects: &[f64], periods: usize) -> EnrichedDataset {
    let mut rows = Vec::new();
    for (i, effect) in effects.iter().enumerate() {
        for t in 0..periods {
            let shares = varied_shares(i, t);
            let y = 2.0 + beta.iter().zip(&shares).map(|(b, x)| b * x).sum::<f64>() + effect;
            rows.push(enriched(
                &format!("Country {}", i),
                2000 + t as i64,
                20_000_000.0,
                5_000.0,
                y,
                shares,
            ));
        }
    }
    EnrichedDataset::new(rows)
}

/// Raw rows for a small panel with noise, fit for both regressions
pub fn sample_raw_rows() -> Vec<RawRow> {
    let countries = [
        ("Kenya", 30_000_000.0, 900.0),
        ("Peru", 28_000_000.0, 6_000.0),
        ("Ghana", 25_000_000.0, 2_000.0),
        ("Norway", 5_000_000.0, 70_000.0),
        ("Chile", 17_000_000.0, 15_000.0),
    ];
    let mut rows = Vec::new();
    for (i, (country, population, gni)) in countries.iter().enumerate() {
        for t in 0..8 {
            let shares = varied_shares(i, t);
            let noise = 3.0 * ((i * 31 + t * 17) as f64).sin();
            let per_capita = 100.0 + 12.0 * shares[0] - 7.0 * shares[1] + 20.0 * shares[2]
                + 50.0 * i as f64
                + noise;
            rows.push(
                RawRow::new(country, 2000 + t as i64, *population, *gni, per_capita * population)
                    .with_shares(shares),
            );
        }
    }
    rows
}

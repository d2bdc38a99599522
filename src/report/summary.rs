//! Terminal tables for model fits, selections and the run summary

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{ModelFit, PanelFit, SelectedCountry};

/// Significance level used to highlight coefficients
const SIGNIFICANCE: f64 = 0.05;

/// Counts gathered while loading and enriching the dataset
#[derive(Debug, Default)]
pub struct RunSummary {
    pub source_rows: usize,
    pub dropped_incomplete: usize,
    pub rejected_degenerate: usize,
    pub observations: usize,
    pub countries: usize,
    pub selected: Vec<String>,
}

impl RunSummary {
    pub fn new(source_rows: usize) -> Self {
        Self {
            source_rows,
            ..Default::default()
        }
    }

    pub fn set_dropped(&mut self, dropped_incomplete: usize, rejected_degenerate: usize) {
        self.dropped_incomplete = dropped_incomplete;
        self.rejected_degenerate = rejected_degenerate;
    }

    pub fn set_dataset(&mut self, observations: usize, countries: usize) {
        self.observations = observations;
        self.countries = countries;
    }

    pub fn set_selected(&mut self, selected: Vec<String>) {
        self.selected = selected;
    }

    pub fn display(&self) {
        print_section("📋", "DATASET SUMMARY");

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Source Rows"), Cell::new(self.source_rows)]);
        table.add_row(vec![
            Cell::new("🗑️  Dropped (Incomplete)"),
            Cell::new(self.dropped_incomplete).fg(count_color(self.dropped_incomplete)),
        ]);
        table.add_row(vec![
            Cell::new("⚠️  Rejected (Zero Denominator)"),
            Cell::new(self.rejected_degenerate).fg(count_color(self.rejected_degenerate)),
        ]);
        table.add_row(vec![
            Cell::new("✅ Observations"),
            Cell::new(self.observations)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![Cell::new("🌍 Countries"), Cell::new(self.countries)]);
        table.add_row(vec![
            Cell::new("🎯 Comparable Countries"),
            Cell::new(self.selected.len()).fg(Color::Cyan),
        ]);

        print_indented(&table);
    }
}

fn count_color(count: usize) -> Color {
    if count == 0 {
        Color::White
    } else {
        Color::Red
    }
}

fn print_section(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn coefficient_table(fit: &ModelFit) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Term").add_attribute(Attribute::Bold),
        Cell::new("Coef").add_attribute(Attribute::Bold),
        Cell::new("Std Err").add_attribute(Attribute::Bold),
        Cell::new("t").add_attribute(Attribute::Bold),
        Cell::new("P>|t|").add_attribute(Attribute::Bold),
    ]);

    for term in &fit.terms {
        let p_color = if term.p_value < SIGNIFICANCE {
            Color::Green
        } else {
            Color::Yellow
        };
        table.add_row(vec![
            Cell::new(&term.name),
            Cell::new(format!("{:.4}", term.coefficient)),
            Cell::new(format!("{:.4}", term.std_error)),
            Cell::new(format!("{:.3}", term.t_statistic)),
            Cell::new(format!("{:.4}", term.p_value)).fg(p_color),
        ]);
    }

    table
}

fn print_fit_stats(fit: &ModelFit, r_squared_label: &str) {
    println!(
        "      {} {}   Adj. R²: {}   F: {} (p = {})   N: {}",
        style(format!("{}:", r_squared_label)).dim(),
        style(format!("{:.4}", fit.r_squared)).yellow().bold(),
        style(format!("{:.4}", fit.adj_r_squared)).yellow(),
        style(format!("{:.3}", fit.f_statistic)).yellow(),
        format!("{:.4}", fit.f_p_value),
        fit.n_obs
    );
}

/// Print the OLS coefficient table and fit statistics
pub fn display_model_fit(fit: &ModelFit) {
    print_section("📈", "OLS REGRESSION");
    print_indented(&coefficient_table(fit));
    println!();
    print_fit_stats(fit, "R²");
}

/// Print the fixed-effects coefficient table and panel structure
pub fn display_panel_fit(panel: &PanelFit) {
    print_section("🧮", "FIXED-EFFECTS PANEL REGRESSION");
    print_indented(&coefficient_table(&panel.model));
    println!();
    print_fit_stats(&panel.model, "Within R²");
    println!(
        "      Entities: {}   Periods: {} ({}–{})   Excluded: {}",
        panel.n_entities,
        panel.time_span.periods,
        panel.time_span.first_year,
        panel.time_span.last_year,
        panel.excluded_entities.len()
    );
}

/// Print the comparable-country selection grouped by income group
pub fn display_selection(selected: &[SelectedCountry]) {
    print_section("🎯", "COMPARABLE COUNTRIES");

    if selected.is_empty() {
        println!("      {}", style("No countries fall inside the population band").dim());
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Country").add_attribute(Attribute::Bold),
        Cell::new("Income Group").add_attribute(Attribute::Bold),
        Cell::new("Mean Population").add_attribute(Attribute::Bold),
    ]);
    for country in selected {
        table.add_row(vec![
            Cell::new(&country.country),
            Cell::new(country.income_group.label()),
            Cell::new(format!("{:.0}", country.mean_population)),
        ]);
    }
    print_indented(&table);
}

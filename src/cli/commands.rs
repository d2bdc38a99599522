//! Handlers behind each subcommand and menu action

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::pipeline::{
    country_names, enrich, fit_fixed_effects, fit_ols, load_dataset, prepare_chart_data,
    select_comparable_countries, ChartKind, EnrichedDataset, ModelFit, PanelFit, RegressionError,
    SelectedCountry, SelectionConfig,
};
use crate::report::{
    display_model_fit, display_panel_fit, display_selection, export_analysis_json,
    render_ols_summary, render_panel_summary, save_dataframe, write_model_summary, ExportParams,
    RunSummary,
};
use crate::utils::{
    create_spinner, finish_with_failure, finish_with_success, print_error, print_step_header,
    print_step_time, print_success, print_warning, OutputConfig,
};

use super::args::Cli;

/// Enriched dataset plus the bookkeeping gathered while building it
#[derive(Debug)]
pub struct PreparedData {
    pub dataset: EnrichedDataset,
    pub summary: RunSummary,
}

/// Load and enrich the input named on the command line.
///
/// A missing source file is terminal: the error is returned before any
/// enrichment is attempted.
pub fn prepare_data(cli: &Cli, output: &OutputConfig) -> Result<PreparedData> {
    print_step_header(1, "Load & Clean");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading dataset...", output);

    let loaded = match load_dataset(&cli.input, &cli.load_options()) {
        Ok(loaded) => loaded,
        Err(err) => {
            finish_with_failure(&spinner, "Failed to load dataset");
            return Err(err).context("Data preparation failed");
        }
    };
    finish_with_success(
        &spinner,
        &format!("Loaded {} rows", loaded.dataset.len()),
    );
    if loaded.dropped_rows > 0 {
        print_warning(
            output,
            &format!("Dropped {} incomplete row(s)", loaded.dropped_rows),
        );
    }
    print_step_time(step_start.elapsed());

    print_step_header(2, "Feature Engineering");
    let step_start = Instant::now();
    let enrichment = enrich(loaded.dataset);
    if !enrichment.rejected.is_empty() {
        print_warning(
            output,
            &format!(
                "Rejected {} row(s) with a zero or undefined GDP/Population",
                enrichment.rejected.len()
            ),
        );
    }
    print_success("Derived income groups, GDP per capita and sector shares");
    print_step_time(step_start.elapsed());

    let mut summary = RunSummary::new(loaded.total_rows);
    summary.set_dropped(loaded.dropped_rows, enrichment.rejected.len());
    summary.set_dataset(enrichment.dataset.len(), enrichment.dataset.countries().len());

    Ok(PreparedData {
        dataset: enrichment.dataset,
        summary,
    })
}

/// Show an OLS fit and persist its summary artifact
pub fn report_ols(fit: &ModelFit, path: &Path) -> Result<()> {
    display_model_fit(fit);
    write_model_summary(path, &render_ols_summary(fit, Utc::now())?)?;
    print_success(&format!("Regression summary saved to '{}'", path.display()));
    Ok(())
}

/// Show a fixed-effects fit and persist its summary artifact
pub fn report_panel(fit: &PanelFit, path: &Path, output: &OutputConfig) -> Result<()> {
    display_panel_fit(fit);
    if !fit.excluded_entities.is_empty() {
        print_warning(
            output,
            &format!(
                "Excluded {} entit(ies) with a single observation",
                fit.excluded_entities.len()
            ),
        );
    }
    write_model_summary(path, &render_panel_summary(fit, Utc::now())?)?;
    print_success(&format!(
        "Panel regression summary saved to '{}'",
        path.display()
    ));
    Ok(())
}

pub fn run_ols(dataset: &EnrichedDataset, path: &Path) -> Result<ModelFit> {
    let fit = fit_ols(dataset).context("OLS regression failed")?;
    report_ols(&fit, path)?;
    Ok(fit)
}

pub fn run_panel(dataset: &EnrichedDataset, path: &Path, output: &OutputConfig) -> Result<PanelFit> {
    let fit = fit_fixed_effects(dataset).context("Fixed-effects regression failed")?;
    report_panel(&fit, path, output)?;
    Ok(fit)
}

pub fn run_select(dataset: &EnrichedDataset, config: &SelectionConfig) -> Vec<SelectedCountry> {
    let selected = select_comparable_countries(dataset, config);
    display_selection(&selected);
    selected
}

/// Write the enriched dataset for external consumers
pub fn run_export(dataset: &EnrichedDataset, path: &Path) -> Result<()> {
    let mut df = dataset
        .to_dataframe()
        .context("Failed to build enriched DataFrame")?;
    save_dataframe(&mut df, path)?;
    print_success(&format!("Enriched dataset saved to '{}'", path.display()));
    Ok(())
}

/// Write the series behind one chart kind
pub fn run_chart(
    dataset: &EnrichedDataset,
    kind: ChartKind,
    selected: &[String],
    path: &Path,
) -> Result<()> {
    let mut df = prepare_chart_data(dataset, kind, selected)
        .with_context(|| format!("Failed to prepare data for the {} chart", kind))?;
    save_dataframe(&mut df, path)?;
    print_success(&format!("Chart data ({}) saved to '{}'", kind, path.display()));
    Ok(())
}

/// Run every analysis over the shared dataset.
///
/// The two fits and the selection are computed concurrently, then reported in
/// a fixed order. A failing fit or artifact write is reported but does not stop
/// the others; the returned error lists every failure.
pub fn run_all(
    cli: &Cli,
    json: Option<&Path>,
    prepared: &mut PreparedData,
    output: &OutputConfig,
) -> Result<()> {
    let config = cli.selection_config()?;
    let dataset = &prepared.dataset;

    print_step_header(3, "Model Fitting");
    let step_start = Instant::now();
    let spinner = create_spinner("Fitting OLS and fixed-effects models...", output);
    let ((ols, panel), selected): (
        (Result<ModelFit, RegressionError>, Result<PanelFit, RegressionError>),
        Vec<SelectedCountry>,
    ) = rayon::join(
        || rayon::join(|| fit_ols(dataset), || fit_fixed_effects(dataset)),
        || select_comparable_countries(dataset, &config),
    );
    finish_with_success(&spinner, "Models fitted");
    print_step_time(step_start.elapsed());

    print_step_header(4, "Results");
    let mut failures = Vec::new();

    let ols_step = match &ols {
        Ok(fit) => report_ols(fit, &cli.ols_output),
        Err(err) => Err(anyhow::anyhow!("OLS regression failed: {}", err)),
    };
    if let Err(err) = ols_step {
        print_error(&format!("{:#}", err));
        failures.push(format!("OLS: {:#}", err));
    }
    let panel_step = match &panel {
        Ok(fit) => report_panel(fit, &cli.panel_output, output),
        Err(err) => Err(anyhow::anyhow!("Fixed-effects regression failed: {}", err)),
    };
    if let Err(err) = panel_step {
        print_error(&format!("{:#}", err));
        failures.push(format!("fixed effects: {:#}", err));
    }
    display_selection(&selected);
    prepared.summary.set_selected(country_names(&selected));

    if let Some(json_path) = json {
        let summary = &prepared.summary;
        let input = cli.input.display().to_string();
        let exported = export_analysis_json(
            json_path,
            &ExportParams {
                input_file: &input,
                observations: summary.observations,
                dropped_incomplete: summary.dropped_incomplete,
                rejected_degenerate: summary.rejected_degenerate,
            },
            ols.as_ref().ok(),
            panel.as_ref().ok(),
            &selected,
        );
        match exported {
            Ok(()) => print_success(&format!("Results exported to '{}'", json_path.display())),
            Err(err) => {
                print_error(&format!("{:#}", err));
                failures.push(format!("JSON export: {:#}", err));
            }
        }
    }

    prepared.summary.display();

    if failures.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} analysis step(s) failed: {}", failures.len(), failures.join("; "))
    }
}

//! econpanel CLI
//!
//! Loads the country-year indicator panel, derives income groups and sector
//! shares, then runs pooled OLS, country fixed effects and the
//! comparable-country selection.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use econpanel::cli::{
    default_chart_path, prepare_data, run_all, run_chart, run_export, run_menu, run_ols,
    run_panel, run_select, Cli, Commands,
};
use econpanel::pipeline::{country_names, select_comparable_countries};
use econpanel::utils::{print_banner, print_completion, print_config, print_error};

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            print_error(&format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let output = cli.output_config();
    let config = cli.selection_config()?;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        &cli.input,
        &cli.ols_output,
        &cli.panel_output,
        (config.min_population, config.max_population),
    );

    let mut prepared = prepare_data(cli, &output)?;

    match cli.command.as_ref().unwrap_or(&Commands::Menu) {
        Commands::Run { json } => {
            run_all(cli, json.as_deref(), &mut prepared, &output)?;
        }
        Commands::Ols => {
            run_ols(&prepared.dataset, &cli.ols_output)?;
        }
        Commands::Panel => {
            run_panel(&prepared.dataset, &cli.panel_output, &output)?;
        }
        Commands::Select => {
            run_select(&prepared.dataset, &config);
        }
        Commands::Export { output: path } => {
            run_export(&prepared.dataset, path)?;
        }
        Commands::Chart { kind, output: path } => {
            let dataset = &prepared.dataset;
            let selected = country_names(&select_comparable_countries(dataset, &config));
            let path = path.clone().unwrap_or_else(|| default_chart_path(*kind));
            run_chart(dataset, *kind, &selected, &path)?;
        }
        Commands::Menu => {
            run_menu(cli, &prepared, &output)?;
            return Ok(());
        }
    }

    print_completion();
    Ok(())
}

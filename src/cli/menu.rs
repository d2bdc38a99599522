//! Interactive action menu using dialoguer

use anyhow::Result;
use dialoguer::Select;

use crate::pipeline::{country_names, select_comparable_countries, ChartKind};
use crate::utils::{print_error, print_info, OutputConfig};

use super::args::{default_chart_path, Cli};
use super::commands::{run_chart, run_ols, run_panel, PreparedData};

/// Top-level actions offered by the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Regression,
    Visualize,
    PanelAnalysis,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 4] = [
        MenuAction::Regression,
        MenuAction::Visualize,
        MenuAction::PanelAnalysis,
        MenuAction::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::Regression => "Perform Statistical Analysis (OLS Regression)",
            MenuAction::Visualize => "Generate a Visualization",
            MenuAction::PanelAnalysis => "Perform Panel Data Analysis",
            MenuAction::Exit => "Exit",
        }
    }

    pub fn from_index(index: usize) -> Option<MenuAction> {
        MenuAction::ALL.get(index).copied()
    }
}

fn prompt_action() -> Result<MenuAction> {
    let labels: Vec<&str> = MenuAction::ALL.iter().map(|a| a.label()).collect();
    let index = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(MenuAction::from_index(index).unwrap_or(MenuAction::Exit))
}

fn prompt_chart_kind() -> Result<ChartKind> {
    let labels: Vec<&str> = ChartKind::ALL.iter().map(|k| k.description()).collect();
    let index = Select::new()
        .with_prompt("Which visualization?")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(ChartKind::ALL[index.min(ChartKind::ALL.len() - 1)])
}

/// Loop over the menu until the user exits. Comparable countries are selected
/// once up front and reused by the facet chart.
pub fn run_menu(cli: &Cli, prepared: &PreparedData, output: &OutputConfig) -> Result<()> {
    let config = cli.selection_config()?;
    let selected = country_names(&select_comparable_countries(&prepared.dataset, &config));

    loop {
        println!();
        match prompt_action()? {
            MenuAction::Regression => {
                if let Err(err) = run_ols(&prepared.dataset, &cli.ols_output) {
                    print_error(&format!("{:#}", err));
                }
            }
            MenuAction::Visualize => {
                let kind = prompt_chart_kind()?;
                let path = default_chart_path(kind);
                if let Err(err) = run_chart(&prepared.dataset, kind, &selected, &path) {
                    print_error(&format!("{:#}", err));
                }
            }
            MenuAction::PanelAnalysis => {
                if let Err(err) = run_panel(&prepared.dataset, &cli.panel_output, output) {
                    print_error(&format!("{:#}", err));
                }
            }
            MenuAction::Exit => {
                print_info("Exiting.");
                return Ok(());
            }
        }
    }
}

//! CLI module - argument parsing, command handlers and the interactive menu

mod args;
pub mod commands;
pub mod menu;

pub use args::{default_chart_path, Cli, Commands};
pub use commands::*;
pub use menu::{run_menu, MenuAction};

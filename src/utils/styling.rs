//! Terminal styling utilities

use std::path::Path;
use std::time::Duration;

use console::{style, Emoji};

pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static PEOPLE: Emoji<'_, '_> = Emoji("👥 ", "");

/// Output settings handed to every helper that may print warnings or progress.
///
/// Passed explicitly rather than stored globally, so a caller can silence one
/// run (or one test) without affecting any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Suppress warnings and spinners
    pub quiet: bool,
}

impl OutputConfig {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("econpanel").cyan().bold(),
        style(format!("v{}", version)).dim()
    );
    println!(
        "    {}",
        style("Sector shares and GDP per capita on a country-year panel").dim()
    );
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the configuration card
pub fn print_config(input: &Path, ols_output: &Path, panel_output: &Path, band: (f64, f64)) {
    println!("    {}", style("⚙️  Configuration").cyan().bold());
    println!("      {}Input:        {}", FOLDER, truncate_path(input, 48));
    println!("      {}OLS summary:  {}", SAVE, truncate_path(ols_output, 48));
    println!("      {}FE summary:   {}", SAVE, truncate_path(panel_output, 48));
    println!(
        "      {}Population:   {}",
        PEOPLE,
        style(format!("{:.0} – {:.0}", band.0, band.1)).yellow()
    );
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning unless the output config is quiet
pub fn print_warning(output: &OutputConfig, message: &str) {
    if !output.quiet {
        println!("    {} {}", WARN, style(message).yellow());
    }
}

pub fn print_error(message: &str) {
    eprintln!("    {} {}", style("✗").red().bold(), style(message).red());
}

pub fn print_step_time(elapsed: Duration) {
    println!(
        "      {}",
        style(format!("⏱  {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

pub fn print_completion() {
    println!();
    println!("    {} {}", ROCKET, style("Analysis complete!").green().bold());
    println!();
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}

//! Plain-text summary artifacts for fitted models

use std::fmt::{self, Write as _};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::pipeline::{ModelFit, PanelFit, CONFIDENCE_LEVEL};

const WIDTH: usize = 92;

fn rule(c: char) -> String {
    c.to_string().repeat(WIDTH)
}

fn centered(title: &str) -> String {
    format!("{:^width$}", title, width = WIDTH)
}

/// One line holding two label/value pairs side by side
fn pair_line(left: (&str, String), right: (&str, String)) -> String {
    format!(
        "{:<22}{:>22}    {:<24}{:>20}",
        left.0, left.1, right.0, right.1
    )
}

fn fmt_stat(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        "inf".to_string()
    } else if value != 0.0 && (value.abs() < 1e-3 || value.abs() >= 1e6) {
        format!("{:.3e}", value)
    } else {
        format!("{:.4}", value)
    }
}

fn write_header(
    out: &mut String,
    title: &str,
    model: &str,
    fit: &ModelFit,
    generated: DateTime<Utc>,
) -> fmt::Result {
    writeln!(out, "{}", centered(title))?;
    writeln!(out, "{}", rule('='))?;
    let lines = [
        pair_line(
            ("Dep. Variable:", fit.dependent.clone()),
            ("R-squared:", fmt_stat(fit.r_squared)),
        ),
        pair_line(
            ("Model:", model.to_string()),
            ("Adj. R-squared:", fmt_stat(fit.adj_r_squared)),
        ),
        pair_line(
            ("Date:", generated.format("%a, %d %b %Y").to_string()),
            ("F-statistic:", fmt_stat(fit.f_statistic)),
        ),
        pair_line(
            ("Time:", generated.format("%H:%M:%S").to_string()),
            ("Prob (F-statistic):", fmt_stat(fit.f_p_value)),
        ),
        pair_line(
            ("No. Observations:", fit.n_obs.to_string()),
            ("Df Residuals:", fit.df_resid.to_string()),
        ),
        pair_line(
            ("Df Model:", fit.df_model.to_string()),
            ("Residual Std. Err.:", fmt_stat(fit.residual_std_error)),
        ),
    ];
    for line in lines {
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

fn write_coefficients(out: &mut String, fit: &ModelFit) -> fmt::Result {
    let tail = (1.0 - CONFIDENCE_LEVEL) / 2.0;
    writeln!(out, "{}", rule('='))?;
    writeln!(
        out,
        "{:<24}{:>12}{:>12}{:>10}{:>10}{:>12}{:>12}",
        "",
        "coef",
        "std err",
        "t",
        "P>|t|",
        format!("[{:.3}", tail),
        format!("{:.3}]", 1.0 - tail)
    )?;
    writeln!(out, "{}", rule('-'))?;
    for term in &fit.terms {
        writeln!(
            out,
            "{:<24}{:>12}{:>12}{:>10.3}{:>10.3}{:>12}{:>12}",
            term.name,
            fmt_stat(term.coefficient),
            fmt_stat(term.std_error),
            term.t_statistic,
            term.p_value,
            fmt_stat(term.conf_low),
            fmt_stat(term.conf_high)
        )?;
    }
    writeln!(out, "{}", rule('='))
}

fn write_panel_structure(out: &mut String, panel: &PanelFit) -> fmt::Result {
    let fit = &panel.model;
    let span = &panel.time_span;
    let lines = [
        pair_line(
            ("Entities:", panel.n_entities.to_string()),
            ("R-squared (Within):", fmt_stat(fit.r_squared)),
        ),
        pair_line(
            ("Time periods:", span.periods.to_string()),
            ("First year:", span.first_year.to_string()),
        ),
        pair_line(
            ("Avg Obs per entity:", format!("{:.2}", fit.n_obs as f64 / panel.n_entities as f64)),
            ("Last year:", span.last_year.to_string()),
        ),
        pair_line(
            ("Excluded entities:", panel.excluded_entities.len().to_string()),
            ("Effects:", "Entity".to_string()),
        ),
    ];
    for line in lines {
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

fn write_entity_effects(out: &mut String, panel: &PanelFit) -> fmt::Result {
    if !panel.excluded_entities.is_empty() {
        writeln!(out)?;
        writeln!(out, "Excluded (single observation): {}", panel.excluded_entities.join(", "))?;
    }

    writeln!(out)?;
    writeln!(out, "Estimated entity effects")?;
    writeln!(out, "{}", rule('-'))?;
    for effect in &panel.entity_effects {
        writeln!(
            out,
            "{:<48}{:>8}{:>20}",
            effect.country,
            effect.n_obs,
            fmt_stat(effect.effect)
        )?;
    }
    writeln!(out, "{}", rule('='))
}

/// Render the pooled OLS summary
pub fn render_ols_summary(fit: &ModelFit, generated: DateTime<Utc>) -> Result<String> {
    let mut out = String::new();
    write_header(&mut out, "OLS Regression Results", "OLS", fit, generated)?;
    write_coefficients(&mut out, fit)?;
    Ok(out)
}

/// Render the fixed-effects summary, including panel structure and entity effects
pub fn render_panel_summary(panel: &PanelFit, generated: DateTime<Utc>) -> Result<String> {
    let mut out = String::new();
    write_header(&mut out, "PanelOLS Estimation Summary", "PanelOLS", &panel.model, generated)?;
    write_panel_structure(&mut out, panel)?;
    write_coefficients(&mut out, &panel.model)?;
    write_entity_effects(&mut out, panel)?;
    Ok(out)
}

/// Write a summary artifact, replacing any previous file at `path`
pub fn write_model_summary(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write summary to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_stat() {
        assert_eq!(fmt_stat(f64::NAN), "nan");
        assert_eq!(fmt_stat(f64::INFINITY), "inf");
        assert_eq!(fmt_stat(0.0), "0.0000");
        assert_eq!(fmt_stat(12.5), "12.5000");
        assert_eq!(fmt_stat(0.0001), "1.000e-4");
    }

    #[test]
    fn test_pair_line_fits_width() {
        let line = pair_line(("Model:", "OLS".to_string()), ("R-squared:", "0.5".to_string()));
        assert!(line.len() <= WIDTH);
    }
}

//! Trace rendering for the terminal
//!
//! The core engine never renders anything; this module is the consumer that
//! turns a [`RunReport`] into text for stdout.

use std::fmt::Write;

use clap::ValueEnum;

use crate::run::RunReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Summary plus an aligned iteration table
    #[default]
    Table,
    /// `iteration,parameter,objective_value` rows with a header
    Csv,
    /// The full report as pretty-printed JSON
    Json,
}

pub fn render(report: &RunReport, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Table => Ok(render_table(report)),
        OutputFormat::Csv => Ok(render_csv(report)),
        OutputFormat::Json => serde_json::to_string_pretty(report),
    }
}

fn render_table(report: &RunReport) -> String {
    let result = &report.result;
    let mut out = String::new();

    let _ = writeln!(out, "x*          {:.6}", result.x_star);
    let _ = writeln!(out, "f(x*)       {:.6}", result.f_star);
    let _ = writeln!(out, "iterations  {}", result.iterations);
    let _ = writeln!(out, "evaluations {}", result.evaluations);
    let _ = writeln!(out, "termination {:?}", result.termination_reason);
    let _ = writeln!(out);
    let _ = writeln!(out, "{:>9}  {:>14}  {:>14}", "iteration", "x", "f(x)");

    for record in &report.trace {
        let _ = writeln!(
            out,
            "{:>9}  {:>14.6}  {:>14.6}",
            record.iteration, record.parameter, record.objective_value
        );
    }
    out
}

fn render_csv(report: &RunReport) -> String {
    let mut out = String::from("iteration,parameter,objective_value\n");
    for record in &report.trace {
        let _ = writeln!(
            out,
            "{},{},{}",
            record.iteration, record.parameter, record.objective_value
        );
    }
    out
}

//! Command-line driver for simopt_core
//!
//! Loads a YAML run description, minimizes the configured objective with
//! stochastic approximation, and prints the resulting trace.

pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod run;

pub use config::{ObjectiveData, RunConfig, StepSizeData};
pub use logging::init_logging;
pub use output::{OutputFormat, render};
pub use run::{RunReport, run};

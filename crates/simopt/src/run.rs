//! Executes a run description against the core engine

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use serde::Serialize;
use simopt_core::error::Result;
use simopt_core::optimization::{OptimizationResult, OptimizationTrace, StochasticApproximation};

use crate::config::RunConfig;

/// Everything a trace consumer needs from one run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub result: OptimizationResult,
    pub trace: OptimizationTrace,
}

/// Build the configured objective and minimize it.
///
/// Progress is logged roughly every tenth of the iteration budget. When
/// `cancel` is set during the run, the report covers the iterations finished
/// so far.
pub fn run(config: &RunConfig, cancel: Option<Arc<AtomicBool>>) -> Result<RunReport> {
    let approximation = config.approximation_config();
    approximation.validate()?;

    let model = config.objective.build(config.seed)?;
    let schedule = approximation.step_size.build()?;

    let report_every = (approximation.max_iterations / 10).max(1);
    let mut engine = StochasticApproximation::new(model, schedule, approximation.derivative_step)
        .with_derivative_estimate(approximation.derivative_estimate)
        .with_progress_callback(Box::new(move |iteration, x, f| {
            if iteration % report_every == 0 {
                tracing::info!(iteration, x, f, "Calibration progress");
            }
        }));
    if let Some(flag) = cancel {
        engine = engine.with_cancel_flag(flag);
    }

    tracing::info!(
        seed = config.seed,
        objective = ?config.objective,
        "Starting run"
    );

    let result = engine.minimize(approximation.max_iterations, approximation.x0)?;
    Ok(RunReport {
        result,
        trace: engine.take_trace(),
    })
}

//! Stochastic approximation for noisy simulation objectives
//!
//! This module provides a derivative-free minimizer for objectives that can
//! only be sampled with noise, such as the output of a stochastic simulation
//! compared against a calibration target.
//!
//! # Example
//!
//! ```
//! use simopt_core::objective::FnObjective;
//! use simopt_core::optimization::{HarmonicStepSize, StochasticApproximation};
//!
//! let model = FnObjective::new(|x: f64| Ok((x - 3.0).powi(2)));
//! let schedule = HarmonicStepSize::new(1.0)?;
//! let mut engine = StochasticApproximation::new(model, schedule, 1e-3);
//!
//! let result = engine.minimize(500, 0.0)?;
//! assert!((result.x_star - 3.0).abs() < 0.1);
//! assert_eq!(engine.trace().len(), 500);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod result;
mod step_size;
mod stochastic_approximation;

// Re-export public types
pub use config::{ApproximationConfig, DerivativeEstimate};
pub use result::{OptimizationResult, OptimizationTrace, TerminationReason, TraceRecord};
pub use step_size::{HarmonicStepSize, PowerStepSize, StepSizeRule, StepSizeSchedule};
pub use stochastic_approximation::{ProgressCallback, StochasticApproximation};

use crate::error::Result;
use crate::objective::ObjectiveModel;

/// Main optimization entry point
///
/// Validates `config`, builds the configured step-size schedule and runs a
/// single minimization of `model`. Returns the result together with the full
/// trace. Use [`StochasticApproximation`] directly to keep the partial trace
/// of a failed run or to attach a cancel flag.
///
/// # Arguments
/// * `model` - The objective to minimize
/// * `config` - Iteration budget, starting point and schedule
/// * `progress_callback` - Optional callback for progress updates
pub fn minimize<M: ObjectiveModel>(
    model: M,
    config: &ApproximationConfig,
    progress_callback: Option<ProgressCallback>,
) -> Result<(OptimizationResult, OptimizationTrace)> {
    config.validate()?;
    let schedule = config.step_size.build()?;

    let mut engine = StochasticApproximation::new(model, schedule, config.derivative_step)
        .with_derivative_estimate(config.derivative_estimate);
    if let Some(callback) = progress_callback {
        engine = engine.with_progress_callback(callback);
    }

    let result = engine.minimize(config.max_iterations, config.x0)?;
    Ok((result, engine.take_trace()))
}

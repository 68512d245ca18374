//! Kiefer–Wolfowitz stochastic approximation
//!
//! Minimizes a noisy scalar objective with one-sided finite-difference
//! derivative estimates and a diminishing step size. No analytic gradient is
//! needed, so the objective can be an arbitrary stochastic simulation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{ObjectiveError, OptimizationError, Result};
use crate::objective::ObjectiveModel;

use super::config::{DerivativeEstimate, validate_run};
use super::result::{OptimizationResult, OptimizationTrace, TerminationReason};
use super::step_size::StepSizeSchedule;

/// Progress callback for stochastic approximation
///
/// Arguments: (iteration, parameter, `objective_value`)
pub type ProgressCallback = Box<dyn Fn(usize, f64, f64) + Send + Sync>;

/// Upper bound on the trace allocation made up front
const MAX_PREALLOCATED_RECORDS: usize = 16_384;

/// Stochastic approximation engine
///
/// Owns its objective model and step-size schedule. Each call to
/// [`minimize`](Self::minimize) resets the trace and result; use
/// [`take_trace`](Self::take_trace) to keep a finished trace before the next run.
pub struct StochasticApproximation<M, S> {
    model: M,
    step_size: S,
    derivative_step: f64,
    derivative_estimate: DerivativeEstimate,
    progress_callback: Option<ProgressCallback>,
    cancelled: Option<Arc<AtomicBool>>,
    trace: OptimizationTrace,
    result: Option<OptimizationResult>,
    evaluations: usize,
}

impl<M, S> StochasticApproximation<M, S>
where
    M: ObjectiveModel,
    S: StepSizeSchedule,
{
    /// Create an engine for `model` using `step_size` and the finite-difference
    /// perturbation `derivative_step`.
    ///
    /// `derivative_step` is validated when [`minimize`](Self::minimize) runs.
    pub fn new(model: M, step_size: S, derivative_step: f64) -> Self {
        Self {
            model,
            step_size,
            derivative_step,
            derivative_estimate: DerivativeEstimate::default(),
            progress_callback: None,
            cancelled: None,
            trace: OptimizationTrace::new(),
            result: None,
            evaluations: 0,
        }
    }

    #[must_use]
    pub fn with_derivative_estimate(mut self, estimate: DerivativeEstimate) -> Self {
        self.derivative_estimate = estimate;
        self
    }

    #[must_use]
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Stop the run at the next iteration boundary once `flag` is set
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = Some(flag);
        self
    }

    /// Run `max_iterations` iterations starting from `x0`.
    ///
    /// Iteration 0 is the evaluation at `x0`; each later iteration estimates
    /// the derivative, moves `x`, and samples the objective at the new point.
    /// On error the trace holds every iteration completed before the failure.
    pub fn minimize(&mut self, max_iterations: usize, x0: f64) -> Result<OptimizationResult> {
        self.reset();
        validate_run(max_iterations, x0, self.derivative_step)?;

        self.trace = OptimizationTrace::with_capacity(max_iterations.min(MAX_PREALLOCATED_RECORDS));

        tracing::info!(
            max_iterations,
            x0,
            derivative_step = self.derivative_step,
            derivative_estimate = ?self.derivative_estimate,
            "Starting stochastic approximation"
        );

        let h = self.derivative_step;
        let mut x = x0;
        let mut f = self.sample(x, 0)?;
        check_finite(0, x, f)?;
        self.record(x, f);

        let mut termination_reason = TerminationReason::MaxIterationsReached;

        for i in 1..max_iterations {
            if self.is_cancelled() {
                tracing::warn!(iteration = i, "Stochastic approximation cancelled");
                termination_reason = TerminationReason::UserCancelled;
                break;
            }

            let base = match self.derivative_estimate {
                DerivativeEstimate::ForwardReuse => f,
                DerivativeEstimate::ForwardFresh => self.sample(x, i)?,
            };
            let derivative = (self.sample(x + h, i)? - base) / h;

            x -= self.step_size.value(i) * derivative;
            if !derivative.is_finite() || !x.is_finite() {
                return Err(OptimizationError::NumericalInstability {
                    iteration: i,
                    parameter: x,
                    objective_value: f,
                });
            }

            f = self.sample(x, i)?;
            check_finite(i, x, f)?;

            tracing::debug!(iteration = i, x, f, derivative, "Stochastic approximation step");
            self.record(x, f);
        }

        let result = OptimizationResult {
            x_star: x,
            f_star: f,
            iterations: self.trace.len(),
            evaluations: self.evaluations,
            termination_reason,
        };

        tracing::info!(
            x_star = result.x_star,
            f_star = result.f_star,
            iterations = result.iterations,
            evaluations = result.evaluations,
            "Stochastic approximation finished"
        );

        self.result = Some(result);
        Ok(result)
    }

    fn sample(&mut self, x: f64, iteration: usize) -> Result<f64> {
        self.evaluations += 1;
        self.model
            .evaluate(x)
            .map_err(|source: ObjectiveError| OptimizationError::ObjectiveEvaluation {
                iteration,
                source,
            })
    }

    fn record(&mut self, x: f64, f: f64) {
        let iteration = self.trace.len();
        self.trace.record(x, f);
        if let Some(ref callback) = self.progress_callback {
            callback(iteration, x, f);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

impl<M, S> StochasticApproximation<M, S> {
    /// Trace of the latest run (partial if the run failed)
    #[must_use]
    pub fn trace(&self) -> &OptimizationTrace {
        &self.trace
    }

    /// Move the latest trace out of the engine, leaving an empty one
    pub fn take_trace(&mut self) -> OptimizationTrace {
        std::mem::take(&mut self.trace)
    }

    /// Result of the latest run, `None` until a run completes
    #[must_use]
    pub fn result(&self) -> Option<&OptimizationResult> {
        self.result.as_ref()
    }

    /// Objective evaluations performed by the latest run, including failed ones
    #[must_use]
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Forget the latest trace and result
    pub fn reset(&mut self) {
        self.trace.clear();
        self.result = None;
        self.evaluations = 0;
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

fn check_finite(iteration: usize, parameter: f64, objective_value: f64) -> Result<()> {
    if parameter.is_finite() && objective_value.is_finite() {
        Ok(())
    } else {
        Err(OptimizationError::NumericalInstability {
            iteration,
            parameter,
            objective_value,
        })
    }
}

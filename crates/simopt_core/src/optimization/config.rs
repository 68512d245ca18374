//! Optimization configuration types
//!
//! Serializable settings for a stochastic approximation run, so drivers can
//! load them from YAML/JSON and hand them to the engine.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::step_size::StepSizeRule;

/// How the finite-difference derivative is formed at each iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivativeEstimate {
    /// `(F(x + h) - f) / h` where `f` is the sample taken at the end of the
    /// previous iteration. One new evaluation per derivative.
    #[default]
    ForwardReuse,

    /// `(F(x + h) - F(x)) / h` with a fresh sample at `x`. Two new
    /// evaluations per derivative; avoids pairing noise from different
    /// iterations.
    ForwardFresh,
}

impl DerivativeEstimate {
    /// Objective evaluations spent per iteration after the first
    #[must_use]
    pub fn evaluations_per_iteration(&self) -> usize {
        match self {
            DerivativeEstimate::ForwardReuse => 2,
            DerivativeEstimate::ForwardFresh => 3,
        }
    }
}

/// Complete configuration for a stochastic approximation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproximationConfig {
    /// Number of recorded iterations, including the initial evaluation
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Starting point
    #[serde(default)]
    pub x0: f64,

    /// Finite-difference perturbation `h`
    #[serde(default = "default_derivative_step")]
    pub derivative_step: f64,

    #[serde(default)]
    pub step_size: StepSizeRule,

    #[serde(default)]
    pub derivative_estimate: DerivativeEstimate,
}

fn default_max_iterations() -> usize {
    500
}

fn default_derivative_step() -> f64 {
    1e-3
}

impl Default for ApproximationConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            x0: 0.0,
            derivative_step: default_derivative_step(),
            step_size: StepSizeRule::default(),
            derivative_estimate: DerivativeEstimate::default(),
        }
    }
}

impl ApproximationConfig {
    /// Check every setting without touching an objective
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_run(self.max_iterations, self.x0, self.derivative_step)?;
        self.step_size.build().map(|_| ())
    }
}

/// Checks shared by [`ApproximationConfig::validate`] and the engine
pub(crate) fn validate_run(
    max_iterations: usize,
    x0: f64,
    derivative_step: f64,
) -> Result<(), ConfigError> {
    if max_iterations == 0 {
        return Err(ConfigError::ZeroIterations);
    }
    if derivative_step == 0.0 || !derivative_step.is_finite() {
        return Err(ConfigError::InvalidDerivativeStep(derivative_step));
    }
    if !x0.is_finite() {
        return Err(ConfigError::NonFiniteStart(x0));
    }
    Ok(())
}

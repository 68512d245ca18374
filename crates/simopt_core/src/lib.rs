//! Simulation-model calibration library
//!
//! This crate provides a stochastic approximation optimizer for tuning a
//! simulation model's parameter against a target output. It supports:
//! - Any noisy scalar objective through the [`ObjectiveModel`] trait
//! - Kiefer–Wolfowitz iterations with forward finite differences
//! - Diminishing step-size schedules (harmonic and power-law)
//! - A full per-iteration trace for convergence plots and export
//! - Cooperative cancellation and progress callbacks
//!
//! # Example
//!
//! ```
//! use simopt_core::models::NoisyQuadratic;
//! use simopt_core::optimization::{HarmonicStepSize, StochasticApproximation};
//!
//! let model = NoisyQuadratic::new(3.0, 1.0, 0.1, 42)?;
//! let mut engine = StochasticApproximation::new(model, HarmonicStepSize::new(1.0)?, 0.1);
//! let result = engine.minimize(200, 0.0)?;
//!
//! for record in engine.trace() {
//!     let _ = (record.iteration, record.parameter, record.objective_value);
//! }
//! assert!(result.x_star.is_finite());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod models;
pub mod objective;
pub mod optimization;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{ConfigError, ObjectiveError, OptimizationError};
pub use objective::{FnObjective, ObjectiveModel};
pub use optimization::{
    HarmonicStepSize, OptimizationResult, OptimizationTrace, StepSizeSchedule,
    StochasticApproximation,
};

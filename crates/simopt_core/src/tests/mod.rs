//! Scenario tests for the stochastic approximation engine
//!
//! Tests are organized by topic:
//! - `engine` - trace bookkeeping, evaluation counts, validation and failures
//! - `convergence` - end-to-end minimization of known objectives

mod engine;

use crate::error::ObjectiveError;
use crate::objective::ObjectiveModel;

/// Deterministic objective that counts how often it is evaluated
pub(crate) struct Counting {
    pub calls: usize,
    func: fn(f64) -> f64,
}

impl Counting {
    pub fn new(func: fn(f64) -> f64) -> Self {
        Self { calls: 0, func }
    }
}

impl ObjectiveModel for Counting {
    fn evaluate(&mut self, x: f64) -> Result<f64, ObjectiveError> {
        self.calls += 1;
        Ok((self.func)(x))
    }
}

pub(crate) fn shifted_quadratic(x: f64) -> f64 {
    (x - 3.0).powi(2)
}

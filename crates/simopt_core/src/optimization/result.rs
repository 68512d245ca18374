//! Optimization trace and result types
//!
//! Contains types for tracking optimization progress and final results.

use serde::{Deserialize, Serialize};

/// One recorded iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Iteration index, starting at 0 for the initial evaluation
    pub iteration: usize,

    /// Parameter estimate after this iteration's update
    pub parameter: f64,

    /// Objective sample taken at `parameter`
    pub objective_value: f64,
}

/// Ordered history of a single run
///
/// Records are appended in iteration order; record `k` always has
/// `iteration == k`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationTrace {
    records: Vec<TraceRecord>,
}

impl OptimizationTrace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Append the next iteration
    pub(crate) fn record(&mut self, parameter: f64, objective_value: f64) {
        let iteration = self.records.len();
        self.records.push(TraceRecord {
            iteration,
            parameter,
            objective_value,
        });
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    #[must_use]
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&TraceRecord> {
        self.records.last()
    }

    pub fn iterations(&self) -> impl Iterator<Item = usize> + '_ {
        self.records.iter().map(|r| r.iteration)
    }

    pub fn parameters(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.parameter)
    }

    pub fn objective_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.objective_value)
    }

    /// Record with the lowest observed objective value
    ///
    /// With a noisy objective this is usually an optimistic draw, not the
    /// best parameter; prefer the final iterate for estimates.
    #[must_use]
    pub fn best(&self) -> Option<&TraceRecord> {
        self.records.iter().min_by(|a, b| {
            a.objective_value
                .partial_cmp(&b.objective_value)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

impl<'a> IntoIterator for &'a OptimizationTrace {
    type Item = &'a TraceRecord;
    type IntoIter = std::slice::Iter<'a, TraceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Reason why optimization terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// The full iteration budget was spent
    MaxIterationsReached,

    /// The cancel flag was raised between iterations
    UserCancelled,
}

/// Final estimate from a completed run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Final parameter estimate
    pub x_star: f64,

    /// Objective sample at `x_star`
    pub f_star: f64,

    /// Number of recorded iterations (trace length)
    pub iterations: usize,

    /// Total objective evaluations performed
    pub evaluations: usize,

    pub termination_reason: TerminationReason,
}

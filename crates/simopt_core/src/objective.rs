//! Objective model contract
//!
//! The optimizer only ever talks to an [`ObjectiveModel`]. Concrete simulation
//! adapters live in [`crate::models`] or in downstream crates.

use crate::error::ObjectiveError;

/// A (possibly stochastic) scalar objective to minimize.
///
/// Repeated calls with the same `x` may return different values. Models that
/// cannot handle a given `x` must say so with an [`ObjectiveError`] rather
/// than returning `NaN`.
pub trait ObjectiveModel {
    /// Return one realization of the objective at `x`
    fn evaluate(&mut self, x: f64) -> Result<f64, ObjectiveError>;
}

impl<M: ObjectiveModel + ?Sized> ObjectiveModel for &mut M {
    fn evaluate(&mut self, x: f64) -> Result<f64, ObjectiveError> {
        (**self).evaluate(x)
    }
}

impl<M: ObjectiveModel + ?Sized> ObjectiveModel for Box<M> {
    fn evaluate(&mut self, x: f64) -> Result<f64, ObjectiveError> {
        (**self).evaluate(x)
    }
}

/// Adapts a closure into an [`ObjectiveModel`]
pub struct FnObjective<F> {
    func: F,
}

impl<F> FnObjective<F>
where
    F: FnMut(f64) -> Result<f64, ObjectiveError>,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> ObjectiveModel for FnObjective<F>
where
    F: FnMut(f64) -> Result<f64, ObjectiveError>,
{
    fn evaluate(&mut self, x: f64) -> Result<f64, ObjectiveError> {
        (self.func)(x)
    }
}

//! Step-size schedules for stochastic approximation
//!
//! A schedule maps the iteration index to the gain applied to the derivative
//! estimate. Convergence needs the gains to sum to infinity while their squares
//! sum to a finite value; both schedules here satisfy that.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maps iteration index `i >= 0` to a strictly positive step size
pub trait StepSizeSchedule {
    fn value(&self, i: usize) -> f64;
}

impl<S: StepSizeSchedule + ?Sized> StepSizeSchedule for Box<S> {
    fn value(&self, i: usize) -> f64 {
        (**self).value(i)
    }
}

impl<S: StepSizeSchedule + ?Sized> StepSizeSchedule for &S {
    fn value(&self, i: usize) -> f64 {
        (**self).value(i)
    }
}

/// `a / (i + 1)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HarmonicStepSize {
    a: f64,
}

impl HarmonicStepSize {
    pub fn new(a: f64) -> Result<Self, ConfigError> {
        if !a.is_finite() || a <= 0.0 {
            return Err(ConfigError::NonPositiveStepScale(a));
        }
        Ok(Self { a })
    }
}

impl StepSizeSchedule for HarmonicStepSize {
    fn value(&self, i: usize) -> f64 {
        self.a / (i as f64 + 1.0)
    }
}

/// `a / (i + 1)^alpha` with `alpha` in (0.5, 1]
///
/// Smaller exponents decay more slowly, which helps when early iterates are
/// far from the optimum and the objective is very noisy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerStepSize {
    a: f64,
    alpha: f64,
}

impl PowerStepSize {
    pub fn new(a: f64, alpha: f64) -> Result<Self, ConfigError> {
        if !a.is_finite() || a <= 0.0 {
            return Err(ConfigError::NonPositiveStepScale(a));
        }
        if !(alpha > 0.5 && alpha <= 1.0) {
            return Err(ConfigError::InvalidStepExponent(alpha));
        }
        Ok(Self { a, alpha })
    }
}

impl StepSizeSchedule for PowerStepSize {
    fn value(&self, i: usize) -> f64 {
        self.a / (i as f64 + 1.0).powf(self.alpha)
    }
}

/// Serializable description of a schedule, used by run configurations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepSizeRule {
    Harmonic { a: f64 },
    Power { a: f64, alpha: f64 },
}

impl Default for StepSizeRule {
    fn default() -> Self {
        StepSizeRule::Harmonic { a: 1.0 }
    }
}

impl StepSizeRule {
    /// Validate the rule and build the schedule it describes
    pub fn build(&self) -> Result<Box<dyn StepSizeSchedule + Send + Sync>, ConfigError> {
        match *self {
            StepSizeRule::Harmonic { a } => Ok(Box::new(HarmonicStepSize::new(a)?)),
            StepSizeRule::Power { a, alpha } => Ok(Box::new(PowerStepSize::new(a, alpha)?)),
        }
    }
}

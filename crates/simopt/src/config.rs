//! YAML run descriptions
//!
//! `RunConfig` is the on-disk format read by `simopt run`. Enums use an
//! explicit `type` field so the files stay readable, and are converted to the
//! core types before a run starts.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use simopt_core::ObjectiveModel;
use simopt_core::error::ConfigError;
use simopt_core::models::{CalibrationObjective, LinearGaussianSimulator, NoisyQuadratic};
use simopt_core::optimization::{ApproximationConfig, DerivativeEstimate, StepSizeRule};

use crate::error::LoadError;

/// YAML-friendly step-size rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepSizeData {
    Harmonic { a: f64 },
    Power { a: f64, alpha: f64 },
}

impl Default for StepSizeData {
    fn default() -> Self {
        StepSizeData::Harmonic { a: 1.0 }
    }
}

impl From<StepSizeData> for StepSizeRule {
    fn from(data: StepSizeData) -> Self {
        match data {
            StepSizeData::Harmonic { a } => StepSizeRule::Harmonic { a },
            StepSizeData::Power { a, alpha } => StepSizeRule::Power { a, alpha },
        }
    }
}

/// Objective to minimize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectiveData {
    /// `scale * (x - center)^2` plus Gaussian noise
    NoisyQuadratic {
        center: f64,
        #[serde(default = "default_scale")]
        scale: f64,
        #[serde(default)]
        noise_std_dev: f64,
    },
    /// Calibrate `intercept + slope * x + noise` so its mean hits `target`
    Calibration {
        intercept: f64,
        slope: f64,
        #[serde(default)]
        noise_std_dev: f64,
        target: f64,
        #[serde(default = "default_replications")]
        replications: usize,
    },
}

fn default_scale() -> f64 {
    1.0
}

fn default_replications() -> usize {
    200
}

impl ObjectiveData {
    /// Build the objective model, seeding any randomness from `seed`
    pub fn build(&self, seed: u64) -> Result<Box<dyn ObjectiveModel + Send>, ConfigError> {
        match *self {
            ObjectiveData::NoisyQuadratic {
                center,
                scale,
                noise_std_dev,
            } => Ok(Box::new(NoisyQuadratic::new(
                center,
                scale,
                noise_std_dev,
                seed,
            )?)),
            ObjectiveData::Calibration {
                intercept,
                slope,
                noise_std_dev,
                target,
                replications,
            } => {
                let simulator = LinearGaussianSimulator::new(intercept, slope, noise_std_dev)?;
                Ok(Box::new(CalibrationObjective::new(
                    simulator,
                    target,
                    replications,
                    seed,
                )?))
            }
        }
    }
}

/// Complete description of one `simopt run`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    #[serde(default)]
    pub x0: f64,

    #[serde(default = "default_derivative_step")]
    pub derivative_step: f64,

    #[serde(default)]
    pub derivative_estimate: DerivativeEstimate,

    #[serde(default)]
    pub step_size: StepSizeData,

    pub objective: ObjectiveData,
}

fn default_seed() -> u64 {
    42
}

fn default_max_iterations() -> usize {
    ApproximationConfig::default().max_iterations
}

fn default_derivative_step() -> f64 {
    ApproximationConfig::default().derivative_step
}

impl RunConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }

    /// Read and parse a run description from disk
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path)
            .map_err(|e| LoadError::Io(format!("{}: {e}", path.display())))?;
        Self::from_yaml(&content).map_err(|e| LoadError::Parse(format!("{}: {e}", path.display())))
    }

    /// Optimizer settings for the core engine
    #[must_use]
    pub fn approximation_config(&self) -> ApproximationConfig {
        ApproximationConfig {
            max_iterations: self.max_iterations,
            x0: self.x0,
            derivative_step: self.derivative_step,
            step_size: self.step_size.into(),
            derivative_estimate: self.derivative_estimate,
        }
    }

    /// Calibration example printed by `simopt example`
    #[must_use]
    pub fn example() -> Self {
        Self {
            seed: default_seed(),
            max_iterations: 400,
            x0: 0.0,
            derivative_step: 0.1,
            derivative_estimate: DerivativeEstimate::ForwardReuse,
            step_size: StepSizeData::Harmonic { a: 0.1 },
            objective: ObjectiveData::Calibration {
                intercept: 1.0,
                slope: 2.0,
                noise_std_dev: 0.5,
                target: 5.0,
                replications: 250,
            },
        }
    }
}

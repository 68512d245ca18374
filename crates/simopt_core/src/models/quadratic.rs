//! Quadratic objective with additive Gaussian noise
//!
//! A cheap stand-in for a simulation model: its true minimum is known, which
//! makes it useful for tuning step sizes before pointing the optimizer at an
//! expensive simulator.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, Normal};

use crate::error::{ConfigError, ObjectiveError};
use crate::objective::ObjectiveModel;

/// `scale * (x - center)^2 + N(0, noise_std_dev)`
#[derive(Debug, Clone)]
pub struct NoisyQuadratic {
    center: f64,
    scale: f64,
    noise: Option<Normal<f64>>,
    rng: SmallRng,
}

impl NoisyQuadratic {
    pub fn new(center: f64, scale: f64, noise_std_dev: f64, seed: u64) -> Result<Self, ConfigError> {
        if !noise_std_dev.is_finite() || noise_std_dev < 0.0 {
            return Err(ConfigError::InvalidNoise(noise_std_dev));
        }
        let noise = if noise_std_dev > 0.0 {
            Some(Normal::new(0.0, noise_std_dev).map_err(|_| ConfigError::InvalidNoise(noise_std_dev))?)
        } else {
            None
        };
        Ok(Self {
            center,
            scale,
            noise,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// Noise-free quadratic, useful in tests
    #[must_use]
    pub fn deterministic(center: f64, scale: f64) -> Self {
        Self {
            center,
            scale,
            noise: None,
            rng: SmallRng::seed_from_u64(0),
        }
    }

    /// Expected objective value at `x`
    #[must_use]
    pub fn mean_at(&self, x: f64) -> f64 {
        self.scale * (x - self.center).powi(2)
    }
}

impl ObjectiveModel for NoisyQuadratic {
    fn evaluate(&mut self, x: f64) -> Result<f64, ObjectiveError> {
        let noise = self.noise.map_or(0.0, |n| n.sample(&mut self.rng));
        Ok(self.mean_at(x) + noise)
    }
}

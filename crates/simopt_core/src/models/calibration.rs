//! Calibration of a stochastic simulator against a target output
//!
//! Each objective evaluation runs a batch of simulator replications at the
//! candidate parameter and scores the squared distance between the mean
//! output and the calibration target.

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::error::{ConfigError, ObjectiveError};
use crate::objective::ObjectiveModel;

/// Replications per seeded batch
const MAX_BATCH_SIZE: usize = 100;

/// Mixes the evaluation counter into the base seed
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// A stochastic simulation producing one scalar output per replication
pub trait Simulator: Sync {
    /// Run one replication at parameter `x` using `seed`
    fn simulate(&self, x: f64, seed: u64) -> Result<f64, ObjectiveError>;
}

/// `intercept + slope * x + N(0, noise_std_dev)`
#[derive(Debug, Clone, Copy)]
pub struct LinearGaussianSimulator {
    intercept: f64,
    slope: f64,
    noise: Normal<f64>,
}

impl LinearGaussianSimulator {
    pub fn new(intercept: f64, slope: f64, noise_std_dev: f64) -> Result<Self, ConfigError> {
        if !noise_std_dev.is_finite() || noise_std_dev < 0.0 {
            return Err(ConfigError::InvalidNoise(noise_std_dev));
        }
        let noise =
            Normal::new(0.0, noise_std_dev).map_err(|_| ConfigError::InvalidNoise(noise_std_dev))?;
        Ok(Self {
            intercept,
            slope,
            noise,
        })
    }
}

impl Simulator for LinearGaussianSimulator {
    fn simulate(&self, x: f64, seed: u64) -> Result<f64, ObjectiveError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        Ok(self.intercept + self.slope * x + self.noise.sample(&mut rng))
    }
}

/// Objective `(mean simulated output - target)^2`
///
/// Seeds are derived from `seed` and an evaluation counter, so two objectives
/// built with the same arguments produce the same sequence of values.
#[derive(Debug, Clone)]
pub struct CalibrationObjective<S> {
    simulator: S,
    target: f64,
    replications: usize,
    seed: u64,
    evaluations: u64,
}

impl<S: Simulator> CalibrationObjective<S> {
    pub fn new(simulator: S, target: f64, replications: usize, seed: u64) -> Result<Self, ConfigError> {
        if replications == 0 {
            return Err(ConfigError::InvalidReplications);
        }
        Ok(Self {
            simulator,
            target,
            replications,
            seed,
            evaluations: 0,
        })
    }

    /// Number of objective evaluations made so far
    #[must_use]
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }
}

impl<S: Simulator> ObjectiveModel for CalibrationObjective<S> {
    fn evaluate(&mut self, x: f64) -> Result<f64, ObjectiveError> {
        let base_seed = self
            .seed
            .wrapping_add(self.evaluations.wrapping_mul(SEED_STRIDE));
        self.evaluations += 1;

        let mean = mean_output(&self.simulator, x, self.replications, base_seed)?;
        Ok((mean - self.target).powi(2))
    }
}

/// Mean simulator output over `replications` runs at `x`
///
/// Replications are split into seeded batches. Batch sums are combined in
/// batch order, so the result does not depend on thread scheduling.
pub fn mean_output<S: Simulator>(
    simulator: &S,
    x: f64,
    replications: usize,
    base_seed: u64,
) -> Result<f64, ObjectiveError> {
    if replications == 0 {
        return Err(ObjectiveError::Simulation(
            "no replications requested".to_string(),
        ));
    }

    let num_batches = replications.div_ceil(MAX_BATCH_SIZE);
    let run_batch = |i: usize| -> Result<f64, ObjectiveError> {
        let mut rng = SmallRng::seed_from_u64(base_seed.wrapping_add(i as u64));

        let batch_size = if i == num_batches - 1 {
            replications - i * MAX_BATCH_SIZE
        } else {
            MAX_BATCH_SIZE
        };

        let mut sum = 0.0;
        for _ in 0..batch_size {
            sum += simulator.simulate(x, rng.next_u64())?;
        }
        Ok(sum)
    };

    #[cfg(feature = "parallel")]
    let batch_sums: Vec<f64> = (0..num_batches)
        .into_par_iter()
        .map(run_batch)
        .collect::<Result<_, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let batch_sums: Vec<f64> = (0..num_batches)
        .map(run_batch)
        .collect::<Result<_, _>>()?;

    Ok(batch_sums.iter().sum::<f64>() / replications as f64)
}

//! Bundled objective models
//!
//! - [`NoisyQuadratic`] - closed-form test objective with Gaussian noise
//! - [`CalibrationObjective`] - squared distance between a simulator's mean
//!   output and a calibration target

mod calibration;
mod quadratic;

pub use calibration::{CalibrationObjective, LinearGaussianSimulator, Simulator, mean_output};
pub use quadratic::NoisyQuadratic;

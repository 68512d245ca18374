use std::fmt;

/// Errors raised by an objective model when it cannot produce a value
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectiveError {
    /// The requested parameter lies outside the model's valid domain
    OutOfDomain { value: f64, reason: String },
    /// The underlying simulation failed
    Simulation(String),
}

impl fmt::Display for ObjectiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveError::OutOfDomain { value, reason } => {
                write!(f, "parameter {value} is outside the model domain: {reason}")
            }
            ObjectiveError::Simulation(msg) => write!(f, "simulation failed: {msg}"),
        }
    }
}

impl std::error::Error for ObjectiveError {}

/// Invalid optimizer or adapter configuration, detected before any evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Step-size scale `a` must be finite and strictly positive
    NonPositiveStepScale(f64),
    /// Step-size exponent must lie in (0.5, 1]
    InvalidStepExponent(f64),
    /// `max_iterations` must be at least 1
    ZeroIterations,
    /// Derivative step must be finite and non-zero
    InvalidDerivativeStep(f64),
    /// Starting point must be finite
    NonFiniteStart(f64),
    /// Calibration needs at least one replication per evaluation
    InvalidReplications,
    /// Noise standard deviation must be finite and non-negative
    InvalidNoise(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveStepScale(a) => {
                write!(f, "step-size scale must be positive and finite, got {a}")
            }
            ConfigError::InvalidStepExponent(alpha) => {
                write!(f, "step-size exponent must be in (0.5, 1], got {alpha}")
            }
            ConfigError::ZeroIterations => write!(f, "max_iterations must be at least 1"),
            ConfigError::InvalidDerivativeStep(h) => {
                write!(f, "derivative step must be finite and non-zero, got {h}")
            }
            ConfigError::NonFiniteStart(x0) => write!(f, "starting point must be finite, got {x0}"),
            ConfigError::InvalidReplications => {
                write!(f, "replications per evaluation must be at least 1")
            }
            ConfigError::InvalidNoise(sd) => {
                write!(f, "noise standard deviation must be finite and non-negative, got {sd}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that abort a stochastic approximation run
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizationError {
    InvalidConfiguration(ConfigError),
    /// The objective model failed; `source` is passed through unmodified
    ObjectiveEvaluation {
        iteration: usize,
        source: ObjectiveError,
    },
    /// A NaN or infinite value appeared in the parameter, derivative or objective
    NumericalInstability {
        iteration: usize,
        parameter: f64,
        objective_value: f64,
    },
}

impl fmt::Display for OptimizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizationError::InvalidConfiguration(e) => write!(f, "invalid configuration: {e}"),
            OptimizationError::ObjectiveEvaluation { iteration, source } => {
                write!(f, "objective evaluation failed at iteration {iteration}: {source}")
            }
            OptimizationError::NumericalInstability {
                iteration,
                parameter,
                objective_value,
            } => write!(
                f,
                "non-finite value at iteration {iteration} (x={parameter}, f={objective_value})"
            ),
        }
    }
}

impl std::error::Error for OptimizationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OptimizationError::InvalidConfiguration(e) => Some(e),
            OptimizationError::ObjectiveEvaluation { source, .. } => Some(source),
            OptimizationError::NumericalInstability { .. } => None,
        }
    }
}

impl From<ConfigError> for OptimizationError {
    fn from(e: ConfigError) -> Self {
        OptimizationError::InvalidConfiguration(e)
    }
}

pub type Result<T> = std::result::Result<T, OptimizationError>;

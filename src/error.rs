//! Error type shared by the engine and every move rule.

use thiserror::Error;

/// Boxed error returned by fallible objective functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while configuring or running an optimization.
///
/// Early termination on stagnation and exhaustion of the iteration budget
/// are normal outcomes and never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A parameter has inconsistent bounds.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The search space has no dimensions.
    #[error("search space must contain at least one parameter")]
    EmptySearchSpace,

    /// The population was created with zero individuals.
    #[error("population size must be at least 1")]
    EmptyPopulation,

    /// A position does not match the search space dimension.
    #[error("position has {got} coordinates, search space has {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    /// The number of seeded positions does not match the population size.
    #[error("expected {expected} positions, got {got}")]
    SizeMismatch { expected: usize, got: usize },

    /// Random initialization never produced enough feasible individuals.
    #[error(
        "infeasible search space: {valid} feasible individuals after {attempts} attempts, \
         {required} required"
    )]
    InfeasibleSearchSpace {
        attempts: usize,
        valid: usize,
        required: usize,
    },

    /// The objective function failed. The run is aborted.
    #[error("objective evaluation failed for individual {index}")]
    Objective {
        index: usize,
        #[source]
        source: BoxError,
    },

    /// The objective returned NaN.
    #[error("objective returned a non-finite cost for individual {index}")]
    NonFiniteCost { index: usize },

    /// A policy name could not be parsed.
    #[error("unknown policy `{0}`")]
    UnknownPolicy(String),
}

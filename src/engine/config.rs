//! Run configuration and boundary/constraint policies.

use crate::error::{Error, Result};
use std::str::FromStr;

/// What gets regenerated when a `Discard` policy rejects a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiscardScope {
    /// Only the offending individual is redrawn.
    #[default]
    Individual,
    /// The whole population is redrawn.
    Population,
}

/// Treatment of coordinates that leave their parameter bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutOfBoundsPolicy {
    /// Wrap around modulo the interval width.
    PeriodicWrap,
    /// Mirror the excess back across the crossed bound.
    #[default]
    Reflect,
    /// Saturate at the crossed bound.
    ClampAtBoundary,
    /// Regenerate uniformly at random.
    Discard(DiscardScope),
}

impl FromStr for OutOfBoundsPolicy {
    type Err = Error;

    /// Accepts the short codes `PBC`, `RBC`, `BAB`, `DIS` or the long names,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pbc" | "periodic" | "wrap" => Ok(Self::PeriodicWrap),
            "rbc" | "reflect" => Ok(Self::Reflect),
            "bab" | "clamp" => Ok(Self::ClampAtBoundary),
            "dis" | "discard" => Ok(Self::Discard(DiscardScope::Individual)),
            "discard-population" => Ok(Self::Discard(DiscardScope::Population)),
            _ => Err(Error::UnknownPolicy(s.to_string())),
        }
    }
}

/// Treatment of individuals that violate constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstraintPolicy {
    /// Add `coefficient * violation` to the raw cost.
    Penalty,
    /// Force the cost to `+inf`.
    #[default]
    Barrier,
    /// Regenerate before evaluation; survivors that still violate are
    /// treated like `Barrier`.
    Discard(DiscardScope),
}

impl FromStr for ConstraintPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pty" | "penalty" => Ok(Self::Penalty),
            "bar" | "barrier" => Ok(Self::Barrier),
            "dis" | "discard" => Ok(Self::Discard(DiscardScope::Individual)),
            "discard-population" => Ok(Self::Discard(DiscardScope::Population)),
            _ => Err(Error::UnknownPolicy(s.to_string())),
        }
    }
}

/// Configuration shared by every algorithm.
///
/// Immutable for the duration of a run. The penalty coefficient stored here
/// is only the starting value; the live, scaled coefficient is owned by the
/// population.
///
/// # Examples
///
/// ```
/// use u_popheur::engine::{Config, ConstraintPolicy, OutOfBoundsPolicy};
///
/// let config = Config::default()
///     .with_max_iterations(200)
///     .with_max_stagnant_iterations(20)
///     .with_out_of_bounds_policy(OutOfBoundsPolicy::ClampAtBoundary)
///     .with_constraint_policy(ConstraintPolicy::Penalty)
///     .with_seed(101);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Iteration budget.
    pub max_iterations: usize,

    /// Consecutive near-identical best costs tolerated before stopping.
    ///
    /// Set to 0 to disable stagnation-based termination.
    pub max_stagnant_iterations: usize,

    /// Relative tolerance used to decide that two best costs are the same.
    pub stagnation_relative_tolerance: f64,

    /// Suppresses progress logging.
    pub silent: bool,

    pub out_of_bounds_policy: OutOfBoundsPolicy,

    pub constraint_policy: ConstraintPolicy,

    /// Initial penalty coefficient.
    pub penalty_coefficient: f64,

    /// Factor applied to the live penalty coefficient once per iteration.
    pub penalty_scaling_factor: f64,

    /// Upper bound of the live penalty coefficient.
    pub max_penalty_parameter: f64,

    /// Minimum number of feasible individuals after random initialization.
    pub min_valid_solutions: usize,

    /// Number of whole-population draws before initialization gives up.
    pub max_init_attempts: usize,

    /// Redraws per individual under `ConstraintPolicy::Discard(Individual)`.
    pub max_regeneration_attempts: usize,

    /// Evaluate costs with rayon (requires the `parallel` feature).
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            max_stagnant_iterations: 0,
            stagnation_relative_tolerance: 1e-8,
            silent: true,
            out_of_bounds_policy: OutOfBoundsPolicy::default(),
            constraint_policy: ConstraintPolicy::default(),
            penalty_coefficient: 2.0,
            penalty_scaling_factor: 10.0,
            max_penalty_parameter: 1e10,
            min_valid_solutions: 1,
            max_init_attempts: 100,
            max_regeneration_attempts: 10,
            parallel: false,
            seed: None,
        }
    }
}

impl Config {
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_max_stagnant_iterations(mut self, n: usize) -> Self {
        self.max_stagnant_iterations = n;
        self
    }

    pub fn with_stagnation_relative_tolerance(mut self, tol: f64) -> Self {
        self.stagnation_relative_tolerance = tol.max(0.0);
        self
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn with_out_of_bounds_policy(mut self, policy: OutOfBoundsPolicy) -> Self {
        self.out_of_bounds_policy = policy;
        self
    }

    pub fn with_constraint_policy(mut self, policy: ConstraintPolicy) -> Self {
        self.constraint_policy = policy;
        self
    }

    pub fn with_penalty_coefficient(mut self, c: f64) -> Self {
        self.penalty_coefficient = c;
        self
    }

    pub fn with_penalty_scaling_factor(mut self, f: f64) -> Self {
        self.penalty_scaling_factor = f;
        self
    }

    pub fn with_max_penalty_parameter(mut self, max: f64) -> Self {
        self.max_penalty_parameter = max;
        self
    }

    pub fn with_min_valid_solutions(mut self, n: usize) -> Self {
        self.min_valid_solutions = n;
        self
    }

    pub fn with_max_init_attempts(mut self, n: usize) -> Self {
        self.max_init_attempts = n;
        self
    }

    pub fn with_max_regeneration_attempts(mut self, n: usize) -> Self {
        self.max_regeneration_attempts = n;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfig(msg));
        if !(self.stagnation_relative_tolerance >= 0.0) {
            return invalid("stagnation_relative_tolerance must be non-negative".into());
        }
        if !(self.penalty_coefficient >= 0.0) || !self.penalty_coefficient.is_finite() {
            return invalid(format!(
                "penalty_coefficient must be finite and non-negative, got {}",
                self.penalty_coefficient
            ));
        }
        if !(self.penalty_scaling_factor >= 1.0) {
            return invalid(format!(
                "penalty_scaling_factor must be at least 1, got {}",
                self.penalty_scaling_factor
            ));
        }
        if !(self.max_penalty_parameter >= self.penalty_coefficient) {
            return invalid("max_penalty_parameter must not be below penalty_coefficient".into());
        }
        if self.max_init_attempts == 0 {
            return invalid("max_init_attempts must be at least 1".into());
        }
        Ok(())
    }
}

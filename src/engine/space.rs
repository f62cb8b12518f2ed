//! Search dimensions and the search space built from them.

use crate::error::{Error, Result};
use rand::Rng;

/// One search dimension: bounds and integrality.
///
/// # Examples
///
/// ```
/// use u_popheur::engine::Parameter;
///
/// let p = Parameter::new("k", 0.0, 10.0, true);
/// assert_eq!(p.snap(3.6), 4.0);
/// assert_eq!(p.snap(12.0), 10.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    name: String,
    min: f64,
    max: f64,
    integer: bool,
}

impl Parameter {
    /// Creates a new parameter. Bounds are checked by [`validate`](Self::validate).
    pub fn new(name: impl Into<String>, min: f64, max: f64, integer: bool) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            integer,
        }
    }

    /// Creates a continuous parameter.
    pub fn continuous(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self::new(name, min, max, false)
    }

    /// Creates an integer parameter.
    pub fn integer(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self::new(name, min, max, true)
    }

    /// Builds `n` identical parameters named `{prefix}0 .. {prefix}{n-1}`.
    ///
    /// An empty prefix becomes `"x"`.
    pub fn list(prefix: &str, n: usize, min: f64, max: f64, integer: bool) -> Vec<Parameter> {
        let prefix = if prefix.is_empty() { "x" } else { prefix };
        (0..n)
            .map(|i| Parameter::new(format!("{prefix}{i}"), min, max, integer))
            .collect()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_range(&mut self, min: f64, max: f64) {
        self.min = min;
        self.max = max;
    }

    pub fn set_integer(&mut self, integer: bool) {
        self.integer = integer;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Interval width `max - min`.
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_integer(&self) -> bool {
        self.integer
    }

    /// Whether `value` lies in `[min, max]`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Rounds integer parameters to the nearest integer inside the bounds.
    ///
    /// Continuous parameters are returned unchanged.
    pub fn snap(&self, value: f64) -> f64 {
        if self.integer {
            value.round().clamp(self.min.ceil(), self.max.floor())
        } else {
            value
        }
    }

    /// Draws a uniform value in `[min, max]`, snapped for integer parameters.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.random();
        self.snap(self.min + u * self.width())
    }

    /// Checks that the bounds are finite, ordered, and (for integer
    /// parameters) contain at least one integer.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidParameter {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(invalid("bounds must be finite"));
        }
        if self.min > self.max {
            return Err(invalid("min must not exceed max"));
        }
        if self.integer && self.min.ceil() > self.max.floor() {
            return Err(invalid("integer range contains no integer"));
        }
        Ok(())
    }
}

/// Ordered collection of parameters.
///
/// Index `j` of every position vector maps to `parameters()[j]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchSpace {
    parameters: Vec<Parameter>,
}

impl SearchSpace {
    /// Creates a search space, validating every parameter.
    pub fn new(parameters: Vec<Parameter>) -> Result<Self> {
        if parameters.is_empty() {
            return Err(Error::EmptySearchSpace);
        }
        for p in &parameters {
            p.validate()?;
        }
        Ok(Self { parameters })
    }

    /// Number of dimensions.
    pub fn dimension(&self) -> usize {
        self.parameters.len()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter(&self, j: usize) -> &Parameter {
        &self.parameters[j]
    }

    /// Draws a uniformly random point.
    pub fn random<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.parameters.iter().map(|p| p.sample(rng)).collect()
    }

    /// Whether every coordinate of `position` is inside its bounds.
    pub fn contains(&self, position: &[f64]) -> bool {
        position.len() == self.dimension()
            && self
                .parameters
                .iter()
                .zip(position)
                .all(|(p, &x)| p.contains(x))
    }
}

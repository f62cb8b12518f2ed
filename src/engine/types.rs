//! Core types: the objective contract and the candidate individual.

use crate::error::BoxError;
use std::ops::{Index, IndexMut};
use std::sync::Arc;

/// A black-box objective to minimize.
///
/// Constraint violation is reported by the same object that computes the
/// cost. A violation of `0.0` means the point is feasible; any positive
/// value means it is not, and its magnitude drives the penalty method.
///
/// Any `Fn(&[f64]) -> f64 + Send + Sync` is an unconstrained objective.
/// Implement the trait directly for objectives that can fail.
///
/// # Thread Safety
///
/// `Objective` must be `Send + Sync` because costs may be computed in
/// parallel using rayon.
pub trait Objective: Send + Sync {
    /// Computes the raw cost of `x`. Lower is better.
    ///
    /// Returning an error aborts the run.
    fn cost(&self, x: &[f64]) -> Result<f64, BoxError>;

    /// Aggregate constraint violation of `x` (0 when feasible).
    fn violation(&self, _x: &[f64]) -> f64 {
        0.0
    }
}

impl<F> Objective for F
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn cost(&self, x: &[f64]) -> Result<f64, BoxError> {
        Ok(self(x))
    }
}

type ConstraintFn = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// An objective with inequality constraints `g(x) <= 0`.
///
/// The violation is the sum of squared positive parts of all constraints.
///
/// # Examples
///
/// ```
/// use u_popheur::engine::{Constrained, Objective};
///
/// // minimize x0^2 + x1^2 subject to x0 + x1 >= 1
/// let objective = Constrained::new(|x: &[f64]| x[0] * x[0] + x[1] * x[1])
///     .with_constraint(|x: &[f64]| 1.0 - x[0] - x[1]);
///
/// assert_eq!(objective.violation(&[1.0, 1.0]), 0.0);
/// assert!(objective.violation(&[0.0, 0.0]) > 0.0);
/// ```
#[derive(Clone)]
pub struct Constrained<F> {
    objective: F,
    constraints: Vec<ConstraintFn>,
}

impl<F> Constrained<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    pub fn new(objective: F) -> Self {
        Self {
            objective,
            constraints: Vec::new(),
        }
    }

    /// Adds the constraint `g(x) <= 0`.
    pub fn with_constraint<G>(mut self, g: G) -> Self
    where
        G: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        self.constraints.push(Arc::new(g));
        self
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}

impl<F> Objective for Constrained<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn cost(&self, x: &[f64]) -> Result<f64, BoxError> {
        Ok((self.objective)(x))
    }

    fn violation(&self, x: &[f64]) -> f64 {
        self.constraints
            .iter()
            .map(|g| g(x).max(0.0).powi(2))
            .sum()
    }
}

/// One candidate solution.
///
/// An unevaluated individual carries a cost of `+inf`, which is also the
/// sentinel for rejected (barrier) candidates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual {
    pub position: Vec<f64>,
    pub cost: f64,
}

impl Individual {
    /// Creates an unevaluated individual at `position`.
    pub fn new(position: Vec<f64>) -> Self {
        Self {
            position,
            cost: f64::INFINITY,
        }
    }

    pub fn with_cost(position: Vec<f64>, cost: f64) -> Self {
        Self { position, cost }
    }

    pub fn dimension(&self) -> usize {
        self.position.len()
    }

    /// False for unevaluated or rejected individuals.
    pub fn has_finite_cost(&self) -> bool {
        self.cost.is_finite()
    }
}

impl Index<usize> for Individual {
    type Output = f64;

    fn index(&self, j: usize) -> &f64 {
        &self.position[j]
    }
}

impl IndexMut<usize> for Individual {
    fn index_mut(&mut self, j: usize) -> &mut f64 {
        &mut self.position[j]
    }
}

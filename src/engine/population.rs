//! The candidate population: evaluation, constraints, penalties, and
//! boundary repair.
//!
//! Every stochastic decision of a run draws from the population's single
//! seeded generator, so a fixed seed reproduces a whole run.

use super::config::{Config, ConstraintPolicy, DiscardScope, OutOfBoundsPolicy};
use super::space::SearchSpace;
use super::types::{Individual, Objective};
use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

/// Result of [`Population::check_boundary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryOutcome {
    /// Every coordinate was already inside its bounds.
    InBounds,
    /// At least one coordinate was brought back into bounds.
    Repaired,
    /// The policy is `Discard`; the individual must be regenerated.
    Discard,
}

/// A fixed-size set of individuals plus the best feasible one found so far.
///
/// # Examples
///
/// ```
/// use u_popheur::engine::{Config, Parameter, Population, SearchSpace};
///
/// let space = SearchSpace::new(Parameter::list("x", 2, -5.12, 5.12, false)).unwrap();
/// let sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
/// let config = Config::default().with_seed(1);
/// let mut population = Population::new(20, sphere, space, config).unwrap();
///
/// population.initialize_random().unwrap();
/// assert!(population.is_initialized());
/// assert!(population.best().cost.is_finite());
/// ```
pub struct Population<O: Objective> {
    individuals: Vec<Individual>,
    best: Individual,
    search_space: SearchSpace,
    objective: O,
    config: Config,
    penalty_coefficient: f64,
    rng: StdRng,
    initialized: bool,
}

impl<O: Objective> Population<O> {
    /// Creates a population of `size` unevaluated individuals.
    pub fn new(
        size: usize,
        objective: O,
        search_space: SearchSpace,
        config: Config,
    ) -> Result<Self> {
        if size == 0 {
            return Err(Error::EmptyPopulation);
        }
        config.validate()?;

        let dim = search_space.dimension();
        let rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));

        Ok(Self {
            individuals: vec![Individual::new(vec![0.0; dim]); size],
            best: Individual::new(Vec::new()),
            search_space,
            objective,
            penalty_coefficient: config.penalty_coefficient,
            config,
            rng,
            initialized: false,
        })
    }

    pub fn size(&self) -> usize {
        self.individuals.len()
    }

    pub fn dimension(&self) -> usize {
        self.search_space.dimension()
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Mutable access for move rules. The population size is fixed.
    pub fn individuals_mut(&mut self) -> &mut [Individual] {
        &mut self.individuals
    }

    /// Best feasible individual found so far.
    ///
    /// Its position is empty and its cost `+inf` until a feasible individual
    /// has been evaluated.
    pub fn best(&self) -> &Individual {
        &self.best
    }

    pub fn search_space(&self) -> &SearchSpace {
        &self.search_space
    }

    pub fn objective(&self) -> &O {
        &self.objective
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Live penalty coefficient.
    pub fn penalty_coefficient(&self) -> f64 {
        self.penalty_coefficient
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Snapshot of all positions.
    pub fn positions(&self) -> Vec<Vec<f64>> {
        self.individuals.iter().map(|ind| ind.position.clone()).collect()
    }

    /// Uniform draw in `[0, 1)` from the run's random stream.
    pub fn random(&mut self) -> f64 {
        self.rng.random()
    }

    /// The run's random stream, for draws other than `[0, 1)` uniforms.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Replaces all positions with caller-provided ones and marks the
    /// population initialized. Integer coordinates are snapped.
    pub fn seed_positions(&mut self, positions: Vec<Vec<f64>>) -> Result<()> {
        if positions.len() != self.size() {
            return Err(Error::SizeMismatch {
                expected: self.size(),
                got: positions.len(),
            });
        }
        let dim = self.dimension();
        if let Some(bad) = positions.iter().find(|p| p.len() != dim) {
            return Err(Error::DimensionMismatch {
                expected: dim,
                got: bad.len(),
            });
        }

        for (ind, mut position) in self.individuals.iter_mut().zip(positions) {
            for (x, p) in position.iter_mut().zip(self.search_space.parameters()) {
                *x = p.snap(*x);
            }
            *ind = Individual::new(position);
        }
        self.reset_run_state();
        self.initialized = true;
        Ok(())
    }

    /// Fills the population with random points, evaluates it, and marks it
    /// initialized.
    ///
    /// Fails with [`Error::InfeasibleSearchSpace`] when fewer than
    /// `min_valid_solutions` feasible individuals are drawn within
    /// `max_init_attempts` attempts.
    pub fn initialize_random(&mut self) -> Result<()> {
        let valid = self.draw_population()?;
        if !self.config.silent {
            info!(size = self.size(), valid, "initial population generated");
        }
        self.reset_run_state();
        self.evaluate()?;
        self.initialized = true;
        Ok(())
    }

    /// Draws a fresh population until enough individuals are feasible.
    ///
    /// Returns the number of feasible individuals.
    fn draw_population(&mut self) -> Result<usize> {
        let required = self.config.min_valid_solutions;
        if required > self.size() {
            return Err(Error::InfeasibleSearchSpace {
                attempts: 0,
                valid: 0,
                required,
            });
        }

        let attempts = self.config.max_init_attempts;
        let mut valid = 0;
        for attempt in 1..=attempts {
            for i in 0..self.size() {
                self.regenerate(i);
            }
            valid = (0..self.size())
                .filter(|&i| !self.check_violates_constraints(i))
                .count();
            if valid >= required {
                return Ok(valid);
            }
            debug!(attempt, valid, required, "too few feasible individuals, redrawing");
        }

        Err(Error::InfeasibleSearchSpace {
            attempts,
            valid,
            required,
        })
    }

    fn reset_run_state(&mut self) {
        self.best = Individual::new(Vec::new());
        self.penalty_coefficient = self.config.penalty_coefficient;
    }

    /// Replaces individual `i` with an unevaluated random point.
    pub fn regenerate(&mut self, i: usize) {
        let position = self.search_space.random(&mut self.rng);
        self.individuals[i] = Individual::new(position);
    }

    /// Recomputes every cost and updates the best individual.
    ///
    /// Only feasible individuals can become the best one. An objective
    /// failure or a NaN cost aborts with an error.
    pub fn evaluate(&mut self) -> Result<()> {
        let scores = self.raw_scores()?;
        for (i, (raw, violation)) in scores.into_iter().enumerate() {
            let violated = violation > 0.0;
            let cost = self.penalized(raw, violation);
            self.individuals[i].cost = cost;
            if cost < self.best.cost && !violated {
                self.best = self.individuals[i].clone();
            }
        }
        Ok(())
    }

    /// `(raw cost, violation)` of every individual.
    #[cfg(feature = "parallel")]
    fn raw_scores(&self) -> Result<Vec<(f64, f64)>> {
        use rayon::prelude::*;

        if !self.config.parallel {
            return self.sequential_scores();
        }
        self.individuals
            .par_iter()
            .enumerate()
            .map(|(i, ind)| score(&self.objective, i, &ind.position))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn raw_scores(&self) -> Result<Vec<(f64, f64)>> {
        self.sequential_scores()
    }

    fn sequential_scores(&self) -> Result<Vec<(f64, f64)>> {
        self.individuals
            .iter()
            .enumerate()
            .map(|(i, ind)| score(&self.objective, i, &ind.position))
            .collect()
    }

    fn penalized(&self, raw: f64, violation: f64) -> f64 {
        if violation <= 0.0 {
            return raw;
        }
        match self.config.constraint_policy {
            ConstraintPolicy::Penalty => raw + self.penalty_coefficient * violation,
            ConstraintPolicy::Barrier | ConstraintPolicy::Discard(_) => f64::INFINITY,
        }
    }

    /// Whether individual `i` violates the objective's constraints.
    pub fn check_violates_constraints(&self, i: usize) -> bool {
        self.objective.violation(&self.individuals[i].position) > 0.0
    }

    /// Multiplies the live penalty coefficient by the scaling factor,
    /// capped at `max_penalty_parameter`. Returns the new value.
    pub fn scale_penalty_coefficient(&mut self) -> f64 {
        self.penalty_coefficient = (self.penalty_coefficient * self.config.penalty_scaling_factor)
            .min(self.config.max_penalty_parameter);
        self.penalty_coefficient
    }

    /// Applies the out-of-bounds policy to every coordinate of individual
    /// `i`, then snaps integer coordinates.
    ///
    /// Under `Discard` an out-of-bounds position is left untouched for the
    /// caller to regenerate.
    /// Non-finite coordinates are redrawn uniformly under the other
    /// policies.
    pub fn check_boundary(&mut self, i: usize) -> BoundaryOutcome {
        let policy = self.config.out_of_bounds_policy;
        let params = self.search_space.parameters();
        let ind = &mut self.individuals[i];
        if let OutOfBoundsPolicy::Discard(_) = policy {
            if !self.search_space.contains(&ind.position) {
                return BoundaryOutcome::Discard;
            }
        }
        let mut outcome = BoundaryOutcome::InBounds;

        for (j, p) in params.iter().enumerate() {
            let x = ind[j];
            if p.contains(x) {
                ind[j] = p.snap(x);
                continue;
            }
            ind[j] = if x.is_finite() {
                p.snap(repair(policy, x, p.min(), p.max()))
            } else {
                p.sample(&mut self.rng)
            };
            outcome = BoundaryOutcome::Repaired;
        }
        outcome
    }

    /// Runs [`check_boundary`](Self::check_boundary) on every individual and
    /// regenerates discarded ones according to the discard scope.
    ///
    /// Returns the number of discarded individuals.
    pub fn enforce_boundaries(&mut self) -> usize {
        let discarded: Vec<usize> = (0..self.size())
            .filter(|&i| self.check_boundary(i) == BoundaryOutcome::Discard)
            .collect();
        if discarded.is_empty() {
            return 0;
        }

        match self.config.out_of_bounds_policy {
            OutOfBoundsPolicy::Discard(DiscardScope::Population) => {
                for i in 0..self.size() {
                    self.regenerate(i);
                }
            }
            _ => {
                for &i in &discarded {
                    self.regenerate(i);
                }
            }
        }
        discarded.len()
    }

    /// Regenerates constraint violators under `ConstraintPolicy::Discard`.
    ///
    /// With individual scope each violator is redrawn up to
    /// `max_regeneration_attempts` times; survivors are rejected at
    /// evaluation. With population scope the whole population is redrawn
    /// as during initialization. Other policies do nothing.
    pub fn enforce_constraints(&mut self) -> Result<()> {
        match self.config.constraint_policy {
            ConstraintPolicy::Discard(DiscardScope::Individual) => {
                let max_attempts = self.config.max_regeneration_attempts;
                for i in 0..self.size() {
                    let mut attempts = 0;
                    while attempts < max_attempts && self.check_violates_constraints(i) {
                        self.regenerate(i);
                        attempts += 1;
                    }
                    if attempts == max_attempts && self.check_violates_constraints(i) {
                        warn!(individual = i, attempts, "no feasible replacement found");
                    }
                }
                Ok(())
            }
            ConstraintPolicy::Discard(DiscardScope::Population) => {
                if (0..self.size()).any(|i| self.check_violates_constraints(i)) {
                    self.draw_population()?;
                }
                Ok(())
            }
            ConstraintPolicy::Penalty | ConstraintPolicy::Barrier => Ok(()),
        }
    }
}

fn score<O: Objective>(objective: &O, index: usize, x: &[f64]) -> Result<(f64, f64)> {
    let raw = objective
        .cost(x)
        .map_err(|source| Error::Objective { index, source })?;
    if raw.is_nan() {
        return Err(Error::NonFiniteCost { index });
    }
    Ok((raw, objective.violation(x)))
}

/// Brings a finite out-of-range `x` back into `[lo, hi]`.
fn repair(policy: OutOfBoundsPolicy, x: f64, lo: f64, hi: f64) -> f64 {
    let width = hi - lo;
    if width <= 0.0 {
        return lo;
    }
    let y = match policy {
        OutOfBoundsPolicy::PeriodicWrap => lo + (x - lo).rem_euclid(width),
        OutOfBoundsPolicy::Reflect => {
            let period = 2.0 * width;
            let offset = (x - lo).rem_euclid(period);
            if offset > width {
                lo + period - offset
            } else {
                lo + offset
            }
        }
        OutOfBoundsPolicy::ClampAtBoundary | OutOfBoundsPolicy::Discard(_) => x,
    };
    // rounding in rem_euclid can land one ulp outside
    y.clamp(lo, hi)
}

//! Generic iterate-until-convergence loop.
//!
//! # Algorithm
//!
//! 1. Initialize the population randomly (or evaluate a seeded one)
//! 2. At each iteration:
//!    a. Scale the penalty coefficient
//!    b. Let the move rule update its parameters and move the individuals
//!    c. Regenerate discarded constraint violators
//!    d. Evaluate, record the best cost
//!    e. Stop early if the best cost stagnated
//! 3. Package an [`OptResult`]
//!
//! Only steps (b) and the post-evaluation hook differ between heuristics.

use super::config::Config;
use super::population::Population;
use super::space::Parameter;
use super::types::{Individual, Objective};
use crate::error::Result;
use std::fmt;
use tracing::{debug, info};

/// The algorithm-specific part of a population heuristic.
///
/// A move rule carries its own state (control parameters, archives) and
/// perturbs the population once per iteration. All randomness must be
/// drawn from [`Population::random`] or [`Population::rng`].
pub trait MoveRule {
    /// Short algorithm name reported in the result.
    fn name(&self) -> &str;

    /// Called once after the population has been initialized and evaluated.
    fn prepare<O: Objective>(&mut self, _population: &Population<O>) {}

    /// Updates control parameters for iteration `iteration` of
    /// `max_iterations`.
    fn update_parameters(
        &mut self,
        _iteration: usize,
        _max_iterations: usize,
        _population_size: usize,
    ) {
    }

    /// Moves the individuals. Implementations are responsible for boundary
    /// repair of the positions they produce.
    fn step<O: Objective>(&mut self, population: &mut Population<O>) -> Result<()>;

    /// Called after each evaluation of the moved population.
    fn after_evaluate<O: Objective>(&mut self, _population: &Population<O>) {}
}

/// Frozen summary of a finished run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptResult {
    pub algorithm_name: String,

    /// Iterations actually executed.
    pub iterations: usize,

    pub population_size: usize,

    pub config: Config,

    /// Best feasible individual found during the run.
    pub best: Individual,

    pub parameters: Vec<Parameter>,

    /// Best cost before the first iteration followed by one entry per
    /// executed iteration.
    pub cost_history: Vec<f64>,

    /// Whether the run stopped early on stagnation.
    pub stagnated: bool,
}

impl fmt::Display for OptResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[ {} ]", self.algorithm_name)?;
        writeln!(f, "  iterations      : {}", self.iterations)?;
        writeln!(f, "  population size : {}", self.population_size)?;
        if self.stagnated {
            writeln!(f, "  stopped early   : best cost stagnated")?;
        }
        writeln!(f, "  best cost       : {}", self.best.cost)?;
        write!(f, "  best position   :")?;
        if self.best.position.is_empty() {
            write!(f, " none (no feasible individual found)")?;
        }
        for (p, x) in self.parameters.iter().zip(&self.best.position) {
            write!(f, "\n    {:<14}: {}", p.name(), x)?;
        }
        Ok(())
    }
}

/// Drives a [`MoveRule`] over a [`Population`] until the iteration budget is
/// spent or the best cost stagnates.
///
/// # Usage
///
/// ```
/// use u_popheur::engine::{Algorithm, Config, Parameter, Population, SearchSpace};
/// use u_popheur::mfo::MothFlame;
///
/// let space = SearchSpace::new(Parameter::list("x", 2, -5.12, 5.12, false)).unwrap();
/// let config = Config::default().with_max_iterations(50).with_seed(101);
/// let sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
/// let population = Population::new(30, sphere, space, config).unwrap();
///
/// let mut algorithm = Algorithm::new(population, MothFlame::new());
/// let result = algorithm.minimize().unwrap();
/// assert_eq!(result.algorithm_name, "MFO");
/// assert!(result.best.cost < 1e-3);
/// ```
pub struct Algorithm<O: Objective, M: MoveRule> {
    population: Population<O>,
    rule: M,
    record_positions: bool,
    cost_history: Vec<f64>,
    position_history: Vec<Vec<Vec<f64>>>,
    result: Option<OptResult>,
}

impl<O: Objective, M: MoveRule> Algorithm<O, M> {
    pub fn new(population: Population<O>, rule: M) -> Self {
        Self {
            population,
            rule,
            record_positions: false,
            cost_history: Vec::new(),
            position_history: Vec::new(),
            result: None,
        }
    }

    /// Records every individual's position after each iteration.
    pub fn with_position_history(mut self, enabled: bool) -> Self {
        self.record_positions = enabled;
        self
    }

    pub fn population(&self) -> &Population<O> {
        &self.population
    }

    /// Mutable access, e.g. to seed positions before [`minimize`](Self::minimize).
    pub fn population_mut(&mut self) -> &mut Population<O> {
        &mut self.population
    }

    pub fn rule(&self) -> &M {
        &self.rule
    }

    pub fn cost_history(&self) -> &[f64] {
        &self.cost_history
    }

    /// Position snapshots, one per recorded iteration (baseline first).
    pub fn position_history(&self) -> &[Vec<Vec<f64>>] {
        &self.position_history
    }

    /// Result of the last completed run.
    pub fn result(&self) -> Option<&OptResult> {
        self.result.as_ref()
    }

    /// Runs the optimization.
    ///
    /// Errors from initialization or from the objective abort the run; the
    /// previous result, if any, is discarded.
    pub fn minimize(&mut self) -> Result<&OptResult> {
        self.result = None;
        self.cost_history.clear();
        self.position_history.clear();

        let config = self.population.config().clone();
        let max_iterations = config.max_iterations;

        if !self.population.is_initialized() {
            if !config.silent {
                info!(algorithm = self.rule.name(), "generating the initial population");
            }
            self.population.initialize_random()?;
        } else {
            self.population.evaluate()?;
        }

        self.rule.prepare(&self.population);
        self.record();

        let mut iterations = 0;
        let mut stagnant = 0usize;
        let mut stagnated = false;

        for iteration in 0..max_iterations {
            self.population.scale_penalty_coefficient();
            self.rule
                .update_parameters(iteration, max_iterations, self.population.size());
            self.rule.step(&mut self.population)?;
            self.population.enforce_constraints()?;
            self.population.evaluate()?;
            self.rule.after_evaluate(&self.population);
            self.record();
            iterations = iteration + 1;

            if config.max_stagnant_iterations > 0 && iteration > 0 {
                if self.is_stagnant(iteration, config.stagnation_relative_tolerance) {
                    stagnant += 1;
                } else {
                    stagnant = 0;
                }
                debug!(iteration, stagnant, best = self.population.best().cost);

                if stagnant > config.max_stagnant_iterations {
                    stagnated = true;
                    break;
                }
            }
        }

        let best = self.population.best().clone();
        if !config.silent {
            info!(
                algorithm = self.rule.name(),
                iterations,
                stagnated,
                best_cost = best.cost,
                "optimization finished"
            );
        }

        Ok(self.result.insert(OptResult {
            algorithm_name: self.rule.name().to_string(),
            iterations,
            population_size: self.population.size(),
            config,
            best,
            parameters: self.population.search_space().parameters().to_vec(),
            cost_history: self.cost_history.clone(),
            stagnated,
        }))
    }

    fn record(&mut self) {
        self.cost_history.push(self.population.best().cost);
        if self.record_positions {
            self.position_history.push(self.population.positions());
        }
    }

    /// Whether history entries `iteration - 1` and `iteration` are both
    /// finite and relatively close.
    ///
    /// The newest entry sits at `iteration + 1`, so the check trails it by one.
    fn is_stagnant(&self, iteration: usize, rel_tol: f64) -> bool {
        let Some(window) = iteration
            .checked_sub(1)
            .and_then(|start| self.cost_history.get(start..=iteration))
        else {
            return false;
        };
        let (previous, current) = (window[0], window[1]);
        previous.is_finite()
            && current.is_finite()
            && (previous - current).abs() <= rel_tol * previous.abs().max(current.abs())
    }
}

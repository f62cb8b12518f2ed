//! Moth-flame move rule.

use crate::engine::{Individual, MoveRule, Objective, Population};
use crate::error::Result;
use std::f64::consts::PI;

/// Moth-Flame Optimization as a [`MoveRule`].
///
/// Each moth flies a logarithmic spiral around a flame. Flames are the best
/// positions seen so far, kept in an archive sorted by cost.
///
/// # Examples
///
/// ```
/// use u_popheur::mfo::MothFlame;
///
/// let rule = MothFlame::new().with_spiral_shape(0.8);
/// assert_eq!(rule.spiral_shape(), 0.8);
/// assert!(rule.flames().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct MothFlame {
    a: f64,
    b: f64,
    n_flame: usize,
    flames: Vec<Individual>,
}

impl Default for MothFlame {
    fn default() -> Self {
        Self {
            a: -1.0,
            b: 1.0,
            n_flame: 0,
            flames: Vec::new(),
        }
    }
}

impl MothFlame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the spiral shape constant `b`.
    pub fn with_spiral_shape(mut self, b: f64) -> Self {
        self.b = b;
        self
    }

    pub fn spiral_shape(&self) -> f64 {
        self.b
    }

    /// Current lower bound of the spiral parameter, decays from -1 to -2.
    pub fn convergence_constant(&self) -> f64 {
        self.a
    }

    /// Number of flames currently guiding the swarm.
    pub fn flame_count(&self) -> usize {
        self.n_flame
    }

    /// Flame archive, best first.
    pub fn flames(&self) -> &[Individual] {
        &self.flames
    }

    /// Merges `moths` into the archive, keeping the `capacity` cheapest.
    fn merge(&mut self, moths: &[Individual], capacity: usize) {
        self.flames.extend_from_slice(moths);
        sort_by_cost(&mut self.flames);
        self.flames.truncate(capacity);
    }
}

fn sort_by_cost(individuals: &mut [Individual]) {
    individuals.sort_by(|a, b| a.cost.total_cmp(&b.cost));
}

impl MoveRule for MothFlame {
    fn name(&self) -> &str {
        "MFO"
    }

    fn prepare<O: Objective>(&mut self, population: &Population<O>) {
        self.flames = population.individuals().to_vec();
        sort_by_cost(&mut self.flames);
        self.n_flame = population.size();
    }

    fn update_parameters(
        &mut self,
        iteration: usize,
        max_iterations: usize,
        population_size: usize,
    ) {
        let t = iteration as f64;
        let max = max_iterations as f64;
        let n = population_size as f64;
        self.a = -1.0 - t / max;
        self.n_flame = (n - t * (n - 1.0) / max).round() as usize;
    }

    fn step<O: Objective>(&mut self, population: &mut Population<O>) -> Result<()> {
        let size = population.size();
        let dim = population.dimension();
        if self.flames.len() != size {
            self.prepare(population);
        }

        for i in 0..size {
            // moths beyond the surviving flames all circle the last one
            let k = if i <= self.n_flame { i } else { self.n_flame };
            for j in 0..dim {
                let moth = population.individuals()[i][j];
                let distance = (self.flames[i][j] - moth).abs();
                let r = (self.a - 1.0) * population.random() + 1.0;
                let spiral = distance * (self.b * r).exp() * (2.0 * PI * r).cos();
                population.individuals_mut()[i][j] = spiral + self.flames[k][j];
            }
        }

        population.enforce_boundaries();
        Ok(())
    }

    fn after_evaluate<O: Objective>(&mut self, population: &Population<O>) {
        self.merge(population.individuals(), population.size());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Config, OutOfBoundsPolicy, Parameter, SearchSpace};

    fn sphere(x: &[f64]) -> f64 {
        x.iter().map(|v| v * v).sum()
    }

    fn population(size: usize, config: Config) -> Population<fn(&[f64]) -> f64> {
        let space = SearchSpace::new(Parameter::list("x", 2, -5.12, 5.12, false)).unwrap();
        Population::new(size, sphere as fn(&[f64]) -> f64, space, config).unwrap()
    }

    #[test]
    fn test_parameter_schedule() {
        let mut rule = MothFlame::new();
        rule.update_parameters(0, 100, 30);
        assert_eq!(rule.convergence_constant(), -1.0);
        assert_eq!(rule.flame_count(), 30);

        rule.update_parameters(50, 100, 30);
        assert!((rule.convergence_constant() + 1.5).abs() < 1e-12);
        assert_eq!(rule.flame_count(), 16);

        rule.update_parameters(100, 100, 30);
        assert!((rule.convergence_constant() + 2.0).abs() < 1e-12);
        assert_eq!(rule.flame_count(), 1);
    }

    #[test]
    fn test_flame_count_non_increasing() {
        let mut rule = MothFlame::new();
        let mut previous = usize::MAX;
        for t in 0..200 {
            rule.update_parameters(t, 200, 50);
            assert!(rule.flame_count() <= previous);
            assert!(rule.flame_count() >= 1);
            previous = rule.flame_count();
        }
    }

    #[test]
    fn test_prepare_sorts_archive() {
        let mut pop = population(20, Config::default().with_seed(7));
        pop.initialize_random().unwrap();
        let mut rule = MothFlame::new();
        rule.prepare(&pop);
        assert_eq!(rule.flames().len(), 20);
        assert!(rule.flames().windows(2).all(|w| w[0].cost <= w[1].cost));
        assert_eq!(rule.flames()[0].cost, pop.best().cost);
    }

    #[test]
    fn test_archive_worst_never_regresses() {
        let mut pop = population(20, Config::default().with_seed(13));
        pop.initialize_random().unwrap();
        let mut rule = MothFlame::new();
        rule.prepare(&pop);

        for t in 0..30 {
            let worst_before = rule.flames().last().unwrap().cost;
            rule.update_parameters(t, 30, pop.size());
            rule.step(&mut pop).unwrap();
            pop.evaluate().unwrap();
            rule.after_evaluate(&pop);

            let worst_after = rule.flames().last().unwrap().cost;
            assert!(worst_after <= worst_before);
            assert_eq!(rule.flames().len(), 20);
        }
    }

    #[test]
    fn test_step_keeps_moths_in_bounds() {
        for policy in [
            OutOfBoundsPolicy::PeriodicWrap,
            OutOfBoundsPolicy::Reflect,
            OutOfBoundsPolicy::ClampAtBoundary,
        ] {
            let config = Config::default()
                .with_out_of_bounds_policy(policy)
                .with_seed(21);
            let mut pop = population(15, config);
            pop.initialize_random().unwrap();
            let mut rule = MothFlame::new().with_spiral_shape(3.0);
            rule.prepare(&pop);
            for t in 0..10 {
                rule.update_parameters(t, 10, pop.size());
                rule.step(&mut pop).unwrap();
                for ind in pop.individuals() {
                    assert!(pop.search_space().contains(&ind.position), "{policy:?}");
                }
                pop.evaluate().unwrap();
                rule.after_evaluate(&pop);
            }
        }
    }

    #[test]
    fn test_single_moth() {
        let mut pop = population(1, Config::default().with_seed(2));
        pop.initialize_random().unwrap();
        let mut rule = MothFlame::new();
        rule.prepare(&pop);
        rule.update_parameters(0, 10, 1);
        assert_eq!(rule.flame_count(), 1);
        rule.step(&mut pop).unwrap();
    }
}

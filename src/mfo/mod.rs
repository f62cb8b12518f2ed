//! Moth-Flame Optimization (MFO).
//!
//! A swarm heuristic in which every moth moves along a logarithmic spiral
//! around a flame, an elite position kept in a cost-sorted archive. The
//! number of flames shrinks linearly from the population size to one, so
//! the search moves from exploration to exploitation over the run.
//!
//! [`MothFlame`] plugs into the generic [`Algorithm`](crate::engine::Algorithm)
//! loop; [`mfo`] is a shorthand for building that pairing.
//!
//! # References
//!
//! - Mirjalili (2015), "Moth-flame optimization algorithm: A novel
//!   nature-inspired heuristic paradigm", *Knowledge-Based Systems* 89, 228-249

mod rule;

pub use rule::MothFlame;

use crate::engine::{Algorithm, Objective, Population};

/// Wraps `population` in an MFO algorithm with default spiral shape.
pub fn mfo<O: Objective>(population: Population<O>) -> Algorithm<O, MothFlame> {
    Algorithm::new(population, MothFlame::new())
}

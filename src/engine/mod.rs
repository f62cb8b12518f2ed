//! Shared optimization engine.
//!
//! Every population heuristic in this crate is a [`MoveRule`] driven by the
//! same [`Algorithm`] loop over the same [`Population`].
//!
//! # Key Types
//!
//! - [`Parameter`], [`SearchSpace`]: bounded, optionally integer dimensions
//! - [`Config`]: iteration budget, stagnation, boundary and constraint policies
//! - [`Objective`]: the function to minimize and its constraint violation
//! - [`Population`]: evaluation, best tracking, penalties, boundary repair
//! - [`Algorithm`], [`OptResult`]: the generic loop and its frozen result

mod config;
mod population;
mod runner;
mod space;
mod types;

pub use config::{Config, ConstraintPolicy, DiscardScope, OutOfBoundsPolicy};
pub use population::{BoundaryOutcome, Population};
pub use runner::{Algorithm, MoveRule, OptResult};
pub use space::{Parameter, SearchSpace};
pub use types::{Constrained, Individual, Objective};

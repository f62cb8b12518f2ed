//! Population-based metaheuristics for bounded, mixed integer/continuous
//! black-box minimization.
//!
//! Provides a shared engine and the heuristics built on it:
//!
//! - **Engine**: search space, configuration, population with constraint
//!   handling (penalty, barrier, discard) and boundary repair (periodic,
//!   reflective, clamping, discard), and the generic
//!   iterate-until-convergence loop producing an [`OptResult`](engine::OptResult).
//! - **Moth-Flame Optimization (MFO)**: moths spiral around an elite flame
//!   archive whose size shrinks over the run.
//! - **Test functions**: sphere, Rastrigin, Ackley, Rosenbrock,
//!   Miele-Cantrell.
//!
//! # Architecture
//!
//! Each heuristic is a [`MoveRule`](engine::MoveRule): it updates its
//! control parameters once per iteration and moves the population. The
//! [`Algorithm`](engine::Algorithm) loop owns everything else: initialization,
//! penalty scaling, evaluation, best tracking, cost history, and
//! stagnation detection. All randomness flows through one seeded generator
//! owned by the population, so a fixed seed reproduces a run exactly.
//!
//! # Example
//!
//! ```
//! use u_popheur::engine::{Config, Parameter, Population, SearchSpace};
//! use u_popheur::functions::sphere;
//! use u_popheur::mfo::mfo;
//!
//! let space = SearchSpace::new(Parameter::list("x", 2, -5.12, 5.12, false)).unwrap();
//! let config = Config::default().with_max_iterations(100).with_seed(101);
//! let population = Population::new(50, sphere, space, config).unwrap();
//!
//! let mut algorithm = mfo(population);
//! let result = algorithm.minimize().unwrap();
//! assert!(result.best.cost < 1e-6);
//! ```
//!
//! # Feature Flags
//!
//! | Flag | What it enables |
//! |------|-----------------|
//! | `serde` | `Serialize`/`Deserialize` on configuration and result types |
//! | `parallel` | rayon-parallel cost evaluation when `Config::parallel` is set |

pub mod engine;
pub mod error;
pub mod functions;
pub mod mfo;

pub use error::{Error, Result};

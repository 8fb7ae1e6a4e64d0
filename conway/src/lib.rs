//! # conway
//!
//! Conway's Game of Life on a toroidal grid, with interchangeable execution
//! strategies for computing each generation.
//!
//! Every strategy reads only a frozen snapshot of the current generation and
//! writes into a separate buffer, so they all produce identical grids:
//!
//! - [`Sequential`]: plain loop on the calling thread
//! - [`SharedWorkerPool`]: fixed thread pool writing disjoint row bands
//! - [`IsolatedWorkerPool`]: worker processes exchanging JSON over pipes
//! - [`Cooperative`]: one cooperative tokio task per cell on a single thread
//!
//! ```
//! use conway::prelude::*;
//!
//! let cfg = SimulationConfig::with_size(32, 32)
//!     .with_seed(42)
//!     .with_strategy(StrategyKind::Shared);
//! let mut sim = Simulation::from_config(&cfg).unwrap();
//! sim.run(10).unwrap();
//! assert_eq!(sim.generation(), 11);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod neighbors;
pub mod patterns;
mod prng;
pub mod rules;
pub mod simulation;
pub mod strategy;
pub mod worker;

pub use config::SimulationConfig;
pub use engine::Engine;
pub use error::{LifeError, StrategyError, WorkerError};
pub use grid::{Coord, Grid};
pub use simulation::Simulation;
pub use strategy::{
    Cooperative, ExecutionStrategy, IsolatedWorkerPool, Sequential, SharedWorkerPool, Snapshot,
    StrategyKind,
};

/// Common imports.
pub mod prelude {
    pub use crate::config::SimulationConfig;
    pub use crate::engine::Engine;
    pub use crate::error::LifeError;
    pub use crate::grid::Grid;
    pub use crate::simulation::Simulation;
    pub use crate::strategy::{ExecutionStrategy, StrategyKind};
}

// engine.rs - One generation step over a pluggable execution strategy

use std::sync::Arc;

use crate::error::StrategyError;
use crate::grid::Grid;
use crate::strategy::{ExecutionStrategy, Sequential, Snapshot};

/// Computes successive generations with a chosen [`ExecutionStrategy`].
#[derive(Debug)]
pub struct Engine {
    strategy: Box<dyn ExecutionStrategy>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Sequential)
    }
}

impl Engine {
    pub fn new(strategy: impl ExecutionStrategy + 'static) -> Self {
        Self { strategy: Box::new(strategy) }
    }

    pub fn from_boxed(strategy: Box<dyn ExecutionStrategy>) -> Self {
        Self { strategy }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Next generation of `snapshot`.
    ///
    /// The write buffer starts as a copy of the snapshot and is only returned
    /// when the strategy finished every cell. On error it is dropped, so the
    /// caller's grid stays authoritative.
    pub fn advance(&self, snapshot: &Snapshot) -> Result<Grid, StrategyError> {
        let mut buffer = Grid::clone(snapshot);
        self.strategy.evaluate(snapshot, &mut buffer)?;
        Ok(buffer)
    }

    /// [`advance`](Self::advance) for callers holding a plain grid.
    pub fn advance_grid(&self, grid: &Grid) -> Result<Grid, StrategyError> {
        self.advance(&Arc::new(grid.clone()))
    }
}

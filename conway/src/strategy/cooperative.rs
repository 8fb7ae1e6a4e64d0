use std::sync::Arc;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinSet;

use crate::error::{LifeError, StrategyError};
use crate::grid::{Coord, Grid};
use crate::rules::next_state;

use super::{ExecutionStrategy, Snapshot};

/// One cooperative task per cell on a single-threaded tokio runtime.
///
/// Tasks yield before computing, so the scheduler interleaves them freely;
/// they still only ever run one at a time on the thread that called
/// [`evaluate`](ExecutionStrategy::evaluate). Called from inside another
/// tokio runtime it fails with [`StrategyError::NestedRuntime`].
#[derive(Debug)]
pub struct Cooperative {
    runtime: Runtime,
}

impl Cooperative {
    pub fn new() -> Result<Self, LifeError> {
        let runtime = Builder::new_current_thread()
            .build()
            .map_err(StrategyError::Runtime)?;
        Ok(Self { runtime })
    }
}

/// Cell coroutine: suspend once, then evaluate against the snapshot.
async fn evaluate_cell(snapshot: Snapshot, coord: Coord) -> (Coord, bool) {
    tokio::task::yield_now().await; // Cooperative yielding
    (coord, next_state(&snapshot, coord))
}

/// Joins every cell task and writes the states that changed.
///
/// Completion order is irrelevant: every write targets its own cell.
/// Dropping the set on error aborts whatever is still pending.
async fn drain(
    mut cells: JoinSet<(Coord, bool)>,
    snapshot: &Grid,
    buffer: &mut Grid,
) -> Result<(), StrategyError> {
    while let Some(joined) = cells.join_next().await {
        let (coord, next) = joined?;
        if next != snapshot.at(coord) {
            buffer.put(coord, next);
        }
    }
    Ok(())
}

impl ExecutionStrategy for Cooperative {
    fn name(&self) -> &'static str {
        "cooperative"
    }

    fn evaluate(&self, snapshot: &Snapshot, buffer: &mut Grid) -> Result<(), StrategyError> {
        // block_on panics when the calling thread already drives a runtime.
        if Handle::try_current().is_ok() {
            return Err(StrategyError::NestedRuntime);
        }
        self.runtime.block_on(async {
            let mut cells = JoinSet::new();
            for coord in snapshot.coordinates() {
                cells.spawn(evaluate_cell(Arc::clone(snapshot), coord));
            }
            drain(cells, snapshot, buffer).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Sequential;

    #[test]
    fn matches_sequential_on_random_grid() {
        let grid = Grid::random(20, 15, 3).unwrap();
        let snapshot = Arc::new(grid.clone());

        let mut expected = grid.clone();
        Sequential.evaluate(&snapshot, &mut expected).unwrap();

        let mut buffer = grid.clone();
        Cooperative::new().unwrap().evaluate(&snapshot, &mut buffer).unwrap();
        assert_eq!(buffer, expected);
    }

    #[test]
    fn runtime_is_reusable_across_steps() {
        let strategy = Cooperative::new().unwrap();
        let mut grid = Arc::new(Grid::random(8, 8, 21).unwrap());
        for _ in 0..4 {
            let mut buffer = Grid::clone(&grid);
            strategy.evaluate(&grid, &mut buffer).unwrap();
            grid = Arc::new(buffer);
        }
    }

    #[test]
    fn refuses_to_run_inside_another_runtime() {
        let strategy = Cooperative::new().unwrap();
        let grid = Grid::random(6, 6, 9).unwrap();
        let snapshot = Arc::new(grid.clone());
        let mut buffer = grid.clone();

        let outer = Builder::new_current_thread().build().unwrap();
        let result = outer.block_on(async { strategy.evaluate(&snapshot, &mut buffer) });
        assert!(matches!(result, Err(StrategyError::NestedRuntime)));
        assert_eq!(buffer, grid);
    }

    fn exploding_cell() -> (Coord, bool) {
        panic!("cell task blew up")
    }

    #[test]
    fn panicking_cell_task_is_a_task_failure() {
        let strategy = Cooperative::new().unwrap();
        let grid = Grid::random(4, 4, 2).unwrap();
        let mut buffer = grid.clone();

        let result = strategy.runtime.block_on(async {
            let mut cells = JoinSet::new();
            cells.spawn(async { ((0, 0), true) });
            cells.spawn(async { exploding_cell() });
            drain(cells, &grid, &mut buffer).await
        });
        assert!(matches!(result, Err(StrategyError::TaskFailed(_))));
    }
}

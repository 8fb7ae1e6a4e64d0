use crate::error::StrategyError;
use crate::grid::Grid;
use crate::rules::next_state;

use super::{ExecutionStrategy, Snapshot};

/// Evaluates cells one after another on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sequential;

impl ExecutionStrategy for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn evaluate(&self, snapshot: &Snapshot, buffer: &mut Grid) -> Result<(), StrategyError> {
        for coord in snapshot.coordinates() {
            let next = next_state(snapshot, coord);
            if next != snapshot.at(coord) {
                buffer.put(coord, next);
            }
        }
        Ok(())
    }
}

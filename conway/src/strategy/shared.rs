use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{LifeError, StrategyError};
use crate::grid::Grid;
use crate::rules::next_state;

use super::{ExecutionStrategy, Snapshot};

/// Fixed-size pool of threads sharing the snapshot and the write buffer.
///
/// The buffer is cut into at most `workers` contiguous row bands and each band
/// is handed to exactly one pool thread, so writes are disjoint and need no
/// lock. The pool is built once and reused for every step.
#[derive(Debug)]
pub struct SharedWorkerPool {
    workers: usize,
    pool: ThreadPool,
}

impl SharedWorkerPool {
    pub fn new(workers: usize) -> Result<Self, LifeError> {
        if workers == 0 {
            return Err(LifeError::InvalidConfig(
                "shared worker pool needs at least one worker".into(),
            ));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("life-worker-{i}"))
            .build()
            .map_err(StrategyError::from)?;
        Ok(Self { workers, pool })
    }
}

impl ExecutionStrategy for SharedWorkerPool {
    fn name(&self) -> &'static str {
        "shared"
    }

    fn evaluate(&self, snapshot: &Snapshot, buffer: &mut Grid) -> Result<(), StrategyError> {
        let width = snapshot.width();
        let rows_per_band = snapshot.height().div_ceil(self.workers);
        let band_len = rows_per_band * width;
        let snapshot: &Grid = snapshot;

        // rayon re-raises a worker panic on this thread; turn it into a step failure.
        panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.install(|| {
                buffer
                    .cells_mut()
                    .par_chunks_mut(band_len)
                    .enumerate()
                    .for_each(|(band, cells)| {
                        let first = band * band_len;
                        for (offset, cell) in cells.iter_mut().enumerate() {
                            let idx = first + offset;
                            *cell = next_state(snapshot, (idx % width, idx / width));
                        }
                    });
            })
        }))
        .map_err(|_| StrategyError::WorkerPanicked)
    }
}

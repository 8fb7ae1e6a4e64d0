use std::borrow::Cow;
use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use tracing::{debug, warn};

use crate::error::{LifeError, StrategyError};
use crate::grid::{Coord, Grid};
use crate::worker::{WorkerRequest, WorkerResponse};

use super::{ExecutionStrategy, Snapshot};

/// File name of the worker executable shipped with this crate.
pub const WORKER_BIN: &str = "conway-worker";

/// Pool of worker processes that share nothing with the coordinator.
///
/// Each step spawns `workers` processes, partitions the coordinates into
/// disjoint chunks, and sends every worker the snapshot plus its chunk over
/// stdin. Results come back by value on stdout. Nothing is written to the
/// buffer until every worker has answered for exactly the cells it was given;
/// any failure along the way fails the whole step.
#[derive(Debug, Clone)]
pub struct IsolatedWorkerPool {
    workers: usize,
    program: PathBuf,
    args: Vec<OsString>,
}

impl IsolatedWorkerPool {
    pub fn new(program: impl Into<PathBuf>, workers: usize) -> Result<Self, LifeError> {
        if workers == 0 {
            return Err(LifeError::InvalidConfig(
                "isolated worker pool needs at least one worker".into(),
            ));
        }
        Ok(Self {
            workers,
            program: program.into(),
            args: Vec::new(),
        })
    }

    /// Extra arguments passed to every worker process.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// `conway-worker` next to the running executable, if it can be located.
    pub fn sibling_program() -> Option<PathBuf> {
        let exe = env::current_exe().ok()?;
        let dir = exe.parent()?;
        Some(dir.join(format!("{WORKER_BIN}{}", env::consts::EXE_SUFFIX)))
    }

    /// Spawns one worker and hands it its request; stdin is closed afterwards.
    fn dispatch(
        &self,
        worker: usize,
        snapshot: &Grid,
        cells: &[Coord],
    ) -> Result<Child, StrategyError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| StrategyError::Spawn { worker, source })?;

        let request = WorkerRequest::Evaluate {
            snapshot: Cow::Borrowed(snapshot),
            coordinates: Cow::Borrowed(cells),
        };
        let sent = match child.stdin.take() {
            Some(mut stdin) => serde_json::to_vec(&request)
                .map_err(StrategyError::from)
                .and_then(|mut line| {
                    line.push(b'\n');
                    stdin
                        .write_all(&line)
                        .map_err(|source| StrategyError::Io { worker, source })
                }),
            None => Err(StrategyError::Io {
                worker,
                source: io::Error::other("worker stdin was not captured"),
            }),
        };

        match sent {
            Ok(()) => Ok(child),
            Err(err) => {
                reap(worker, child);
                Err(err)
            }
        }
    }

    /// Waits for one worker and checks it answered for exactly `cells`.
    fn collect(
        &self,
        worker: usize,
        child: Child,
        cells: &[Coord],
    ) -> Result<Vec<(Coord, bool)>, StrategyError> {
        let output = child
            .wait_with_output()
            .map_err(|source| StrategyError::Io { worker, source })?;
        if !output.status.success() {
            return Err(StrategyError::WorkerExited { worker, status: output.status });
        }

        let line = output.stdout.split(|&b| b == b'\n').next().unwrap_or_default();
        let outcomes = match serde_json::from_slice::<WorkerResponse>(line)? {
            WorkerResponse::Evaluated { outcomes } => outcomes,
            WorkerResponse::Error { message } => {
                return Err(StrategyError::WorkerReported { worker, message });
            }
        };
        if outcomes.len() != cells.len() {
            return Err(StrategyError::IncompleteResponse {
                worker,
                expected: cells.len(),
                got: outcomes.len(),
            });
        }

        outcomes
            .into_iter()
            .zip(cells)
            .map(|((x, y, alive), &assigned)| {
                if (x, y) == assigned {
                    Ok((assigned, alive))
                } else {
                    Err(StrategyError::UnexpectedCell { worker, x, y })
                }
            })
            .collect()
    }
}

/// Kills and waits for a worker whose step is being abandoned.
fn reap(worker: usize, mut child: Child) {
    // kill() fails for a child that already exited; wait() still reaps it.
    let _ = child.kill();
    if let Err(e) = child.wait() {
        debug!(worker, error = %e, "could not reap worker");
    }
}

impl ExecutionStrategy for IsolatedWorkerPool {
    fn name(&self) -> &'static str {
        "isolated"
    }

    fn evaluate(&self, snapshot: &Snapshot, buffer: &mut Grid) -> Result<(), StrategyError> {
        let coords: Vec<Coord> = snapshot.coordinates().collect();
        let chunk_len = coords.len().div_ceil(self.workers);
        let assignments: Vec<&[Coord]> = coords.chunks(chunk_len).collect();

        let mut running = Vec::with_capacity(assignments.len());
        for (worker, cells) in assignments.iter().enumerate() {
            match self.dispatch(worker, snapshot, cells) {
                Ok(child) => running.push(child),
                Err(err) => {
                    warn!(worker, error = %err, "worker dispatch failed, abandoning step");
                    for (worker, child) in running.into_iter().enumerate() {
                        reap(worker, child);
                    }
                    return Err(err);
                }
            }
        }
        debug!(workers = running.len(), cells = coords.len(), "isolated workers dispatched");

        // Stage everything first; the coordinator is the only writer and only
        // writes once all workers have succeeded.
        let mut staged = Vec::with_capacity(coords.len());
        let mut failure = None;
        for (worker, (child, cells)) in running.into_iter().zip(&assignments).enumerate() {
            if failure.is_some() {
                reap(worker, child);
                continue;
            }
            match self.collect(worker, child, cells) {
                Ok(outcomes) => staged.extend(outcomes),
                Err(err) => {
                    warn!(worker, error = %err, "worker failed, abandoning step");
                    failure = Some(err);
                }
            }
        }
        if let Some(err) = failure {
            return Err(err);
        }

        for (coord, next) in staged {
            if next != snapshot.at(coord) {
                buffer.put(coord, next);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn zero_workers_is_a_config_error() {
        assert!(matches!(
            IsolatedWorkerPool::new(WORKER_BIN, 0),
            Err(LifeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn missing_program_fails_without_touching_buffer() {
        let grid = Grid::random(10, 10, 4).unwrap();
        let snapshot = Arc::new(grid.clone());
        let mut buffer = grid.clone();

        let pool = IsolatedWorkerPool::new("/nonexistent/conway-worker", 3).unwrap();
        let err = pool.evaluate(&snapshot, &mut buffer).unwrap_err();
        assert!(matches!(err, StrategyError::Spawn { worker: 0, .. }));
        assert_eq!(buffer, grid);
    }

    #[test]
    fn sibling_program_uses_worker_name() {
        let path = IsolatedWorkerPool::sibling_program().unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(WORKER_BIN));
    }
}

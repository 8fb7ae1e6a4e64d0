// error.rs - Error types for the simulation and its execution strategies

use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors surfaced to callers of the grid, engine and simulation driver.
#[derive(Debug, Error)]
pub enum LifeError {
    /// Construction or configuration parameters were rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A strategy could not set up its workers (thread pool, runtime).
    #[error(transparent)]
    Strategy(#[from] StrategyError),
    /// A generation step failed as a whole; the previous grid is still current.
    #[error("step to generation {generation} failed: {source}")]
    StepFailed {
        generation: u64,
        #[source]
        source: StrategyError,
    },
}

/// Infrastructure failures inside an execution strategy.
///
/// Per-cell evaluation itself never fails, so every variant here describes the
/// machinery around it: thread pools, runtimes, worker processes and their
/// wire format.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("failed to build worker thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("a pool worker panicked while evaluating cells")]
    WorkerPanicked,
    #[error("failed to build cooperative runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("cooperative strategy cannot run inside another tokio runtime")]
    NestedRuntime,
    #[error("cooperative cell task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
    #[error("failed to spawn worker process {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: io::Error,
    },
    #[error("i/o with worker process {worker} failed: {source}")]
    Io {
        worker: usize,
        #[source]
        source: io::Error,
    },
    #[error("worker message encoding failed: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("worker process {worker} exited with {status}")]
    WorkerExited { worker: usize, status: ExitStatus },
    #[error("worker process {worker} reported: {message}")]
    WorkerReported { worker: usize, message: String },
    #[error("worker process {worker} returned {got} outcomes, expected {expected}")]
    IncompleteResponse {
        worker: usize,
        expected: usize,
        got: usize,
    },
    #[error("worker process {worker} returned unassigned cell ({x}, {y})")]
    UnexpectedCell { worker: usize, x: usize, y: usize },
}

/// Errors raised by the worker-process side of the isolated pool.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("worker i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("worker could not encode response: {0}")]
    Codec(#[from] serde_json::Error),
}

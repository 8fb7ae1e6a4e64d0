//! Execution strategies: how the per-cell work of one generation is fanned out.
//!
//! Every strategy receives the same two things, a read-only [`Snapshot`] of
//! the current generation and a write buffer that starts as a copy of it, and
//! must leave the buffer holding [`next_state`](crate::rules::next_state) for
//! every cell. Cells are only ever read from the snapshot, so the order in
//! which a strategy visits them cannot change the result.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{LifeError, StrategyError};
use crate::grid::Grid;

mod cooperative;
mod isolated;
mod sequential;
mod shared;

pub use cooperative::Cooperative;
pub use isolated::{IsolatedWorkerPool, WORKER_BIN};
pub use sequential::Sequential;
pub use shared::SharedWorkerPool;

/// Read-only grid shared with every worker for the duration of one step.
pub type Snapshot = Arc<Grid>;

/// Default worker count for the pooled strategies.
pub const DEFAULT_WORKERS: usize = 5;

/// A way of evaluating every cell of a generation.
pub trait ExecutionStrategy: fmt::Debug + Send + Sync {
    /// Short stable name used in logs.
    fn name(&self) -> &'static str;

    /// Fills `buffer` with the next state of every cell in `snapshot`.
    ///
    /// `buffer` arrives as an exact copy of `snapshot`; writing only the cells
    /// that change is enough. On error the caller discards `buffer`.
    fn evaluate(&self, snapshot: &Snapshot, buffer: &mut Grid) -> Result<(), StrategyError>;
}

/// Serializable strategy selector used by configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Row-major loop on the calling thread.
    #[default]
    Sequential,
    /// Fixed-size thread pool writing disjoint row bands of a shared buffer.
    Shared,
    /// Fixed number of worker processes exchanging JSON over pipes.
    Isolated,
    /// One cooperative task per cell on a single-threaded runtime.
    Cooperative,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Sequential,
        StrategyKind::Shared,
        StrategyKind::Isolated,
        StrategyKind::Cooperative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Sequential => "sequential",
            StrategyKind::Shared => "shared",
            StrategyKind::Isolated => "isolated",
            StrategyKind::Cooperative => "cooperative",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "seq" => Ok(StrategyKind::Sequential),
            "shared" | "threads" | "thread-pool" => Ok(StrategyKind::Shared),
            "isolated" | "process" | "processes" => Ok(StrategyKind::Isolated),
            "cooperative" | "async" | "coro" => Ok(StrategyKind::Cooperative),
            other => Err(LifeError::InvalidConfig(format!(
                "unknown strategy '{other}' (expected sequential|shared|isolated|cooperative)"
            ))),
        }
    }
}

// config.rs - Simulation configuration

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::LifeError;
use crate::grid::{DEFAULT_SIZE, Grid};
use crate::strategy::{
    Cooperative, DEFAULT_WORKERS, ExecutionStrategy, IsolatedWorkerPool, Sequential,
    SharedWorkerPool, StrategyKind, WORKER_BIN,
};

/// Environment variable that overrides the configured strategy.
pub const STRATEGY_ENV: &str = "CONWAY_STRATEGY";

/// Everything needed to set up a [`Simulation`](crate::Simulation).
///
/// Every field has a default, so a JSON config file only needs the keys it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub width: usize,
    pub height: usize,
    /// Generation limit; a run performs `generations + 1` steps.
    pub generations: u64,
    pub strategy: StrategyKind,
    /// Thread or process count for the pooled strategies.
    pub workers: usize,
    /// Seed for the random starting grid; `None` picks one from the clock.
    pub seed: Option<u64>,
    /// Stop early once a grid repeats one of the last few generations.
    pub stop_on_cycle: bool,
    /// Worker executable for the isolated strategy; defaults to
    /// `conway-worker` beside the running binary.
    pub worker_program: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            generations: 50,
            strategy: StrategyKind::Sequential,
            workers: DEFAULT_WORKERS,
            seed: None,
            stop_on_cycle: false,
            worker_program: None,
        }
    }
}

impl SimulationConfig {
    pub fn with_size(width: usize, height: usize) -> Self {
        Self { width, height, ..Self::default() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_worker_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.worker_program = Some(program.into());
        self
    }

    /// Reads a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self, LifeError> {
        let text = fs::read_to_string(path).map_err(|e| {
            LifeError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            LifeError::InvalidConfig(format!("cannot parse {}: {e}", path.display()))
        })
    }

    /// Applies `CONWAY_STRATEGY` if it is set.
    pub fn apply_env(self) -> Self {
        let raw = std::env::var(STRATEGY_ENV).ok();
        self.apply_strategy_override(raw.as_deref())
    }

    /// Replaces the strategy with `raw` when it names one; unknown names are
    /// logged and ignored.
    pub fn apply_strategy_override(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = raw {
            match raw.parse() {
                Ok(kind) => self.strategy = kind,
                Err(_) => warn!("Unknown {} value: {}", STRATEGY_ENV, raw),
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), LifeError> {
        if self.width == 0 || self.height == 0 {
            return Err(LifeError::InvalidConfig(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.workers == 0 {
            return Err(LifeError::InvalidConfig("workers must be at least 1".into()));
        }
        Ok(())
    }

    /// Seed to use for the starting grid.
    pub fn resolved_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        })
    }

    pub fn random_grid(&self) -> Result<Grid, LifeError> {
        Grid::random(self.width, self.height, self.resolved_seed())
    }

    /// Builds the configured strategy.
    pub fn build_strategy(&self) -> Result<Box<dyn ExecutionStrategy>, LifeError> {
        self.validate()?;
        Ok(match self.strategy {
            StrategyKind::Sequential => Box::new(Sequential),
            StrategyKind::Shared => Box::new(SharedWorkerPool::new(self.workers)?),
            StrategyKind::Isolated => {
                let program = self
                    .worker_program
                    .clone()
                    .or_else(IsolatedWorkerPool::sibling_program)
                    .unwrap_or_else(|| PathBuf::from(WORKER_BIN));
                Box::new(IsolatedWorkerPool::new(program, self.workers)?)
            }
            StrategyKind::Cooperative => Box::new(Cooperative::new()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_settings() {
        let cfg = SimulationConfig::default();
        assert_eq!((cfg.width, cfg.height, cfg.generations), (50, 50, 50));
        assert_eq!(cfg.workers, 5);
        assert_eq!(cfg.strategy, StrategyKind::Sequential);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: SimulationConfig =
            serde_json::from_str(r#"{"width": 20, "strategy": "shared", "seed": 9}"#).unwrap();
        assert_eq!(cfg.width, 20);
        assert_eq!(cfg.height, 50);
        assert_eq!(cfg.strategy, StrategyKind::Shared);
        assert_eq!(cfg.seed, Some(9));
    }

    #[test]
    fn validation_rejects_zero_sizes_and_workers() {
        assert!(SimulationConfig::with_size(0, 10).validate().is_err());
        assert!(SimulationConfig::with_size(10, 0).validate().is_err());
        assert!(SimulationConfig::default().with_workers(0).validate().is_err());
        assert!(SimulationConfig::with_size(0, 10).build_strategy().is_err());
    }

    #[test]
    fn strategy_override() {
        let cfg = SimulationConfig::default().apply_strategy_override(Some("cooperative"));
        assert_eq!(cfg.strategy, StrategyKind::Cooperative);
        let cfg = cfg.apply_strategy_override(Some("quantum"));
        assert_eq!(cfg.strategy, StrategyKind::Cooperative);
        let cfg = cfg.apply_strategy_override(None);
        assert_eq!(cfg.strategy, StrategyKind::Cooperative);
    }

    #[test]
    fn builds_each_strategy() {
        for kind in StrategyKind::ALL {
            let strategy = SimulationConfig::default()
                .with_strategy(kind)
                .build_strategy()
                .unwrap();
            assert_eq!(strategy.name(), kind.as_str());
        }
    }

    #[test]
    fn explicit_seed_is_reproducible() {
        let cfg = SimulationConfig::with_size(12, 9).with_seed(3);
        assert_eq!(cfg.random_grid().unwrap(), cfg.random_grid().unwrap());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = SimulationConfig::from_json_file(Path::new("/nonexistent/conway.json"));
        assert!(matches!(err, Err(LifeError::InvalidConfig(_))));
    }
}

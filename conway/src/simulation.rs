// simulation.rs - Drives the engine across generations

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::SimulationConfig;
use crate::engine::Engine;
use crate::error::LifeError;
use crate::grid::Grid;
use crate::strategy::Snapshot;

/// Number of recent grid hashes remembered for cycle detection.
const HISTORY_LEN: usize = 10;

/// One running simulation: the current grid, its generation counter and the
/// engine that advances it.
#[derive(Debug)]
pub struct Simulation {
    grid: Snapshot,
    engine: Engine,
    generation: u64,
    stop_on_cycle: bool,
    cycle_detected: bool,
    grid_history: [u64; HISTORY_LEN],
    history_count: usize,
}

impl Simulation {
    pub fn new(grid: Grid, engine: Engine) -> Self {
        let mut sim = Self {
            grid: Arc::new(grid),
            engine,
            generation: 0,
            stop_on_cycle: false,
            cycle_detected: false,
            grid_history: [0; HISTORY_LEN],
            history_count: 0,
        };
        sim.reset_history();
        sim
    }

    /// Random starting grid and strategy, both taken from `config`.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, LifeError> {
        let strategy = config.build_strategy()?;
        let grid = config.random_grid()?;
        Ok(Self::new(grid, Engine::from_boxed(strategy)).with_stop_on_cycle(config.stop_on_cycle))
    }

    /// Explicit starting grid with the strategy from `config`.
    pub fn with_grid(grid: Grid, config: &SimulationConfig) -> Result<Self, LifeError> {
        let strategy = config.build_strategy()?;
        Ok(Self::new(grid, Engine::from_boxed(strategy)).with_stop_on_cycle(config.stop_on_cycle))
    }

    pub fn with_stop_on_cycle(mut self, enabled: bool) -> Self {
        self.stop_on_cycle = enabled;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Completed steps since the starting grid.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn strategy_name(&self) -> &'static str {
        self.engine.strategy_name()
    }

    /// Whether the last step produced a grid seen within the recent history.
    /// Only tracked when cycle detection is enabled.
    pub fn cycle_detected(&self) -> bool {
        self.cycle_detected
    }

    /// Replaces the grid and restarts counting from generation 0.
    pub fn reset(&mut self, grid: Grid) -> Result<(), LifeError> {
        if (grid.width(), grid.height()) != (self.grid.width(), self.grid.height()) {
            return Err(LifeError::InvalidConfig(format!(
                "replacement grid is {}x{}, simulation is {}x{}",
                grid.width(),
                grid.height(),
                self.grid.width(),
                self.grid.height()
            )));
        }
        self.grid = Arc::new(grid);
        self.generation = 0;
        self.reset_history();
        Ok(())
    }

    /// Advances exactly one generation.
    ///
    /// On failure the grid and generation counter are left as they were.
    pub fn step(&mut self) -> Result<&Grid, LifeError> {
        let next = self.engine.advance(&self.grid).map_err(|source| {
            warn!(
                generation = self.generation + 1,
                strategy = self.engine.strategy_name(),
                error = %source,
                "step failed, keeping previous grid"
            );
            LifeError::StepFailed { generation: self.generation + 1, source }
        })?;

        self.grid = Arc::new(next);
        self.generation += 1;
        if self.stop_on_cycle {
            self.cycle_detected = self.check_for_cycle();
        }
        Ok(self.grid.as_ref())
    }

    /// Runs `generations + 1` steps and returns the final grid.
    ///
    /// The extra step is deliberate: the limit is inclusive, matching a
    /// `while generation <= generations` loop. With cycle detection on, the
    /// run ends early after the first repeated grid.
    pub fn run(&mut self, generations: u64) -> Result<&Grid, LifeError> {
        self.run_with(generations, |_, _| {})
    }

    /// [`run`](Self::run), calling `on_frame(generation, grid)` after every step.
    pub fn run_with<F>(&mut self, generations: u64, mut on_frame: F) -> Result<&Grid, LifeError>
    where
        F: FnMut(u64, &Grid),
    {
        let steps = generations.saturating_add(1);
        info!(
            strategy = self.engine.strategy_name(),
            width = self.grid.width(),
            height = self.grid.height(),
            steps,
            "running simulation"
        );

        for _ in 0..steps {
            let started = Instant::now();
            self.step()?;
            info!(
                generation = self.generation,
                strategy = self.engine.strategy_name(),
                population = self.grid.population(),
                elapsed_us = started.elapsed().as_micros() as u64,
                "generation step took"
            );
            on_frame(self.generation, self.grid.as_ref());

            if self.cycle_detected {
                info!(generation = self.generation, "cycle detected, stopping early");
                break;
            }
        }

        info!(
            generation = self.generation,
            population = self.grid.population(),
            "simulation finished"
        );
        Ok(self.grid.as_ref())
    }

    fn reset_history(&mut self) {
        self.grid_history = [0; HISTORY_LEN];
        self.history_count = 0;
        self.cycle_detected = false;
        let current = self.grid.checksum();
        self.remember(current);
    }

    fn remember(&mut self, hash: u64) {
        self.grid_history[self.history_count % HISTORY_LEN] = hash; // Circular buffer
        self.history_count += 1;
    }

    fn check_for_cycle(&mut self) -> bool {
        let current = self.grid.checksum();
        let filled = self.history_count.min(HISTORY_LEN);
        if self.grid_history[..filled].contains(&current) {
            return true;
        }
        self.remember(current);
        false
    }
}

//! Every strategy must produce the same grids from the same start.

use std::sync::Arc;

use conway::patterns;
use conway::prelude::*;
use conway::{
    Cooperative, IsolatedWorkerPool, LifeError, Sequential, SharedWorkerPool, StrategyError,
};

const WORKER: &str = env!("CARGO_BIN_EXE_conway-worker");

// Keep sizes small so the process pool stays quick.
const SIZE: usize = 20;
const GENERATIONS: u64 = 20;

fn engines() -> Vec<Engine> {
    vec![
        Engine::new(Sequential),
        Engine::new(SharedWorkerPool::new(5).unwrap()),
        Engine::new(IsolatedWorkerPool::new(WORKER, 5).unwrap()),
        Engine::new(Cooperative::new().unwrap()),
    ]
}

fn run_to_end(start: &Grid, engine: Engine) -> (String, Grid) {
    let name = engine.strategy_name().to_string();
    let mut sim = Simulation::new(start.clone(), engine);
    let end = sim.run(GENERATIONS).unwrap().clone();
    assert_eq!(sim.generation(), GENERATIONS + 1);
    (name, end)
}

#[test]
fn all_strategies_reach_the_same_final_grid() {
    for seed in 0..4 {
        let start = Grid::random(SIZE, SIZE, seed).unwrap();
        let (_, expected) = run_to_end(&start, Engine::new(Sequential));
        for engine in engines() {
            let (name, end) = run_to_end(&start, engine);
            assert_eq!(end, expected, "strategy {name} diverged for seed {seed}");
        }
    }
}

#[test]
fn all_strategies_agree_frame_by_frame() {
    let start = Grid::random(13, 9, 1234).unwrap();
    let frames: Vec<Vec<u64>> = engines()
        .into_iter()
        .map(|engine| {
            let mut sums = Vec::new();
            let mut sim = Simulation::new(start.clone(), engine);
            sim.run_with(8, |_, grid| sums.push(grid.checksum())).unwrap();
            sums
        })
        .collect();
    for other in &frames[1..] {
        assert_eq!(other, &frames[0]);
    }
}

#[test]
fn isolated_pool_handles_more_workers_than_cells() {
    let start = Grid::random(3, 2, 5).unwrap();
    let snapshot = Arc::new(start.clone());
    let expected = Engine::new(Sequential).advance(&snapshot).unwrap();
    let pool = Engine::new(IsolatedWorkerPool::new(WORKER, 16).unwrap());
    assert_eq!(pool.advance(&snapshot).unwrap(), expected);
}

#[test]
fn glider_crosses_the_seam_under_every_strategy() {
    let glider = patterns::find("Glider").unwrap();
    let mut start = Grid::new(8, 8).unwrap();
    glider.stamp(&mut start, 6, 6);
    let mut expected = Grid::new(8, 8).unwrap();
    glider.stamp(&mut expected, 7, 7);

    for engine in engines() {
        let name = engine.strategy_name();
        let mut grid = Arc::new(start.clone());
        for _ in 0..4 {
            grid = Arc::new(engine.advance(&grid).unwrap());
        }
        assert_eq!(*grid, expected, "{name}");
    }
}

#[test]
fn config_selects_isolated_worker_program() {
    let cfg = SimulationConfig::with_size(10, 10)
        .with_seed(6)
        .with_strategy(StrategyKind::Isolated)
        .with_workers(3)
        .with_worker_program(WORKER);
    let mut isolated = Simulation::from_config(&cfg).unwrap();
    let mut sequential =
        Simulation::from_config(&cfg.clone().with_strategy(StrategyKind::Sequential)).unwrap();
    assert_eq!(isolated.run(5).unwrap(), sequential.run(5).unwrap());
}

/// Engine whose isolated workers run `script` under `sh -c` instead of the
/// real worker. Scripts drain stdin first so the request write never races
/// a worker that has already exited.
#[cfg(unix)]
fn scripted(script: &str, workers: usize) -> Engine {
    let pool = IsolatedWorkerPool::new("sh", workers)
        .unwrap()
        .with_args(["-c", script]);
    Engine::new(pool)
}

/// Steps once, expecting failure, and checks nothing moved.
#[cfg(unix)]
fn failed_step(start: &Grid, engine: Engine) -> StrategyError {
    let mut sim = Simulation::new(start.clone(), engine);
    let err = sim.step().unwrap_err();
    assert_eq!(sim.generation(), 0);
    assert_eq!(*sim.grid(), *start);
    match err {
        LifeError::StepFailed { generation: 1, source } => source,
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(unix)]
#[test]
fn worker_error_response_fails_the_step() {
    let start = Grid::random(6, 6, 2).unwrap();
    let engine = scripted(
        r#"cat >/dev/null; printf '%s\n' '{"type":"Error","message":"out of cells"}'"#,
        2,
    );
    match failed_step(&start, engine) {
        StrategyError::WorkerReported { worker: 0, message } => assert_eq!(message, "out of cells"),
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(unix)]
#[test]
fn short_answer_fails_the_step() {
    let start = Grid::random(6, 6, 2).unwrap();
    let engine = scripted(
        r#"cat >/dev/null; printf '%s\n' '{"type":"Evaluated","outcomes":[[0,0,false]]}'"#,
        1,
    );
    assert!(matches!(
        failed_step(&start, engine),
        StrategyError::IncompleteResponse { worker: 0, expected: 36, got: 1 }
    ));
}

#[cfg(unix)]
#[test]
fn answer_for_unassigned_order_fails_the_step() {
    // Row-major assignment is (0, 0) then (1, 0); the worker swaps them.
    let start = Grid::from_rows(&["#."]).unwrap();
    let engine = scripted(
        r#"cat >/dev/null; printf '%s\n' '{"type":"Evaluated","outcomes":[[1,0,false],[0,0,false]]}'"#,
        1,
    );
    assert!(matches!(
        failed_step(&start, engine),
        StrategyError::UnexpectedCell { worker: 0, x: 1, y: 0 }
    ));
}

#[cfg(unix)]
#[test]
fn non_zero_exit_fails_the_step() {
    let start = Grid::random(6, 6, 2).unwrap();
    let engine = scripted("cat >/dev/null; exit 3", 3);
    match failed_step(&start, engine) {
        StrategyError::WorkerExited { worker: 0, status } => assert_eq!(status.code(), Some(3)),
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(unix)]
#[test]
fn malformed_output_fails_the_step() {
    let start = Grid::random(6, 6, 2).unwrap();
    let engine = scripted("cat >/dev/null; echo 'not json'", 2);
    assert!(matches!(failed_step(&start, engine), StrategyError::Codec(_)));
}

//! Classic patterns and rule edge cases through the public API.

use conway::neighbors::live_neighbor_count;
use conway::patterns;
use conway::prelude::*;
use conway::rules::decide;

#[test]
fn corner_cell_wraps_to_opposite_corners() {
    let mut grid = Grid::new(5, 5).unwrap();
    grid.set(0, 0, true);
    for (x, y) in [(4, 4), (4, 0), (0, 4), (1, 1), (4, 1), (1, 4)] {
        assert_eq!(live_neighbor_count(&grid, x, y), 1, "({x}, {y})");
    }
}

#[test]
fn rule_table() {
    for n in 0..=8u8 {
        assert_eq!(decide(false, n), n == 3, "dead with {n}");
        assert_eq!(decide(true, n), n == 2 || n == 3, "alive with {n}");
    }
}

#[test]
fn block_survives_many_generations() {
    let start = patterns::find("Block").unwrap().centred(8, 8).unwrap();
    let mut sim = Simulation::new(start.clone(), Engine::default());
    assert_eq!(sim.run(30).unwrap(), &start);
}

#[test]
fn period_two_oscillators_return_after_two_steps() {
    for name in ["Blinker", "Toad", "Beacon"] {
        let start = patterns::find(name).unwrap().centred(10, 10).unwrap();
        let engine = Engine::default();
        let one = engine.advance_grid(&start).unwrap();
        assert_ne!(one, start, "{name} did not change");
        let two = engine.advance_grid(&one).unwrap();
        assert_eq!(two, start, "{name} did not return");
    }
}

#[test]
fn empty_grid_stays_empty() {
    let start = Grid::new(9, 9).unwrap();
    let mut sim = Simulation::new(start.clone(), Engine::default());
    assert_eq!(sim.run(3).unwrap(), &start);
}

#[test]
fn snapshot_checksum_is_unchanged_by_advance() {
    let grid = Grid::random(30, 30, 99).unwrap();
    let before = grid.checksum();
    let _next = Engine::default().advance_grid(&grid).unwrap();
    assert_eq!(grid.checksum(), before);
}

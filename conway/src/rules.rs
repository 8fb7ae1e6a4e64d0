// rules.rs - Conway's B3/S23 rule

use crate::grid::{Coord, Grid};
use crate::neighbors::live_neighbor_count_capped;

/// Next state of one cell given its current state and live-neighbor count.
#[inline]
pub fn decide(alive: bool, live_neighbors: u8) -> bool {
    match (alive, live_neighbors) {
        (true, 2) | (true, 3) => true, // Survival
        (false, 3) => true,            // Birth
        (true, _) => false,            // Under- or overpopulation
        (false, _) => false,           // Stays dead
    }
}

/// Per-cell step function: reads only `snapshot`.
#[inline]
pub fn next_state(snapshot: &Grid, (x, y): Coord) -> bool {
    let live = live_neighbor_count_capped(snapshot, x as isize, y as isize);
    decide(snapshot.at((x, y)), live)
}

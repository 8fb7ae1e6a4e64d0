// neighbors.rs - Live-neighbor counting on the torus

use crate::grid::Grid;

/// Exact number of live cells among the 8 neighbors of `(x, y)`, in `0..=8`.
pub fn live_neighbor_count(snapshot: &Grid, x: isize, y: isize) -> u8 {
    snapshot
        .neighbor_coordinates(x, y)
        .into_iter()
        .filter(|&coord| snapshot.at(coord))
        .count() as u8
}

/// Neighbor count that gives up once it passes 3.
///
/// Returns the exact count for 0..=3 and `4` for anything above. The rule
/// cannot tell 4 from 8, so this is only safe for [`crate::rules::next_state`];
/// callers that need the real number use [`live_neighbor_count`].
#[inline]
pub(crate) fn live_neighbor_count_capped(snapshot: &Grid, x: isize, y: isize) -> u8 {
    let mut count = 0;
    for coord in snapshot.neighbor_coordinates(x, y) {
        if snapshot.at(coord) {
            count += 1;
            if count > 3 {
                break;
            }
        }
    }
    count
}

// grid.rs - Toroidal grid type for Conway's Game of Life

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::LifeError;
use crate::prng::Prng;

pub const DEFAULT_SIZE: usize = 50; // Side length used when nothing else is configured
pub const SEED_THRESHOLD: f64 = 0.75; // Uniform draw above this starts alive (25% density)

/// Normalized `(x, y)` position, always inside `[0, width) × [0, height)`.
pub type Coord = (usize, usize);

/// Moore neighborhood offsets: x offset outer, y offset inner, centre skipped.
#[rustfmt::skip]
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// Folds any signed index onto an axis of length `len`.
///
/// Same as `((i % len) + len) % len`: negative and overflowing indices wrap
/// around to the opposite edge.
#[inline]
pub fn wrap(i: isize, len: usize) -> usize {
    i.rem_euclid(len as isize) as usize
}

/// Fixed-size grid of dead/alive cells whose edges wrap around (a torus).
///
/// Cells are stored row-major (`y * width + x`). The dimensions never change
/// once the grid exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "GridRepr")]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

// Wire shape; validated before it becomes a `Grid`.
#[derive(Deserialize)]
struct GridRepr {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl TryFrom<GridRepr> for Grid {
    type Error = LifeError;

    fn try_from(repr: GridRepr) -> Result<Self, Self::Error> {
        Grid::from_cells(repr.width, repr.height, repr.cells)
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<usize, LifeError> {
    if width == 0 || height == 0 {
        return Err(LifeError::InvalidConfig(format!(
            "grid dimensions must be positive, got {width}x{height}"
        )));
    }
    if width > isize::MAX as usize || height > isize::MAX as usize {
        return Err(LifeError::InvalidConfig(format!(
            "grid dimensions {width}x{height} exceed the addressable range"
        )));
    }
    width.checked_mul(height).ok_or_else(|| {
        LifeError::InvalidConfig(format!("grid of {width}x{height} cells is too large"))
    })
}

impl Grid {
    /// All-dead grid.
    pub fn new(width: usize, height: usize) -> Result<Self, LifeError> {
        let len = check_dimensions(width, height)?;
        Ok(Self { width, height, cells: vec![false; len] })
    }

    /// Grid from an explicit row-major cell vector.
    pub fn from_cells(width: usize, height: usize, cells: Vec<bool>) -> Result<Self, LifeError> {
        let len = check_dimensions(width, height)?;
        if cells.len() != len {
            return Err(LifeError::InvalidConfig(format!(
                "{width}x{height} grid needs {len} cells, got {}",
                cells.len()
            )));
        }
        Ok(Self { width, height, cells })
    }

    /// Grid from text rows, `#` or `O` for alive and anything else for dead.
    ///
    /// Every row must have the same length.
    pub fn from_rows(rows: &[&str]) -> Result<Self, LifeError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let before = cells.len();
            cells.extend(row.chars().map(|c| c == '#' || c == 'O'));
            if cells.len() - before != width {
                return Err(LifeError::InvalidConfig(format!(
                    "row {y} has {} cells, expected {width}",
                    cells.len() - before
                )));
            }
        }
        Self::from_cells(width, height, cells)
    }

    /// Random grid: each cell independently alive with probability 0.25.
    pub fn random(width: usize, height: usize, seed: u64) -> Result<Self, LifeError> {
        let len = check_dimensions(width, height)?;
        let mut rng = Prng::new(seed);
        let cells = (0..len).map(|_| rng.next_f64_01() > SEED_THRESHOLD).collect();
        Ok(Self { width, height, cells })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells, `width * height`.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// State at a toroidal coordinate; any signed pair is accepted.
    #[inline]
    pub fn get(&self, x: isize, y: isize) -> bool {
        self.cells[self.index(wrap(x, self.width), wrap(y, self.height))]
    }

    /// State at an already normalized coordinate.
    #[inline]
    pub fn at(&self, (x, y): Coord) -> bool {
        debug_assert!(x < self.width && y < self.height);
        self.cells[self.index(x, y)]
    }

    /// Sets the cell at a toroidal coordinate.
    pub fn set(&mut self, x: isize, y: isize, alive: bool) {
        let idx = self.index(wrap(x, self.width), wrap(y, self.height));
        self.cells[idx] = alive;
    }

    /// Sets the cell at an already normalized coordinate.
    #[inline]
    pub(crate) fn put(&mut self, (x, y): Coord, alive: bool) {
        debug_assert!(x < self.width && y < self.height);
        let idx = self.index(x, y);
        self.cells[idx] = alive;
    }

    /// Whether `coord` lies inside the grid without wrapping.
    pub fn contains(&self, (x, y): Coord) -> bool {
        x < self.width && y < self.height
    }

    /// The 8 Moore neighbors of `(x, y)`, wrapped onto the torus.
    ///
    /// Order is fixed (x offset −1, 0, +1; y offset −1, 0, +1 within each) so
    /// repeated calls always yield the same sequence.
    pub fn neighbor_coordinates(&self, x: isize, y: isize) -> [Coord; 8] {
        // Normalize first so offsets never overflow at the isize extremes.
        let (cx, cy) = (wrap(x, self.width) as isize, wrap(y, self.height) as isize);
        NEIGHBOR_OFFSETS.map(|(dx, dy)| (wrap(cx + dx, self.width), wrap(cy + dy, self.height)))
    }

    /// Every coordinate in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = Coord> + use<> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.cells
    }

    /// Hash of the dimensions and every cell; equal grids hash equally.
    pub fn checksum(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            for &alive in row {
                f.write_str(if alive { "#" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

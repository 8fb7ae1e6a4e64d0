use crate::error::LifeError;
use crate::grid::Grid;

/// Named seed pattern as `(x, y)` offsets from its top-left corner.
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(isize, isize)],
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "Block",
        cells: &[(0, 0), (1, 0), (0, 1), (1, 1)],
    },
    Pattern {
        name: "Blinker",
        cells: &[(0, 0), (1, 0), (2, 0)],
    },
    Pattern {
        name: "Toad",
        cells: &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
    },
    Pattern {
        name: "Beacon",
        cells: &[(0, 0), (1, 0), (0, 1), (1, 1), (2, 2), (3, 2), (2, 3), (3, 3)],
    },
    Pattern {
        name: "Glider",
        cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
    },
    Pattern {
        name: "R-pentomino",
        cells: &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
    },
];

/// Looks a pattern up by name, ignoring case.
pub fn find(name: &str) -> Option<&'static Pattern> {
    PATTERNS.iter().find(|p| p.name.eq_ignore_ascii_case(name.trim()))
}

impl Pattern {
    /// Bounding box `(width, height)`.
    pub fn extent(&self) -> (usize, usize) {
        let w = self.cells.iter().map(|&(x, _)| x).max().unwrap_or(-1) + 1;
        let h = self.cells.iter().map(|&(_, y)| y).max().unwrap_or(-1) + 1;
        (w as usize, h as usize)
    }

    /// Sets the pattern's cells alive with its corner at `(x, y)`, wrapping at the edges.
    pub fn stamp(&self, grid: &mut Grid, x: isize, y: isize) {
        for &(dx, dy) in self.cells {
            grid.set(x + dx, y + dy, true);
        }
    }

    /// Fresh grid holding only this pattern, centred.
    pub fn centred(&self, width: usize, height: usize) -> Result<Grid, LifeError> {
        let mut grid = Grid::new(width, height)?;
        let (w, h) = self.extent();
        let x = width.saturating_sub(w) / 2;
        let y = height.saturating_sub(h) / 2;
        self.stamp(&mut grid, x as isize, y as isize);
        Ok(grid)
    }
}

//! Integer cell coordinates for the uniform grid.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Integer coordinates identifying one grid cell.
///
/// For a grid with cell size `s`, the cell `(cx, cy)` covers the square
/// `[cx * s, (cx + 1) * s) × [cy * s, (cy + 1) * s)`. Coordinates may be
/// negative; the mapping from a point to its cell is `floor(x / s)` on each
/// axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i64,
    pub y: i64,
}

impl CellCoord {
    /// Creates a cell coordinate.
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Returns the cell containing the point `(x, y)` for the given cell size.
    pub fn of(x: f64, y: f64, cell_size: f64) -> Self {
        Self {
            x: (x / cell_size).floor() as i64,
            y: (y / cell_size).floor() as i64,
        }
    }

    /// Returns the cell offset by `(dx, dy)` cells from this one.
    pub fn offset(&self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({}, {})", self.x, self.y)
    }
}

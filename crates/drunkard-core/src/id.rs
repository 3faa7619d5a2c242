//! Grid cell coordinates.

use std::fmt;

/// A cell position on the simulation grid.
///
/// `x` is the column and `y` is the row; `(0, 0)` is the absorbing
/// center. Cells are scanned in row-major order (`y` outer, `x` inner).
///
/// # Examples
///
/// ```
/// use drunkard_core::Cell;
///
/// let c = Cell::new(2, 1);
/// assert_eq!(c.index(3), 5);
/// assert!(!c.is_center());
/// assert!(Cell::CENTER.is_center());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl Cell {
    /// The absorbing center at the grid origin.
    pub const CENTER: Cell = Cell { x: 0, y: 0 };

    /// Construct a cell from column and row.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Whether this is the absorbing center.
    pub fn is_center(self) -> bool {
        self == Self::CENTER
    }

    /// Row-major linear index for a grid with `cols` columns.
    pub fn index(self, cols: u32) -> usize {
        self.y as usize * cols as usize + self.x as usize
    }

    /// Inverse of [`index`](Cell::index).
    pub fn from_index(index: usize, cols: u32) -> Self {
        let cols = cols as usize;
        Self {
            x: (index % cols) as u32,
            y: (index / cols) as u32,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

//! The simulation lattice.

use drunkard_core::{Cell, Direction};
use smallvec::SmallVec;

use crate::edge::{resolve_axis, EdgeBehavior};
use crate::error::LayoutError;

/// A rows × cols grid of cells, each either free or an obstacle.
///
/// The obstacle map is stored row-major. The center `(0, 0)` is never an
/// obstacle; every constructor enforces this.
///
/// # Examples
///
/// ```
/// use drunkard_core::{Cell, Direction};
/// use drunkard_space::{EdgeBehavior, Grid};
///
/// let grid = Grid::open(3, 3);
/// // Moving up from the top row wraps to the bottom on an open grid.
/// let next = grid.step(Cell::new(1, 0), Direction::Up, EdgeBehavior::Wrap);
/// assert_eq!(next, Cell::new(1, 2));
/// // With hard walls the walker stays put.
/// let next = grid.step(Cell::new(1, 0), Direction::Up, EdgeBehavior::Clamp);
/// assert_eq!(next, Cell::new(1, 0));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: u32,
    cols: u32,
    obstacles: Vec<bool>,
}

impl Grid {
    /// A grid with no obstacles.
    pub fn open(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            obstacles: vec![false; rows as usize * cols as usize],
        }
    }

    /// A grid whose obstacle map is copied from `map` (row-major).
    ///
    /// Only bounds are checked; reachability is not.
    pub fn from_bitmap(rows: u32, cols: u32, map: &[bool]) -> Result<Self, LayoutError> {
        let expected = rows as usize * cols as usize;
        if map.len() != expected {
            return Err(LayoutError::MapSize {
                expected,
                got: map.len(),
            });
        }
        if map.first().copied().unwrap_or(false) {
            return Err(LayoutError::CenterBlocked);
        }
        Ok(Self {
            rows,
            cols,
            obstacles: map.to_vec(),
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.obstacles.len()
    }

    /// Row-major index of `cell`.
    pub fn index(&self, cell: Cell) -> usize {
        cell.index(self.cols)
    }

    /// Whether `cell` lies inside the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.cols && cell.y < self.rows
    }

    /// Whether `cell` is an obstacle. Out-of-bounds cells are not.
    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.contains(cell) && self.obstacles[self.index(cell)]
    }

    /// Number of obstacle cells.
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.iter().filter(|&&o| o).count()
    }

    /// Row-major obstacle flags.
    pub fn bitmap(&self) -> &[bool] {
        &self.obstacles
    }

    /// Row-major obstacle flags as bytes (`0` free, `1` obstacle).
    pub fn to_bytes(&self) -> Vec<u8> {
        self.obstacles.iter().map(|&o| u8::from(o)).collect()
    }

    pub(crate) fn set_obstacle(&mut self, cell: Cell, obstacle: bool) {
        let i = self.index(cell);
        self.obstacles[i] = obstacle;
    }

    /// All cells in row-major scan order, center included.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let cols = self.cols;
        (0..self.cell_count()).map(move |i| Cell::from_index(i, cols))
    }

    /// All non-center cells in row-major scan order.
    pub fn start_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells().filter(|c| !c.is_center())
    }

    /// Where one move in `direction` from `from` lands.
    ///
    /// Under [`EdgeBehavior::Wrap`] each axis wraps modulo its length.
    /// Under [`EdgeBehavior::Clamp`] a move off the grid is rejected.
    /// A move onto an obstacle is always rejected. A rejected move
    /// returns `from`.
    pub fn step(&self, from: Cell, direction: Direction, edge: EdgeBehavior) -> Cell {
        let (dx, dy) = direction.offset();
        let nx = resolve_axis(i64::from(from.x) + dx, self.cols, edge);
        let ny = resolve_axis(i64::from(from.y) + dy, self.rows, edge);
        match (nx, ny) {
            (Some(x), Some(y)) => {
                let next = Cell::new(x, y);
                if self.is_obstacle(next) {
                    from
                } else {
                    next
                }
            }
            _ => from,
        }
    }

    /// Free 4-neighbours of `cell` under `edge`, excluding `cell` itself.
    pub fn free_neighbours(&self, cell: Cell, edge: EdgeBehavior) -> SmallVec<[Cell; 4]> {
        let mut out = SmallVec::new();
        for d in Direction::ALL {
            let next = self.step(cell, d, edge);
            if next != cell && !out.contains(&next) {
                out.push(next);
            }
        }
        out
    }
}

//! Movement directions and cumulative-threshold selection.

use crate::config::Probabilities;

/// One of the four lattice moves.
///
/// `Up` decreases the row, `Left` decreases the column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Row minus one.
    Up,
    /// Row plus one.
    Down,
    /// Column minus one.
    Left,
    /// Column plus one.
    Right,
}

impl Direction {
    /// All directions in threshold order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Pick a direction for the uniform variate `r` in `[0, 1)`.
    ///
    /// Thresholds are cumulative in the fixed order up, down, left; any
    /// remaining mass (including rounding slack, or a configuration whose
    /// four probabilities do not sum to one) falls through to `Right`.
    /// `p_right` itself is never consulted.
    ///
    /// # Examples
    ///
    /// ```
    /// use drunkard_core::{Direction, Probabilities};
    ///
    /// let p = Probabilities::uniform();
    /// assert_eq!(Direction::select(0.10, &p), Direction::Up);
    /// assert_eq!(Direction::select(0.30, &p), Direction::Down);
    /// assert_eq!(Direction::select(0.60, &p), Direction::Left);
    /// assert_eq!(Direction::select(0.99, &p), Direction::Right);
    /// ```
    pub fn select(r: f64, p: &Probabilities) -> Self {
        if r < p.up {
            Self::Up
        } else if r < p.up + p.down {
            Self::Down
        } else if r < p.up + p.down + p.left {
            Self::Left
        } else {
            Self::Right
        }
    }

    /// Signed `(dx, dy)` offset.
    pub fn offset(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

//! Edge (boundary) behavior for grid moves.

use drunkard_core::ObstacleMode;

/// How a move that leaves the grid is resolved.
///
/// # Examples
///
/// ```
/// use drunkard_core::ObstacleMode;
/// use drunkard_space::EdgeBehavior;
///
/// assert_eq!(EdgeBehavior::for_mode(ObstacleMode::None), EdgeBehavior::Wrap);
/// assert_eq!(EdgeBehavior::for_mode(ObstacleMode::Random), EdgeBehavior::Clamp);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeBehavior {
    /// The move wraps to the opposite side (torus).
    Wrap,
    /// The move is rejected and the walker stays put (self-loop).
    Clamp,
}

impl EdgeBehavior {
    /// Edge behavior implied by an obstacle mode: open grids wrap,
    /// grids with obstacles have hard walls.
    pub fn for_mode(mode: ObstacleMode) -> Self {
        if mode.enabled() {
            Self::Clamp
        } else {
            Self::Wrap
        }
    }
}

/// Resolve a single axis value under the given edge behavior.
/// Returns `None` when a `Clamp` edge rejects the move.
pub(crate) fn resolve_axis(val: i64, len: u32, edge: EdgeBehavior) -> Option<u32> {
    let n = i64::from(len);
    if (0..n).contains(&val) {
        return Some(val as u32);
    }
    match edge {
        EdgeBehavior::Clamp => None,
        EdgeBehavior::Wrap => Some(val.rem_euclid(n) as u32),
    }
}

//! Move enumeration shared by the agent and the ghosts.

use serde::{Deserialize, Serialize};

/// A move on the maze graph.
///
/// `Neutral` is the no-op sentinel: it is the move stored on a search root
/// (whose move is never read by policy logic) and the value returned where
/// no real move applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dir {
    Up,
    Right,
    Down,
    Left,
    Neutral,
}

impl Dir {
    /// The four real directions, in canonical scan order.
    pub const ARMS: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];

    /// The reversing move. `Neutral` reverses to itself.
    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Right => Dir::Left,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Neutral => Dir::Neutral,
        }
    }

    /// Grid offset of one step in this direction, as (dx, dy).
    /// `y` grows downward.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Right => (1, 0),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Neutral => (0, 0),
        }
    }
}

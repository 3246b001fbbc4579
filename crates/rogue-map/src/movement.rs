//! One-step movement and collision on a [`Map`].

use crate::geometry::Position;
use crate::map::Map;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit offset `(dx, dy)`; y grows downward.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Outcome of trying to move one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The target cell was free; the mover is now there.
    Moved(Position),
    /// Map edge or wall. The mover stays put.
    Blocked,
    /// An enemy occupies the target. `enemy` indexes [`Map::enemies`].
    Bumped { enemy: usize, at: Position },
}

impl Map {
    /// Resolve a one-cell move from `from` in `dir`.
    ///
    /// Terrain is checked before enemies, so an enemy standing on a wall
    /// (never produced by the generator) still blocks rather than bumps.
    #[must_use]
    pub fn step(&self, from: Position, dir: Direction) -> Step {
        let (dx, dy) = dir.delta();
        let to = from.offset(dx, dy);
        if !self.is_walkable(to) {
            return Step::Blocked;
        }
        match self.enemy_at(to) {
            Some(enemy) => Step::Bumped { enemy, at: to },
            None => Step::Moved(to),
        }
    }
}

//! The dungeon map: a grid of tiles plus the rooms and enemies placed on it.
//!
//! Tiles are stored row-major. Every tile starts as [`TileKind::Floor`], so
//! the space between rooms is open ground; rooms are carved on top of it.

use crate::geometry::{Position, Rect};

// ---------------------------------------------------------------------------
// TileKind
// ---------------------------------------------------------------------------

/// What occupies one map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileKind {
    #[default]
    Floor,
    VerticalWall,
    HorizontalWall,
    Door,
}

impl TileKind {
    /// Floors and doors can be walked on; walls cannot.
    #[inline]
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        !self.is_wall()
    }

    #[inline]
    #[must_use]
    const fn is_wall(self) -> bool {
        matches!(self, Self::VerticalWall | Self::HorizontalWall)
    }
}

// ---------------------------------------------------------------------------
// Enemy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Enemy {
    pub position: Position,
}

impl Enemy {
    #[inline]
    #[must_use]
    pub const fn at(x: i32, y: i32) -> Self {
        Self {
            position: Position::new(x, y),
        }
    }
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    width: i32,
    height: i32,
    tiles: Vec<TileKind>,
    rooms: Vec<Rect>,
    enemies: Vec<Enemy>,
}

impl Map {
    /// An all-floor map with no rooms or enemies. Negative dimensions are
    /// treated as zero.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        #[allow(clippy::cast_sign_loss)]
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            tiles: vec![TileKind::Floor; len],
            rooms: Vec::new(),
            enemies: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    #[allow(clippy::cast_sign_loss)]
    const fn index(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// The tile at `pos`, or `None` off the map.
    #[must_use]
    pub fn tile(&self, pos: Position) -> Option<TileKind> {
        self.index(pos).map(|i| self.tiles[i])
    }

    /// Overwrite the tile at `pos`. Returns false (and changes nothing) when
    /// `pos` is off the map.
    pub fn set_tile(&mut self, pos: Position, kind: TileKind) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.tiles[i] = kind;
                true
            }
            None => false,
        }
    }

    /// On the map and on a floor or door tile. Enemies are not considered.
    #[must_use]
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tile(pos).is_some_and(TileKind::is_walkable)
    }

    /// Row-major iteration over every tile with its position.
    pub fn tiles(&self) -> impl Iterator<Item = (Position, TileKind)> + '_ {
        let width = self.width;
        (0..self.height)
            .flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
            .zip(self.tiles.iter().copied())
    }

    #[must_use]
    pub fn rooms(&self) -> &[Rect] {
        &self.rooms
    }

    pub fn add_room(&mut self, room: Rect) {
        self.rooms.push(room);
    }

    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn add_enemy(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    /// Index of the first enemy standing on `pos`.
    #[must_use]
    pub fn enemy_at(&self, pos: Position) -> Option<usize> {
        self.enemies.iter().position(|e| e.position == pos)
    }

    /// Remove and return the enemy at `index`, if there is one.
    pub fn remove_enemy(&mut self, index: usize) -> Option<Enemy> {
        (index < self.enemies.len()).then(|| self.enemies.remove(index))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Random dungeon generation.
//!
//! A map is built in two passes over an all-floor grid:
//!
//! 1. **Rooms.** Pick a room count, then for each room draw up to
//!    `max_attempts` random rectangles. A rectangle is rejected if it runs
//!    off the right or bottom edge or overlaps a room already placed. The
//!    first acceptable one is carved: walls around the border, floor inside,
//!    and a single door on a random side. A room that never finds space is
//!    skipped, so a crowded map may hold fewer rooms than requested.
//! 2. **Enemies.** Draw a number of candidate positions and keep the ones
//!    that land on floor.
//!
//! Generation never fails. Ranges that are empty (a tiny map, a config with
//! `start >= end`) collapse to their start value instead of panicking.
//!
//! All randomness comes from the caller's `Rng`, so a seeded generator
//! produces the same map every time.

use std::ops::Range;

use log::debug;
use rand::distributions::uniform::SampleUniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::{Position, Rect};
use crate::map::{Enemy, Map, TileKind};

// ---------------------------------------------------------------------------
// GeneratorConfig
// ---------------------------------------------------------------------------

/// Tunables for [`MapGenerator`]. Every range excludes its end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// How many rooms to try to place.
    pub rooms: Range<usize>,
    /// Outer width of a room, walls included.
    pub room_width: Range<i32>,
    /// Outer height of a room, walls included.
    pub room_height: Range<i32>,
    /// Random rectangles tried per room before giving up on it.
    pub max_attempts: usize,
    /// Enemy positions drawn. Only those landing on floor are kept.
    pub enemy_candidates: Range<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rooms: 6..8,
            room_width: 8..10,
            room_height: 6..8,
            max_attempts: 10,
            enemy_candidates: 10..20,
        }
    }
}

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// The wall of a room that receives its door.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    fn random<R: Rng>(rng: &mut R) -> Self {
        match rng.gen_range(0..4) {
            0 => Self::Left,
            1 => Self::Right,
            2 => Self::Top,
            _ => Self::Bottom,
        }
    }

    /// Door position on this side of `room`. Side walls get the door on
    /// the middle row; top and bottom walls at `width / 2` in from the right.
    const fn door(self, room: &Rect) -> Position {
        match self {
            Self::Left => Position::new(room.x, room.y + room.height / 2),
            Self::Right => Position::new(room.right() - 1, room.y + room.height / 2),
            Self::Top => Position::new(room.right() - room.width / 2, room.y),
            Self::Bottom => Position::new(room.right() - room.width / 2, room.bottom() - 1),
        }
    }
}

/// A value from `range`, or `range.start` when the range is empty.
fn pick<T, R>(rng: &mut R, range: &Range<T>) -> T
where
    T: SampleUniform + PartialOrd + Copy,
    R: Rng,
{
    if range.start < range.end {
        rng.gen_range(range.start..range.end)
    } else {
        range.start
    }
}

/// Write walls, floor and one door for `room` into `map`.
fn carve_room(map: &mut Map, room: &Rect, door: Side) {
    for y in room.y..room.bottom() {
        for x in room.x..room.right() {
            let kind = if y == room.y || y == room.bottom() - 1 {
                TileKind::HorizontalWall
            } else if x == room.x || x == room.right() - 1 {
                TileKind::VerticalWall
            } else {
                TileKind::Floor
            };
            map.set_tile(Position::new(x, y), kind);
        }
    }
    map.set_tile(door.door(room), TileKind::Door);
}

// ---------------------------------------------------------------------------
// MapGenerator
// ---------------------------------------------------------------------------

pub struct MapGenerator<R> {
    rng: R,
    width: i32,
    height: i32,
    config: GeneratorConfig,
}

impl MapGenerator<StdRng> {
    /// A generator seeded for reproducible maps.
    #[must_use]
    pub fn from_seed(seed: u64, width: i32, height: i32) -> Self {
        Self::new(StdRng::seed_from_u64(seed), width, height)
    }
}

impl<R: Rng> MapGenerator<R> {
    #[must_use]
    pub fn new(rng: R, width: i32, height: i32) -> Self {
        Self {
            rng,
            width: width.max(0),
            height: height.max(0),
            config: GeneratorConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Build a new map. Each call draws fresh randomness, so successive
    /// calls on one generator give different maps.
    pub fn generate(&mut self) -> Map {
        let mut map = Map::new(self.width, self.height);
        self.place_rooms(&mut map);
        self.place_enemies(&mut map);
        map
    }

    fn place_rooms(&mut self, map: &mut Map) {
        let wanted = pick(&mut self.rng, &self.config.rooms);
        for _ in 0..wanted {
            if let Some(room) = self.find_space(map) {
                let side = Side::random(&mut self.rng);
                carve_room(map, &room, side);
                map.add_room(room);
            }
        }
        debug!(
            "placed {} of {} rooms on {}x{} map",
            map.rooms().len(),
            wanted,
            self.width,
            self.height
        );
    }

    fn find_space(&mut self, map: &Map) -> Option<Rect> {
        for _ in 0..self.config.max_attempts {
            let room = Rect::new(
                pick(&mut self.rng, &(0..self.width - 1)),
                pick(&mut self.rng, &(0..self.height - 1)),
                pick(&mut self.rng, &self.config.room_width),
                pick(&mut self.rng, &self.config.room_height),
            );
            if room.width < 1 || room.height < 1 {
                continue;
            }
            if room.right() >= self.width || room.bottom() >= self.height {
                continue;
            }
            if map.rooms().iter().any(|r| r.intersects(&room)) {
                continue;
            }
            return Some(room);
        }
        None
    }

    fn place_enemies(&mut self, map: &mut Map) {
        let candidates = pick(&mut self.rng, &self.config.enemy_candidates);
        for _ in 0..candidates {
            let pos = Position::new(
                pick(&mut self.rng, &(0..self.width - 1)),
                pick(&mut self.rng, &(0..self.height - 1)),
            );
            if map.tile(pos) == Some(TileKind::Floor) {
                map.add_enemy(Enemy { position: pos });
            }
        }
        debug!("kept {} of {} enemy candidates", map.enemies().len(), candidates);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

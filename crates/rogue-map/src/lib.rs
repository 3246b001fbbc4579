//! # rogue-map — Dungeon layout for rogue
//!
//! - **[`geometry`]** — `Position` and `Rect` on the map grid
//! - **[`map`]** — `Map`, its tiles, rooms and enemies
//! - **[`generator`]** — seeded random room and enemy placement
//! - **[`movement`]** — one-step moves with wall and enemy collision
//! - **[`mod@paint`]** — drawing a map into a `rogue_term::Screen`

pub mod generator;
pub mod geometry;
pub mod map;
pub mod movement;
pub mod paint;

pub use generator::{GeneratorConfig, MapGenerator};
pub use geometry::{Position, Rect};
pub use map::{Enemy, Map, TileKind};
pub use movement::{Direction, Step};
pub use paint::paint;

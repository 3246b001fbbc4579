//! Drawing a map into a screen's pending frame.
//!
//! Painting only queues cells; the caller flushes. Everything is drawn each
//! frame (tiles, then enemies, then the player on top) because the renderer
//! erases whatever a frame leaves unwritten.

use rogue_term::console::Console;
use rogue_term::{Cell, Color, Result, Screen};

use crate::geometry::Position;
use crate::map::{Map, TileKind};

pub const FLOOR: Cell = Cell::styled('.', Color::White, Color::Black);
pub const VERTICAL_WALL: Cell = Cell::styled('|', Color::White, Color::Black);
pub const HORIZONTAL_WALL: Cell = Cell::styled('-', Color::White, Color::Black);
pub const DOOR: Cell = Cell::styled('+', Color::Green, Color::Black);
pub const ENEMY: Cell = Cell::styled('E', Color::Red, Color::Black);
pub const PLAYER: Cell = Cell::styled('@', Color::DarkCyan, Color::Black);

/// The glyph for a tile.
#[must_use]
pub const fn tile_cell(kind: TileKind) -> Cell {
    match kind {
        TileKind::Floor => FLOOR,
        TileKind::VerticalWall => VERTICAL_WALL,
        TileKind::HorizontalWall => HORIZONTAL_WALL,
        TileKind::Door => DOOR,
    }
}

/// Queue the whole map, its enemies and the player. Parts of the map that
/// fall outside the screen buffer are clipped.
///
/// The frame is written under a single screen lock, so a flush on another
/// thread sees either none of it or all of it.
pub fn paint<C: Console>(screen: &Screen<C>, map: &Map, player: Position) -> Result<()> {
    let (width, height) = (screen.buffer_width(), screen.buffer_height());
    let visible = |p: &Position| p.x >= 0 && p.y >= 0 && p.x < width && p.y < height;

    let tiles = map.tiles().map(|(pos, kind)| (pos, tile_cell(kind)));
    let enemies = map.enemies().iter().map(|e| (e.position, ENEMY));
    let frame = tiles
        .chain(enemies)
        .chain(std::iter::once((player, PLAYER)))
        .filter(|(pos, _)| visible(pos))
        .map(|(pos, cell)| (pos.x, pos.y, cell));
    screen.write_cells(frame)
}

// SPDX-License-Identifier: MIT
//
// Cell — the atomic unit of terminal rendering.
//
// Every character position on screen is a Cell: one printable symbol plus a
// foreground and a background color. Cells are plain values. They are never
// mutated after construction; a new frame simply stores new cells.
//
// "Nothing written here this frame" is not a Cell at all. Frame buffers
// store `Option<Cell>`, so an explicit space is always distinguishable from
// an untouched slot.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::color::Color;

/// Foreground used when a cell is built without explicit colors.
pub const DEFAULT_FG: Color = Color::White;

/// Background used when a cell is built without explicit colors.
pub const DEFAULT_BG: Color = Color::Black;

/// A single terminal cell: symbol, foreground and background.
///
/// Equality is structural over all three fields, which is exactly what the
/// diff renderer needs: two equal cells are interchangeable on screen.
///
/// # Examples
///
/// ```
/// use rogue_term::cell::Cell;
/// use rogue_term::color::Color;
///
/// let wall = Cell::styled('|', Color::White, Color::Black);
/// assert_eq!(wall.symbol(), '|');
/// assert_eq!(wall, Cell::new('|'));
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    symbol: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Create a cell with the default colors (white on black).
    #[inline]
    #[must_use]
    pub const fn new(symbol: char) -> Self {
        Self::styled(symbol, DEFAULT_FG, DEFAULT_BG)
    }

    /// Create a cell with explicit colors.
    #[inline]
    #[must_use]
    pub const fn styled(symbol: char, fg: Color, bg: Color) -> Self {
        Self { symbol, fg, bg }
    }

    /// A space in the given colors. Used to erase a previously drawn cell.
    #[inline]
    #[must_use]
    pub const fn blank(fg: Color, bg: Color) -> Self {
        Self::styled(' ', fg, bg)
    }

    /// The printable symbol.
    #[inline]
    #[must_use]
    pub const fn symbol(self) -> char {
        self.symbol
    }

    /// Foreground (text) color.
    #[inline]
    #[must_use]
    pub const fn fg(self) -> Color {
        self.fg
    }

    /// Background color.
    #[inline]
    #[must_use]
    pub const fn bg(self) -> Color {
        self.bg
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::blank(DEFAULT_FG, DEFAULT_BG)
    }
}

// Fields are folded with XOR so the hash agrees with structural equality.
impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let folded = u32::from(self.symbol)
            ^ (u32::from(self.fg.index()) << 21)
            ^ (u32::from(self.bg.index()) << 26);
        state.write_u32(folded);
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({:?}, {}/{})", self.symbol, self.fg, self.bg)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

// SPDX-License-Identifier: MIT
//
// Color — the fixed console palette.
//
// Sixteen named colors, one per standard ANSI SGR slot. There is no RGB,
// no 256-color palette and no alpha: every cell picks one of these for its
// foreground and one for its background, and the terminal renders them
// with its own theme. The dungeon itself only needs a handful (black,
// dark cyan, red, green, white), but the full set costs nothing.

use std::fmt;

/// One of the sixteen standard console colors.
///
/// The discriminant is the palette index: 0–7 are the normal colors,
/// 8–15 their bright counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    DarkRed = 1,
    DarkGreen = 2,
    DarkYellow = 3,
    DarkBlue = 4,
    DarkMagenta = 5,
    DarkCyan = 6,
    Gray = 7,
    DarkGray = 8,
    Red = 9,
    Green = 10,
    Yellow = 11,
    Blue = 12,
    Magenta = 13,
    Cyan = 14,
    White = 15,
}

impl Color {
    /// Every color, in palette order.
    #[cfg(test)]
    pub(crate) const ALL: [Self; 16] = [
        Self::Black,
        Self::DarkRed,
        Self::DarkGreen,
        Self::DarkYellow,
        Self::DarkBlue,
        Self::DarkMagenta,
        Self::DarkCyan,
        Self::Gray,
        Self::DarkGray,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
    ];

    /// Palette index (0–15).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Whether this is one of the bright colors (palette 8–15).
    #[inline]
    #[must_use]
    const fn is_bright(self) -> bool {
        self.index() >= 8
    }

    /// SGR parameter selecting this color as the foreground.
    ///
    /// Normal colors use 30–37, bright colors use the aixterm range 90–97.
    #[inline]
    #[must_use]
    pub const fn fg_code(self) -> u8 {
        let idx = self.index();
        if self.is_bright() { 82 + idx } else { 30 + idx }
    }

    /// SGR parameter selecting this color as the background (40–47, 100–107).
    #[inline]
    #[must_use]
    pub const fn bg_code(self) -> u8 {
        self.fg_code() + 10
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Black => "Black",
            Self::DarkRed => "DarkRed",
            Self::DarkGreen => "DarkGreen",
            Self::DarkYellow => "DarkYellow",
            Self::DarkBlue => "DarkBlue",
            Self::DarkMagenta => "DarkMagenta",
            Self::DarkCyan => "DarkCyan",
            Self::Gray => "Gray",
            Self::DarkGray => "DarkGray",
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Blue => "Blue",
            Self::Magenta => "Magenta",
            Self::Cyan => "Cyan",
            Self::White => "White",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

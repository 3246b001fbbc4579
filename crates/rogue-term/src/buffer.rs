// SPDX-License-Identifier: MIT
//
// FrameBuffer — the 2D grid of optional cells that a frame is built in.
//
// Design:
//
//   - Flat `Vec<Option<Cell>>` with row-major indexing. A row's slots are
//     contiguous, so the renderer's left-to-right scan is a linear walk.
//
//   - `None` means "not written this frame". It is never confused with a
//     space, which is an explicit `Some(Cell)`.
//
//   - Coordinates are signed. Negative input is representable and rejected
//     with `OutOfBounds` like any other bad coordinate.
//
//   - Buffers never resize. When dimensions change, allocate a new one.

use crate::cell::Cell;
use crate::error::{Error, Result};

/// A fixed-size grid of optional cells.
///
/// # Examples
///
/// ```
/// use rogue_term::buffer::FrameBuffer;
/// use rogue_term::cell::Cell;
///
/// let mut buf = FrameBuffer::new(80, 24)?;
/// assert_eq!(buf.get(5, 3)?, None);
///
/// buf.set(5, 3, Cell::new('X'))?;
/// assert_eq!(buf.get(5, 3)?, Some(Cell::new('X')));
/// assert!(buf.set(80, 0, Cell::new('X')).is_err());
/// # Ok::<(), rogue_term::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: i32,
    height: i32,
    cells: Vec<Option<Cell>>,
}

impl FrameBuffer {
    /// Create an all-empty buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if `width` or `height` is not
    /// positive.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        // Both are positive, so the casts are lossless.
        #[allow(clippy::cast_sign_loss)]
        let size = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            cells: vec![None; size],
        })
    }

    /// A fresh empty buffer with the same dimensions.
    #[must_use]
    pub fn blank_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            cells: vec![None; self.cells.len()],
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Buffer width in columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Buffer height in rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Whether `(x, y)` lies inside the buffer.
    #[inline]
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Number of slots holding a cell.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|slot| slot.is_some()).count()
    }

    /// Store `cell` at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the coordinate is outside the buffer.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> Result<()> {
        let idx = self.checked_index(x, y)?;
        self.cells[idx] = Some(cell);
        Ok(())
    }

    /// The cell at `(x, y)`, or `None` if nothing was written there.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the coordinate is outside the buffer.
    pub fn get(&self, x: i32, y: i32) -> Result<Option<Cell>> {
        let idx = self.checked_index(x, y)?;
        Ok(self.cells[idx])
    }

    /// Iterate slots with their coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, Option<Cell>)> + '_ {
        let width = self.width;
        (0..self.height)
            .flat_map(move |y| (0..width).map(move |x| (x, y)))
            .zip(self.cells.iter().copied())
            .map(|((x, y), slot)| (x, y, slot))
    }

    /// Slot lookup for coordinates the caller has already clamped to the
    /// buffer. The renderer's hot loop uses this.
    #[inline]
    pub(crate) fn slot(&self, x: i32, y: i32) -> Option<Cell> {
        debug_assert!(self.contains(x, y));
        self.cells[self.index(x, y)]
    }

    // ─── Indexing ────────────────────────────────────────────────────────

    /// Row-major index. Only valid for in-bounds coordinates.
    #[inline]
    #[allow(clippy::cast_sign_loss)]
    const fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn checked_index(&self, x: i32, y: i32) -> Result<usize> {
        if self.contains(x, y) {
            Ok(self.index(x, y))
        } else {
            Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

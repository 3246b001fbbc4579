// SPDX-License-Identifier: MIT
//
// Output buffering.
//
// OutputBuffer accumulates all ANSI bytes in memory so an entire frame can
// be written with a single write() call. This removes per-escape overhead
// and keeps the terminal's input parser from seeing half a frame.

use std::io::{self, Write};

use unicode_width::UnicodeWidthChar;

/// A byte buffer that accumulates ANSI output for a single `write()` call.
///
/// Default capacity: 16 KB, enough for a full 80×24 repaint with a color
/// change on every cell.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 16_384;

/// Emitted in place of symbols that would not occupy exactly one column.
const REPLACEMENT: u8 = b'?';

impl OutputBuffer {
    /// Create an empty buffer with default capacity (16 KB).
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    #[cfg(test)]
    fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Write one cell symbol as UTF-8.
    ///
    /// The grid is strictly one column per cell, so control characters,
    /// zero-width marks and double-width characters all become `?`.
    pub fn write_symbol(&mut self, ch: char) {
        if !ch.is_control() && ch.width() == Some(1) {
            let mut enc = [0u8; 4];
            self.buf.extend_from_slice(ch.encode_utf8(&mut enc).as_bytes());
        } else {
            self.buf.push(REPLACEMENT);
        }
    }

    /// Write accumulated output to `w`, flush it, and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails. The buffer is kept intact
    /// in that case.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Real flushing happens in flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

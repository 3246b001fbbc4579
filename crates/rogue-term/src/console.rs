// SPDX-License-Identifier: MIT
//
// Console — the physical terminal device, behind a trait.
//
// The renderer never talks to stdout directly. Everything it does to the
// screen goes through six primitive operations: query the size, try to set
// the size, show/hide the cursor, clear in given colors, put one cell, and
// flush. That keeps the diff algorithm testable: `MemoryConsole` records
// each operation, so a test can count exactly how many cells a flush wrote.
//
// AnsiConsole is the real device. It accumulates escape sequences in an
// OutputBuffer and writes the whole batch on `flush()`, wrapped in
// synchronized-output markers so the terminal paints it at once.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crate::ansi;
use crate::cell::Cell;
use crate::color::Color;
use crate::output::OutputBuffer;
use crate::terminal::{self, Size};

// ─── Console ─────────────────────────────────────────────────────────────────

/// A terminal device the screen renders to.
///
/// Coordinates are 0-indexed columns and rows. Implementations may buffer
/// output; nothing is guaranteed visible until [`flush`](Self::flush).
pub trait Console: Send {
    /// Current viewport size.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be queried.
    fn size(&mut self) -> io::Result<Size>;

    /// Try to resize the viewport.
    ///
    /// # Errors
    ///
    /// Returns an error of kind [`io::ErrorKind::Unsupported`] when the
    /// platform does not allow programmatic resizing. Callers treat that
    /// as recoverable.
    fn set_size(&mut self, size: Size) -> io::Result<()>;

    /// Show or hide the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the device write fails.
    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()>;

    /// Clear the whole viewport using the given colors.
    ///
    /// # Errors
    ///
    /// Returns an error if the device write fails.
    fn clear(&mut self, fg: Color, bg: Color) -> io::Result<()>;

    /// One physical cell write: move the cursor to `(x, y)`, set both
    /// colors, and emit the symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the device write fails.
    fn put(&mut self, x: u16, y: u16, cell: Cell) -> io::Result<()>;

    /// Push everything written so far to the device.
    ///
    /// # Errors
    ///
    /// Returns an error if the device write fails.
    fn flush(&mut self) -> io::Result<()>;
}

fn unsupported_resize(requested: Size) -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        format!(
            "terminal did not adopt the requested {}x{} size",
            requested.cols, requested.rows
        ),
    )
}

/// Terminals apply XTWINOPS asynchronously. Poll this many times after the
/// request before calling the resize unsupported.
const RESIZE_POLLS: u32 = 10;
const RESIZE_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Wait for `query` to report `wanted`, checking `polls + 1` times with
/// `interval` between checks.
fn await_size(
    wanted: Size,
    polls: u32,
    interval: Duration,
    mut query: impl FnMut() -> Option<Size>,
) -> io::Result<()> {
    for attempt in 0..=polls {
        if query() == Some(wanted) {
            return Ok(());
        }
        if attempt < polls {
            thread::sleep(interval);
        }
    }
    Err(unsupported_resize(wanted))
}

// ─── AnsiConsole ─────────────────────────────────────────────────────────────

/// A console that speaks ANSI escape sequences to a writer.
///
/// Output is batched: every operation appends to an in-memory buffer and
/// [`flush`](Console::flush) issues a single write. Consecutive puts that
/// share colors skip the redundant SGR sequence.
///
/// # Example
///
/// ```no_run
/// use rogue_term::cell::Cell;
/// use rogue_term::console::{AnsiConsole, Console};
///
/// let mut console = AnsiConsole::stdout();
/// console.put(0, 0, Cell::new('@'))?;
/// console.flush()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct AnsiConsole<W: Write> {
    out: W,
    buf: OutputBuffer,
    last_fg: Option<Color>,
    last_bg: Option<Color>,
    /// A synchronized-output batch is open.
    in_batch: bool,
    /// Anything styled has been written (so Drop must reset SGR).
    touched: bool,
}

impl AnsiConsole<io::Stdout> {
    /// A console on the process's stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> AnsiConsole<W> {
    /// Wrap an arbitrary writer.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out,
            buf: OutputBuffer::new(),
            last_fg: None,
            last_bg: None,
            in_batch: false,
            touched: false,
        }
    }

    /// The underlying writer.
    #[must_use]
    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    fn begin(&mut self) -> io::Result<()> {
        if !self.in_batch {
            ansi::begin_sync(&mut self.buf)?;
            self.in_batch = true;
        }
        self.touched = true;
        Ok(())
    }

    fn apply_colors(&mut self, fg: Color, bg: Color) -> io::Result<()> {
        let fg_changed = self.last_fg != Some(fg);
        let bg_changed = self.last_bg != Some(bg);
        match (fg_changed, bg_changed) {
            (true, true) => ansi::colors(&mut self.buf, fg, bg)?,
            (true, false) => ansi::fg(&mut self.buf, fg)?,
            (false, true) => ansi::bg(&mut self.buf, bg)?,
            (false, false) => {}
        }
        self.last_fg = Some(fg);
        self.last_bg = Some(bg);
        Ok(())
    }
}

impl<W: Write + Send> Console for AnsiConsole<W> {
    fn size(&mut self) -> io::Result<Size> {
        Ok(terminal::get_size().unwrap_or(Size::FALLBACK))
    }

    fn set_size(&mut self, size: Size) -> io::Result<()> {
        if !terminal::is_tty() {
            return Err(unsupported_resize(size));
        }
        ansi::request_resize(&mut self.out, size.cols, size.rows)?;
        self.out.flush()?;
        await_size(size, RESIZE_POLLS, RESIZE_POLL_INTERVAL, terminal::get_size)
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        self.begin()?;
        if visible {
            ansi::cursor_show(&mut self.buf)
        } else {
            ansi::cursor_hide(&mut self.buf)
        }
    }

    fn clear(&mut self, fg: Color, bg: Color) -> io::Result<()> {
        self.begin()?;
        self.last_fg = None;
        self.last_bg = None;
        self.apply_colors(fg, bg)?;
        ansi::clear_screen(&mut self.buf)
    }

    fn put(&mut self, x: u16, y: u16, cell: Cell) -> io::Result<()> {
        self.begin()?;
        ansi::cursor_to(&mut self.buf, x, y)?;
        self.apply_colors(cell.fg(), cell.bg())?;
        self.buf.write_symbol(cell.symbol());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.in_batch {
            ansi::end_sync(&mut self.buf)?;
            self.in_batch = false;
        }
        self.buf.flush_to(&mut self.out)
    }
}

impl<W: Write> Drop for AnsiConsole<W> {
    fn drop(&mut self) {
        if self.touched {
            // Best-effort: leave the terminal in its default colors.
            let _ = ansi::reset(&mut self.buf);
            let _ = self.buf.flush_to(&mut self.out);
        }
    }
}

// ─── MemoryConsole ───────────────────────────────────────────────────────────

/// One recorded console operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleOp {
    /// A successful programmatic resize.
    SetSize(Size),
    /// Cursor shown (`true`) or hidden (`false`).
    CursorVisible(bool),
    /// Whole-screen clear in the given colors.
    Clear { fg: Color, bg: Color },
    /// One physical cell write.
    Put { x: u16, y: u16, cell: Cell },
    /// End of a batch.
    Flush,
}

#[derive(Debug)]
struct MemoryState {
    size: Size,
    resizable: bool,
    ops: Vec<ConsoleOp>,
}

/// An in-memory console that records every operation.
///
/// Cloning produces another handle to the same device, so a test can keep
/// one handle while the screen owns the other, then inspect what was drawn
/// or simulate the user resizing the window.
///
/// ```
/// use rogue_term::cell::Cell;
/// use rogue_term::console::{Console, ConsoleOp, MemoryConsole};
/// use rogue_term::terminal::Size;
///
/// let recorder = MemoryConsole::new(Size::new(10, 4));
/// let mut device = recorder.clone();
/// device.put(1, 2, Cell::new('#'))?;
/// assert_eq!(recorder.ops(), vec![ConsoleOp::Put { x: 1, y: 2, cell: Cell::new('#') }]);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MemoryConsole {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryConsole {
    /// A console of the given size that accepts programmatic resizes.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self::with_resize(size, true)
    }

    /// A console whose size can only change through
    /// [`set_terminal_size`](Self::set_terminal_size), like a platform
    /// that forbids programmatic resizing.
    #[must_use]
    pub fn fixed(size: Size) -> Self {
        Self::with_resize(size, false)
    }

    fn with_resize(size: Size, resizable: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                size,
                resizable,
                ops: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Simulate the user resizing the terminal window.
    pub fn set_terminal_size(&self, size: Size) {
        self.lock().size = size;
    }

    /// The current simulated terminal size.
    #[must_use]
    pub fn terminal_size(&self) -> Size {
        self.lock().size
    }

    /// All operations recorded so far.
    #[must_use]
    pub fn ops(&self) -> Vec<ConsoleOp> {
        self.lock().ops.clone()
    }

    /// Drain and return the recorded operations.
    pub fn take_ops(&self) -> Vec<ConsoleOp> {
        std::mem::take(&mut self.lock().ops)
    }

    /// Only the cell writes, as `(x, y, cell)`.
    #[must_use]
    pub fn puts(&self) -> Vec<(u16, u16, Cell)> {
        self.lock()
            .ops
            .iter()
            .filter_map(|op| match *op {
                ConsoleOp::Put { x, y, cell } => Some((x, y, cell)),
                _ => None,
            })
            .collect()
    }

    /// Number of physical cell writes recorded.
    #[must_use]
    pub fn put_count(&self) -> usize {
        self.lock()
            .ops
            .iter()
            .filter(|op| matches!(op, ConsoleOp::Put { .. }))
            .count()
    }
}

impl Console for MemoryConsole {
    fn size(&mut self) -> io::Result<Size> {
        Ok(self.lock().size)
    }

    fn set_size(&mut self, size: Size) -> io::Result<()> {
        let mut state = self.lock();
        if !state.resizable {
            return Err(unsupported_resize(size));
        }
        state.size = size;
        state.ops.push(ConsoleOp::SetSize(size));
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        self.lock().ops.push(ConsoleOp::CursorVisible(visible));
        Ok(())
    }

    fn clear(&mut self, fg: Color, bg: Color) -> io::Result<()> {
        self.lock().ops.push(ConsoleOp::Clear { fg, bg });
        Ok(())
    }

    fn put(&mut self, x: u16, y: u16, cell: Cell) -> io::Result<()> {
        self.lock().ops.push(ConsoleOp::Put { x, y, cell });
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().ops.push(ConsoleOp::Flush);
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

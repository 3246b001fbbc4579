// SPDX-License-Identifier: MIT
//
// Screen — the shared, lock-guarded state behind double buffering.
//
// A Screen owns two frame buffers and the console they are shown on:
//
//   displayed — what the terminal is showing right now
//   pending   — where writes for the next frame accumulate
//
// plus the last known window geometry and the default colors. All of it
// lives behind one Mutex. Every public operation takes the lock for its
// whole duration, including the multi-cell diff in `flush`, so concurrent
// callers can never observe a half-applied frame. Critical sections are
// bounded by buffer size and the only blocking I/O is the terminal itself.
//
// There is no global instance. Build one Screen, then share it by
// reference or `Arc` with whatever threads need to draw.

use std::cmp;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, warn};

use crate::buffer::FrameBuffer;
use crate::cell::{Cell, DEFAULT_BG, DEFAULT_FG};
use crate::color::Color;
use crate::console::Console;
use crate::diff::RenderStats;
use crate::error::Result;
use crate::terminal::Size;

// ─── ScreenConfig ────────────────────────────────────────────────────────────

/// Parameters for (re)initializing a [`Screen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenConfig {
    /// Logical buffer width in columns.
    pub width: i32,
    /// Logical buffer height in rows.
    pub height: i32,
    /// Default background, used for clears and erased cells.
    pub background: Color,
    /// Default foreground, used for clears and erased cells.
    pub foreground: Color,
    /// Whether the terminal cursor stays visible.
    pub show_cursor: bool,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            background: DEFAULT_BG,
            foreground: DEFAULT_FG,
            show_cursor: false,
        }
    }
}

// ─── ScreenState ─────────────────────────────────────────────────────────────

/// Everything the lock guards. The render algorithms in `diff` operate
/// on this directly, already holding the lock.
pub(crate) struct ScreenState<C> {
    pub(crate) console: C,
    pub(crate) displayed: FrameBuffer,
    pub(crate) pending: FrameBuffer,
    pub(crate) window: Size,
    pub(crate) foreground: Color,
    pub(crate) background: Color,
    pub(crate) show_cursor: bool,
}

/// `requested` clamped into the range a terminal dimension can take.
fn to_extent(requested: i32) -> u16 {
    u16::try_from(requested).unwrap_or(if requested < 0 { 0 } else { u16::MAX })
}

impl<C: Console> ScreenState<C> {
    fn new(console: C, config: &ScreenConfig) -> Result<Self> {
        let displayed = FrameBuffer::new(config.width, config.height)?;
        let mut state = Self {
            console,
            pending: displayed.blank_like(),
            displayed,
            window: Size::new(0, 0),
            foreground: config.foreground,
            background: config.background,
            show_cursor: config.show_cursor,
        };
        state.initialize(config)?;
        Ok(state)
    }

    /// Replace all state: fresh buffers, new geometry, new defaults, and a
    /// cleared terminal.
    ///
    /// All console I/O happens before any field is assigned, so on error
    /// the screen keeps its previous buffers, window and colors.
    fn initialize(&mut self, config: &ScreenConfig) -> Result<()> {
        let displayed = FrameBuffer::new(config.width, config.height)?;

        let actual = self.console.size()?;
        let wanted = Size::new(
            cmp::max(to_extent(config.width), actual.cols),
            cmp::max(to_extent(config.height), actual.rows),
        );
        let window = match self.resize_console(actual, wanted) {
            Ok(()) => wanted,
            Err(e) if e.kind() == std::io::ErrorKind::Unsupported => {
                warn!(
                    "cannot resize terminal to {}x{} ({e}); using {}x{}",
                    wanted.cols, wanted.rows, actual.cols, actual.rows
                );
                self.console.size()?
            }
            Err(e) => return Err(e.into()),
        };

        self.console.set_cursor_visible(config.show_cursor)?;
        self.console.clear(config.foreground, config.background)?;
        self.console.flush()?;

        self.pending = displayed.blank_like();
        self.displayed = displayed;
        self.window = window;
        self.foreground = config.foreground;
        self.background = config.background;
        self.show_cursor = config.show_cursor;

        debug!(
            "screen initialized: buffer {}x{}, window {}x{}, {} on {}",
            config.width,
            config.height,
            window.cols,
            window.rows,
            config.foreground,
            config.background
        );
        Ok(())
    }

    fn resize_console(&mut self, actual: Size, wanted: Size) -> std::io::Result<()> {
        if actual == wanted {
            return Ok(());
        }
        self.console.set_size(wanted)
    }

    /// Apply cursor visibility and default colors, then wipe the terminal.
    pub(crate) fn clear_console(&mut self) -> Result<()> {
        self.console.set_cursor_visible(self.show_cursor)?;
        self.console.clear(self.foreground, self.background)?;
        Ok(())
    }
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// A double-buffered terminal screen.
///
/// Writes go to a pending buffer; [`flush`](Self::flush) diffs it against
/// what is displayed and sends only the changed cells to the console.
///
/// # Example
///
/// ```
/// use rogue_term::color::Color;
/// use rogue_term::console::MemoryConsole;
/// use rogue_term::screen::Screen;
/// use rogue_term::terminal::Size;
///
/// let recorder = MemoryConsole::new(Size::new(80, 24));
/// let screen = Screen::new(recorder.clone())?;
/// screen.initialize(5, 3, Color::Black, Color::White, false)?;
/// recorder.take_ops();
///
/// screen.write_char_colored(2, 1, 'X', Color::Red, Color::Black)?;
/// let stats = screen.flush()?;
/// assert_eq!(stats.cells_written, 1);
/// assert_eq!(recorder.put_count(), 1);
/// # Ok::<(), rogue_term::Error>(())
/// ```
pub struct Screen<C: Console> {
    state: Mutex<ScreenState<C>>,
}

impl<C: Console> Screen<C> {
    /// Take over `console`, sizing the buffers to its current viewport with
    /// the default colors (white on black, cursor hidden). The terminal is
    /// cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the console reports a zero-sized viewport or
    /// fails to clear.
    pub fn new(mut console: C) -> Result<Self> {
        let size = console.size()?;
        let config = ScreenConfig {
            width: i32::from(size.cols),
            height: i32::from(size.rows),
            ..ScreenConfig::default()
        };
        Self::with_config(console, &config)
    }

    /// Take over `console` with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`](crate::Error::InvalidDimension)
    /// for non-positive dimensions, or an I/O error from the console.
    pub fn with_config(console: C, config: &ScreenConfig) -> Result<Self> {
        Ok(Self {
            state: Mutex::new(ScreenState::new(console, config)?),
        })
    }

    /// The state is always structurally valid between statements, so a
    /// panic on another thread does not make it unusable.
    fn lock(&self) -> MutexGuard<'_, ScreenState<C>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Reset everything: new empty buffers of `width × height`, new default
    /// colors and cursor setting, and a window of at least the buffer size.
    ///
    /// The terminal is asked to grow to the buffer size. Where the platform
    /// refuses, the terminal's actual size is adopted instead. The terminal
    /// is cleared in the new colors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`](crate::Error::InvalidDimension)
    /// for non-positive dimensions (the screen is left untouched), or an
    /// I/O error from the console.
    pub fn initialize(
        &self,
        width: i32,
        height: i32,
        background: Color,
        foreground: Color,
        show_cursor: bool,
    ) -> Result<()> {
        self.initialize_with(&ScreenConfig {
            width,
            height,
            background,
            foreground,
            show_cursor,
        })
    }

    /// [`initialize`](Self::initialize) from a config struct.
    ///
    /// # Errors
    ///
    /// As for [`initialize`](Self::initialize).
    pub fn initialize_with(&self, config: &ScreenConfig) -> Result<()> {
        self.lock().initialize(config)
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Last recorded terminal width.
    #[must_use]
    pub fn window_width(&self) -> u16 {
        self.lock().window.cols
    }

    /// Last recorded terminal height.
    #[must_use]
    pub fn window_height(&self) -> u16 {
        self.lock().window.rows
    }

    /// Last recorded terminal size, read as one snapshot.
    #[must_use]
    pub fn window_size(&self) -> Size {
        self.lock().window
    }

    /// Logical buffer width.
    #[must_use]
    pub fn buffer_width(&self) -> i32 {
        self.lock().displayed.width()
    }

    /// Logical buffer height.
    #[must_use]
    pub fn buffer_height(&self) -> i32 {
        self.lock().displayed.height()
    }

    #[must_use]
    pub fn foreground_color(&self) -> Color {
        self.lock().foreground
    }

    #[must_use]
    pub fn background_color(&self) -> Color {
        self.lock().background
    }

    #[must_use]
    pub fn show_cursor(&self) -> bool {
        self.lock().show_cursor
    }

    /// Change cursor visibility. Applied at the next terminal clear
    /// ([`clear`](Self::clear), [`redraw`](Self::redraw) or a re-initialize).
    pub fn set_show_cursor(&self, show: bool) {
        self.lock().show_cursor = show;
    }

    /// The cell currently displayed at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`](crate::Error::OutOfBounds) outside
    /// the buffer.
    pub fn displayed(&self, x: i32, y: i32) -> Result<Option<Cell>> {
        self.lock().displayed.get(x, y)
    }

    /// The cell waiting at `(x, y)` for the next flush.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`](crate::Error::OutOfBounds) outside
    /// the buffer.
    pub fn pending(&self, x: i32, y: i32) -> Result<Option<Cell>> {
        self.lock().pending.get(x, y)
    }

    // ─── Writes ──────────────────────────────────────────────────────────

    /// Store `cell` at `(x, y)` in the pending buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`](crate::Error::OutOfBounds) outside
    /// the buffer.
    pub fn write(&self, x: i32, y: i32, cell: Cell) -> Result<()> {
        self.lock().pending.set(x, y, cell)
    }

    /// Write a character in the screen's default colors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`](crate::Error::OutOfBounds) outside
    /// the buffer.
    pub fn write_char(&self, x: i32, y: i32, ch: char) -> Result<()> {
        let mut state = self.lock();
        let cell = Cell::styled(ch, state.foreground, state.background);
        state.pending.set(x, y, cell)
    }

    /// Write a character in explicit colors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`](crate::Error::OutOfBounds) outside
    /// the buffer.
    pub fn write_char_colored(&self, x: i32, y: i32, ch: char, fg: Color, bg: Color) -> Result<()> {
        self.write(x, y, Cell::styled(ch, fg, bg))
    }

    /// Write `text` left to right from `(x, y)` in the default colors.
    ///
    /// # Errors
    ///
    /// As for [`write_str_colored`](Self::write_str_colored).
    pub fn write_str(&self, x: i32, y: i32, text: &str) -> Result<()> {
        let mut state = self.lock();
        let (fg, bg) = (state.foreground, state.background);
        write_run(&mut state.pending, x, y, text, fg, bg)
    }

    /// Write `text` left to right from `(x, y)`, one column per character.
    ///
    /// The whole string is written under one lock acquisition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`](crate::Error::OutOfBounds) at the
    /// first character that falls outside the buffer. Characters before it
    /// stay written.
    pub fn write_str_colored(
        &self,
        x: i32,
        y: i32,
        text: &str,
        fg: Color,
        bg: Color,
    ) -> Result<()> {
        write_run(&mut self.lock().pending, x, y, text, fg, bg)
    }

    /// Store many cells under one lock acquisition, in iteration order.
    ///
    /// A whole frame written this way can never be split by a concurrent
    /// [`flush`](Self::flush).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`](crate::Error::OutOfBounds) at the
    /// first cell outside the buffer. Cells before it stay written.
    pub fn write_cells<I>(&self, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = (i32, i32, Cell)>,
    {
        let mut state = self.lock();
        for (x, y, cell) in cells {
            state.pending.set(x, y, cell)?;
        }
        Ok(())
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Show the pending frame: diff it against the displayed frame and
    /// write only the cells that changed. If the terminal was resized since
    /// the last frame, repaint the displayed frame in full instead.
    ///
    /// # Errors
    ///
    /// Returns an I/O error from the console.
    pub fn flush(&self) -> Result<RenderStats> {
        self.lock().flush()
    }

    /// Clear the terminal and repaint every displayed cell, ignoring the
    /// diff. Picks up the terminal's current size first.
    ///
    /// # Errors
    ///
    /// Returns an I/O error from the console.
    pub fn redraw(&self) -> Result<RenderStats> {
        self.lock().redraw()
    }

    /// Drop both buffers and clear the terminal. Geometry and default
    /// colors are kept.
    ///
    /// # Errors
    ///
    /// Returns an I/O error from the console.
    pub fn clear(&self) -> Result<()> {
        self.lock().clear()
    }
}

fn write_run(
    buffer: &mut FrameBuffer,
    x: i32,
    y: i32,
    text: &str,
    fg: Color,
    bg: Color,
) -> Result<()> {
    let mut col = x;
    for ch in text.chars() {
        buffer.set(col, y, Cell::styled(ch, fg, bg))?;
        col = col.saturating_add(1);
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

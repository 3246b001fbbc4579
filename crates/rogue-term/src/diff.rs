// SPDX-License-Identifier: MIT
//
// Differential rendering — flush, redraw and clear.
//
// Terminal writes are the expensive, flicker-causing operation, so a flush
// compares the pending frame against the displayed one cell by cell and
// sends only the differences. The number of physical writes is the number
// of changed cells, not the screen area.
//
// Per flush, with the screen lock held:
//
//   1. If the terminal size drifted since the last frame, the diff can no
//      longer be trusted. Repaint the displayed frame in full and stop.
//   2. Walk the visible intersection of buffer and window in row-major
//      order. Cells outside it are kept but not drawn this frame.
//   3. For each slot:
//        pending empty, displayed empty  → nothing to do
//        pending empty, displayed drawn  → erase with a space (see `erase_cell`)
//        pending differs from displayed  → write it
//        pending equals displayed        → skip
//   4. Promote pending to displayed and start a fresh pending buffer.
//
// Step 3's erase rule means a frame that writes nothing clears everything
// the previous frame drew. Callers repaint the full scene every frame.

use std::cmp;
use std::mem;

use log::{debug, trace};

use crate::cell::Cell;
use crate::color::Color;
use crate::console::Console;
use crate::error::Result;
use crate::screen::ScreenState;

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// Statistics from a render pass, for profiling and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Physical cell writes issued to the console.
    pub cells_written: usize,
    /// Visible slots examined that needed no write.
    pub cells_skipped: usize,
    /// The pass was a full repaint rather than a diff.
    pub full_repaint: bool,
}

impl RenderStats {
    /// Total visible slots processed (written + skipped).
    #[inline]
    #[must_use]
    pub const fn total_cells(&self) -> usize {
        self.cells_written + self.cells_skipped
    }
}

/// The space written over a drawn cell that the new frame left empty. Its
/// colors are the screen defaults with the roles exchanged: the default
/// background becomes the symbol color and the default foreground the
/// cell background.
#[inline]
#[must_use]
pub const fn erase_cell(foreground: Color, background: Color) -> Cell {
    Cell::blank(background, foreground)
}

// Visible coordinates never exceed the window size, which is a u16.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn to_screen(v: i32) -> u16 {
    v as u16
}

// ─── Render Algorithms ───────────────────────────────────────────────────────

impl<C: Console> ScreenState<C> {
    /// Width and height of the buffer/window intersection.
    fn visible(&self) -> (i32, i32) {
        (
            cmp::min(self.displayed.width(), i32::from(self.window.cols)),
            cmp::min(self.displayed.height(), i32::from(self.window.rows)),
        )
    }

    /// Repaint in full if the terminal no longer matches the recorded
    /// window. Returns the repaint's stats when one happened.
    fn handle_resize(&mut self) -> Result<Option<RenderStats>> {
        let live = self.console.size()?;
        if live == self.window {
            return Ok(None);
        }
        debug!(
            "terminal resized {}x{} -> {}x{}; repainting",
            self.window.cols, self.window.rows, live.cols, live.rows
        );
        self.redraw().map(Some)
    }

    pub(crate) fn flush(&mut self) -> Result<RenderStats> {
        if let Some(stats) = self.handle_resize()? {
            return Ok(stats);
        }

        let (width, height) = self.visible();
        let mut stats = RenderStats::default();

        for y in 0..height {
            for x in 0..width {
                let shown = self.displayed.slot(x, y);
                let next = match (self.pending.slot(x, y), shown) {
                    (None, None) => {
                        stats.cells_skipped += 1;
                        continue;
                    }
                    (None, Some(_)) => erase_cell(self.foreground, self.background),
                    (Some(cell), _) => cell,
                };

                if shown == Some(next) {
                    stats.cells_skipped += 1;
                } else {
                    self.console.put(to_screen(x), to_screen(y), next)?;
                    stats.cells_written += 1;
                }
            }
        }
        self.console.flush()?;

        let fresh = self.pending.blank_like();
        self.displayed = mem::replace(&mut self.pending, fresh);

        trace!(
            "flush: {} written, {} skipped",
            stats.cells_written, stats.cells_skipped
        );
        Ok(stats)
    }

    pub(crate) fn redraw(&mut self) -> Result<RenderStats> {
        self.window = self.console.size()?;
        self.clear_console()?;

        let (width, height) = self.visible();
        let mut stats = RenderStats {
            full_repaint: true,
            ..RenderStats::default()
        };

        for y in 0..height {
            for x in 0..width {
                if let Some(cell) = self.displayed.slot(x, y) {
                    self.console.put(to_screen(x), to_screen(y), cell)?;
                    stats.cells_written += 1;
                } else {
                    stats.cells_skipped += 1;
                }
            }
        }
        self.console.flush()?;

        trace!("redraw: {} written", stats.cells_written);
        Ok(stats)
    }

    pub(crate) fn clear(&mut self) -> Result<()> {
        self.displayed = self.displayed.blank_like();
        self.pending = self.pending.blank_like();
        self.clear_console()?;
        self.console.flush()?;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::erase_cell;
    use crate::cell::Cell;
    use crate::color::Color;
    use crate::console::{ConsoleOp, MemoryConsole};
    use crate::screen::Screen;
    use crate::terminal::Size;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    /// A 5×3 screen (black background, white foreground) on an 80×24
    /// terminal, with the setup operations already drained.
    fn small_screen() -> (Screen<MemoryConsole>, MemoryConsole) {
        sized_screen(5, 3, Size::new(80, 24))
    }

    fn sized_screen(width: i32, height: i32, term: Size) -> (Screen<MemoryConsole>, MemoryConsole) {
        let recorder = MemoryConsole::new(term);
        let screen = Screen::new(recorder.clone()).unwrap();
        screen
            .initialize(width, height, Color::Black, Color::White, false)
            .unwrap();
        recorder.take_ops();
        (screen, recorder)
    }

    fn erased() -> Cell {
        Cell::styled(' ', Color::Black, Color::White)
    }

    // ── First Frame ─────────────────────────────────────────────────────

    #[test]
    fn first_frame_writes_only_the_written_cell() {
        let (screen, recorder) = small_screen();
        screen
            .write_char_colored(2, 1, 'X', Color::Red, Color::Black)
            .unwrap();

        let stats = screen.flush().unwrap();

        assert_eq!(
            recorder.ops(),
            vec![
                ConsoleOp::Put {
                    x: 2,
                    y: 1,
                    cell: Cell::styled('X', Color::Red, Color::Black)
                },
                ConsoleOp::Flush,
            ]
        );
        assert_eq!(stats.cells_written, 1);
        assert_eq!(stats.cells_skipped, 14);
        assert!(!stats.full_repaint);
    }

    #[test]
    fn empty_first_frame_writes_nothing() {
        let (screen, recorder) = small_screen();
        let stats = screen.flush().unwrap();
        assert_eq!(stats.cells_written, 0);
        assert_eq!(stats.total_cells(), 15);
        assert_eq!(recorder.ops(), vec![ConsoleOp::Flush]);
    }

    // ── Clear on Idle ───────────────────────────────────────────────────

    #[test]
    fn erase_cell_exchanges_default_roles() {
        assert_eq!(
            erase_cell(Color::White, Color::Black),
            Cell::styled(' ', Color::Black, Color::White)
        );
    }

    #[test]
    fn idle_frame_erases_previous_frame() {
        let (screen, recorder) = small_screen();
        screen
            .write_char_colored(2, 1, 'X', Color::Red, Color::Black)
            .unwrap();
        screen.flush().unwrap();
        recorder.take_ops();

        let stats = screen.flush().unwrap();

        assert_eq!(recorder.puts(), vec![(2, 1, erased())]);
        assert_eq!(stats.cells_written, 1);
        assert_eq!(screen.displayed(2, 1).unwrap(), None);
    }

    #[test]
    fn third_idle_frame_is_silent() {
        let (screen, recorder) = small_screen();
        screen.write_str(0, 0, "abc").unwrap();
        screen.flush().unwrap();
        screen.flush().unwrap();
        recorder.take_ops();

        let stats = screen.flush().unwrap();

        assert_eq!(stats.cells_written, 0);
        assert_eq!(recorder.put_count(), 0);
    }

    #[test]
    fn idle_erase_uses_current_defaults() {
        let recorder = MemoryConsole::new(Size::new(80, 24));
        let screen = Screen::new(recorder.clone()).unwrap();
        screen
            .initialize(5, 3, Color::DarkBlue, Color::Yellow, false)
            .unwrap();
        screen.write_char(0, 0, 'z').unwrap();
        screen.flush().unwrap();
        recorder.take_ops();

        screen.flush().unwrap();

        assert_eq!(
            recorder.puts(),
            vec![(0, 0, Cell::styled(' ', Color::DarkBlue, Color::Yellow))]
        );
    }

    // ── Diff Minimality ─────────────────────────────────────────────────

    #[test]
    fn repainting_the_same_frame_writes_nothing() {
        let (screen, recorder) = small_screen();
        for frame in 0..3 {
            screen.write_str(0, 0, "#####").unwrap();
            screen.write_str(0, 2, "#...#").unwrap();
            let stats = screen.flush().unwrap();
            if frame > 0 {
                assert_eq!(stats.cells_written, 0);
            }
        }
        recorder.take_ops();
        screen.write_str(0, 0, "#####").unwrap();
        screen.write_str(0, 2, "#...#").unwrap();
        screen.flush().unwrap();
        assert_eq!(recorder.put_count(), 0);
    }

    #[test]
    fn only_changed_cells_are_written() {
        let (screen, recorder) = small_screen();
        screen.write_str(0, 1, "@....").unwrap();
        screen.flush().unwrap();
        recorder.take_ops();

        // The player moves one step right.
        screen.write_str(0, 1, ".@...").unwrap();
        let stats = screen.flush().unwrap();

        assert_eq!(
            recorder.puts(),
            vec![(0, 1, Cell::new('.')), (1, 1, Cell::new('@'))]
        );
        assert_eq!(stats.cells_written, 2);
    }

    #[test]
    fn color_only_change_is_a_change() {
        let (screen, recorder) = small_screen();
        screen.write_char_colored(0, 0, 'E', Color::Red, Color::Black).unwrap();
        screen.flush().unwrap();
        recorder.take_ops();

        screen.write_char_colored(0, 0, 'E', Color::Green, Color::Black).unwrap();
        screen.flush().unwrap();

        assert_eq!(
            recorder.puts(),
            vec![(0, 0, Cell::styled('E', Color::Green, Color::Black))]
        );
    }

    #[test]
    fn explicit_space_replaces_drawn_cell() {
        let (screen, recorder) = small_screen();
        screen.write_char(4, 2, 'q').unwrap();
        screen.flush().unwrap();
        recorder.take_ops();

        screen.write(4, 2, Cell::styled(' ', Color::Gray, Color::Blue)).unwrap();
        screen.flush().unwrap();

        assert_eq!(
            recorder.puts(),
            vec![(4, 2, Cell::styled(' ', Color::Gray, Color::Blue))]
        );
        assert_eq!(
            screen.displayed(4, 2).unwrap(),
            Some(Cell::styled(' ', Color::Gray, Color::Blue))
        );
    }

    #[test]
    fn writes_are_row_major() {
        let (screen, recorder) = small_screen();
        screen.write_char(4, 2, 'c').unwrap();
        screen.write_char(0, 1, 'b').unwrap();
        screen.write_char(3, 0, 'a').unwrap();
        screen.flush().unwrap();

        let order: Vec<_> = recorder.puts().iter().map(|&(x, y, _)| (x, y)).collect();
        assert_eq!(order, vec![(3, 0), (0, 1), (4, 2)]);
    }

    // ── Buffer Swap ─────────────────────────────────────────────────────

    #[test]
    fn flush_promotes_pending_and_starts_fresh() {
        let (screen, _) = small_screen();
        screen.write_char(1, 1, 'k').unwrap();
        screen.flush().unwrap();

        assert_eq!(screen.displayed(1, 1).unwrap(), Some(Cell::new('k')));
        assert_eq!(screen.pending(1, 1).unwrap(), None);
    }

    // ── Visible Region ──────────────────────────────────────────────────

    #[test]
    fn cells_outside_window_are_not_drawn() {
        let recorder = MemoryConsole::fixed(Size::new(4, 2));
        let screen = Screen::new(recorder.clone()).unwrap();
        screen.initialize(10, 5, Color::Black, Color::White, false).unwrap();
        recorder.take_ops();

        screen.write_char(1, 1, 'i').unwrap();
        screen.write_char(8, 4, 'o').unwrap();
        let stats = screen.flush().unwrap();

        assert_eq!(recorder.puts(), vec![(1, 1, Cell::new('i'))]);
        assert_eq!(stats.total_cells(), 8);
        // Promoted all the same.
        assert_eq!(screen.displayed(8, 4).unwrap(), Some(Cell::new('o')));
    }

    #[test]
    fn window_larger_than_buffer_is_bounded_by_buffer() {
        let (screen, _) = sized_screen(3, 2, Size::new(80, 24));
        let stats = screen.flush().unwrap();
        assert_eq!(stats.total_cells(), 6);
    }

    // ── Resize ──────────────────────────────────────────────────────────

    #[test]
    fn resize_forces_full_repaint() {
        let (screen, recorder) = sized_screen(6, 3, Size::new(6, 3));
        screen.write_str(0, 0, "ab").unwrap();
        screen.write_char(5, 2, 'z').unwrap();
        screen.flush().unwrap();
        recorder.take_ops();

        recorder.set_terminal_size(Size::new(20, 10));
        let stats = screen.flush().unwrap();

        assert!(stats.full_repaint);
        assert_eq!(stats.cells_written, 3);
        assert_eq!(
            recorder.ops(),
            vec![
                ConsoleOp::CursorVisible(false),
                ConsoleOp::Clear {
                    fg: Color::White,
                    bg: Color::Black
                },
                ConsoleOp::Put {
                    x: 0,
                    y: 0,
                    cell: Cell::new('a')
                },
                ConsoleOp::Put {
                    x: 1,
                    y: 0,
                    cell: Cell::new('b')
                },
                ConsoleOp::Put {
                    x: 5,
                    y: 2,
                    cell: Cell::new('z')
                },
                ConsoleOp::Flush,
            ]
        );
        assert_eq!(screen.window_size(), Size::new(20, 10));
    }

    #[test]
    fn resize_repaint_ignores_diff_state() {
        let (screen, recorder) = sized_screen(6, 3, Size::new(6, 3));
        screen.write_str(0, 1, "same").unwrap();
        screen.flush().unwrap();
        recorder.take_ops();

        // Identical frame queued, but the window changed underneath it.
        screen.write_str(0, 1, "same").unwrap();
        recorder.set_terminal_size(Size::new(7, 3));
        let stats = screen.flush().unwrap();

        assert_eq!(stats.cells_written, 4);
        assert_eq!(recorder.put_count(), 4);
    }

    #[test]
    fn resize_flush_keeps_pending_for_next_frame() {
        let (screen, recorder) = sized_screen(6, 3, Size::new(6, 3));
        screen.write_char(0, 0, 'a').unwrap();
        screen.flush().unwrap();

        screen.write_char(3, 1, 'n').unwrap();
        recorder.set_terminal_size(Size::new(8, 4));
        screen.flush().unwrap();
        assert_eq!(screen.pending(3, 1).unwrap(), Some(Cell::new('n')));
        recorder.take_ops();

        // Next flush diffs normally: erase 'a', draw 'n'.
        let stats = screen.flush().unwrap();
        assert!(!stats.full_repaint);
        assert_eq!(
            recorder.puts(),
            vec![(0, 0, erased()), (3, 1, Cell::new('n'))]
        );
    }

    #[test]
    fn shrinking_window_clips_repaint() {
        let (screen, recorder) = sized_screen(6, 3, Size::new(6, 3));
        screen.write_char(0, 0, 'a').unwrap();
        screen.write_char(5, 2, 'z').unwrap();
        screen.flush().unwrap();
        recorder.take_ops();

        recorder.set_terminal_size(Size::new(3, 2));
        screen.flush().unwrap();

        assert_eq!(recorder.puts(), vec![(0, 0, Cell::new('a'))]);
    }

    #[test]
    fn unchanged_size_does_not_repaint() {
        let (screen, recorder) = small_screen();
        screen.write_char(0, 0, 'a').unwrap();
        screen.flush().unwrap();
        recorder.take_ops();
        screen.write_char(0, 0, 'a').unwrap();
        let stats = screen.flush().unwrap();
        assert!(!stats.full_repaint);
        assert!(!recorder
            .ops()
            .iter()
            .any(|op| matches!(op, ConsoleOp::Clear { .. })));
    }

    // ── Redraw ──────────────────────────────────────────────────────────

    #[test]
    fn redraw_repaints_displayed_not_pending() {
        let (screen, recorder) = small_screen();
        screen.write_char(1, 0, 'd').unwrap();
        screen.flush().unwrap();
        screen.write_char(2, 0, 'p').unwrap();
        recorder.take_ops();

        let stats = screen.redraw().unwrap();

        assert!(stats.full_repaint);
        assert_eq!(recorder.puts(), vec![(1, 0, Cell::new('d'))]);
        assert_eq!(screen.pending(2, 0).unwrap(), Some(Cell::new('p')));
        assert_eq!(screen.displayed(1, 0).unwrap(), Some(Cell::new('d')));
    }

    #[test]
    fn redraw_clears_first() {
        let (screen, recorder) = small_screen();
        screen.redraw().unwrap();
        assert_eq!(
            recorder.ops(),
            vec![
                ConsoleOp::CursorVisible(false),
                ConsoleOp::Clear {
                    fg: Color::White,
                    bg: Color::Black
                },
                ConsoleOp::Flush,
            ]
        );
    }

    #[test]
    fn redraw_refreshes_window() {
        let (screen, recorder) = small_screen();
        recorder.set_terminal_size(Size::new(50, 20));
        screen.redraw().unwrap();
        assert_eq!(screen.window_size(), Size::new(50, 20));
    }

    // ── Clear ───────────────────────────────────────────────────────────

    #[test]
    fn clear_drops_both_buffers() {
        let (screen, recorder) = small_screen();
        screen.write_char(0, 0, 'a').unwrap();
        screen.flush().unwrap();
        screen.write_char(1, 0, 'b').unwrap();
        recorder.take_ops();

        screen.clear().unwrap();

        assert_eq!(screen.displayed(0, 0).unwrap(), None);
        assert_eq!(screen.pending(1, 0).unwrap(), None);
        assert_eq!(
            recorder.ops(),
            vec![
                ConsoleOp::CursorVisible(false),
                ConsoleOp::Clear {
                    fg: Color::White,
                    bg: Color::Black
                },
                ConsoleOp::Flush,
            ]
        );
        // Nothing displayed, nothing pending: the next flush is silent.
        recorder.take_ops();
        screen.flush().unwrap();
        assert_eq!(recorder.put_count(), 0);
    }

    #[test]
    fn clear_keeps_geometry_and_colors() {
        let (screen, _) = small_screen();
        screen.clear().unwrap();
        assert_eq!(screen.buffer_width(), 5);
        assert_eq!(screen.buffer_height(), 3);
        assert_eq!(screen.window_size(), Size::new(80, 24));
        assert_eq!(screen.background_color(), Color::Black);
        assert_eq!(screen.foreground_color(), Color::White);
    }

    // ── Properties ──────────────────────────────────────────────────────

    const W: i32 = 12;
    const H: i32 = 6;

    proptest! {
        #[test]
        fn flush_writes_exactly_the_changed_cells(
            changed in proptest::collection::hash_set((0..W, 0..H), 0..30)
        ) {
            let (screen, recorder) = sized_screen(W, H, Size::new(80, 24));
            let paint = |screen: &Screen<MemoryConsole>, marked: &dyn Fn(i32, i32) -> bool| {
                for y in 0..H {
                    for x in 0..W {
                        let ch = if marked(x, y) { '#' } else { '.' };
                        screen.write_char(x, y, ch).unwrap();
                    }
                }
            };
            paint(&screen, &|_, _| false);
            screen.flush().unwrap();
            recorder.take_ops();

            paint(&screen, &|x, y| changed.contains(&(x, y)));
            let stats = screen.flush().unwrap();

            prop_assert_eq!(stats.cells_written, changed.len());
            prop_assert_eq!(recorder.put_count(), changed.len());
        }

        #[test]
        fn written_cells_are_displayed_after_flush(
            x in 0..W,
            y in 0..H,
            symbol in proptest::char::range('!', '~'),
            fg in 0usize..16,
            bg in 0usize..16,
        ) {
            let (screen, _) = sized_screen(W, H, Size::new(80, 24));
            let cell = Cell::styled(symbol, Color::ALL[fg], Color::ALL[bg]);
            screen.write(x, y, cell).unwrap();
            screen.flush().unwrap();
            prop_assert_eq!(screen.displayed(x, y).unwrap(), Some(cell));
        }
    }
}

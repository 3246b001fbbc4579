// SPDX-License-Identifier: MIT
//
// rogue-term — Double-buffered terminal renderer for rogue.
//
// Callers draw a frame into a pending buffer of colored character cells,
// then flush. The flush compares the pending frame with what the terminal
// currently shows and issues only the writes that differ. Cells left empty
// in a frame are erased, a terminal resize forces a full repaint, and all
// screen state sits behind one lock so any thread may draw.
//
// The device itself is behind the `Console` trait: `AnsiConsole` drives a
// real terminal with batched escape sequences, `MemoryConsole` records
// operations for tests.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod console;
pub mod diff;
pub mod error;
pub mod output;
pub mod screen;
pub mod terminal;

pub use cell::Cell;
pub use color::Color;
pub use console::{AnsiConsole, Console, ConsoleOp, MemoryConsole};
pub use diff::RenderStats;
pub use error::{Error, Result};
pub use screen::{Screen, ScreenConfig};
pub use terminal::Size;

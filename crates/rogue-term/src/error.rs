// SPDX-License-Identifier: MIT
//
// Error types for the renderer.
//
// Dimension and bounds errors are caller contract violations: they are
// reported immediately and never retried. `Io` covers the one physical
// boundary, the terminal device.

use std::io;

use thiserror::Error;

/// Renderer error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A buffer was requested with a non-positive width or height.
    #[error("invalid buffer dimensions {width}x{height}: both must be positive")]
    InvalidDimension { width: i32, height: i32 },

    /// A coordinate fell outside the buffer.
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} buffer")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    /// The terminal device failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for renderer operations.
pub type Result<T> = std::result::Result<T, Error>;

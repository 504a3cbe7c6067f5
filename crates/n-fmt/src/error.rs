// SPDX-License-Identifier: MIT
//
// Error taxonomy.
//
// Three kinds of failure exist and nothing else: a manipulator built from a
// value the terminal cannot represent (rejected at construction, never
// clamped), a write the underlying stream refused (passed through
// unchanged), and bad configuration. Cache operations themselves are total.

use std::io;

use thiserror::Error;

/// Errors returned by manipulator construction and application.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("color index {index} is outside 0..=255 (use -1 for the terminal default)")]
    ColorIndexOutOfRange { index: i32 },

    #[error("cursor position ({row}, {col}) is invalid: rows and columns start at 1")]
    PositionOutOfRange { row: i16, col: i16 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("the global formatting session is already initialized")]
    AlreadyInitialized,
}

/// Errors produced while building a [`FormatConfig`](crate::config::FormatConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("cache capacity must be greater than zero")]
    ZeroCapacity,

    #[error("{var}={value:?} is not a valid cache capacity")]
    InvalidNumber { var: &'static str, value: String },
}

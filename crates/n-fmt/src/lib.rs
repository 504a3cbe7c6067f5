// SPDX-License-Identifier: MIT
//
// n-fmt — stateful terminal formatting.
//
// Colors, attributes, cursor position and visibility are requested through
// small manipulator values. Each request is checked against a bounded,
// per-stream cache of what the terminal already shows; a request that would
// change nothing writes nothing. Writes that make other knowledge stale
// (moving the cursor, switching color depth, resetting attributes) forget
// that knowledge, so a skipped request is always one the terminal agrees
// with.
//
//   use n_fmt::{bold, fg};
//
//   let mut out = std::io::stdout().lock();
//   fg(196)?.apply(&mut out)?;
//   bold(true).apply(&mut out)?;
//   bold(true).apply(&mut out)?; // nothing written
//
// Byte encoding lives in n-term; this crate decides whether to send.

pub mod cache;
pub mod category;
pub mod config;
pub mod error;
pub mod invalidation;
pub mod manipulator;
pub mod session;
pub mod stream;

pub use cache::StateCache;
pub use category::{Category, CategorySet, StateValue};
pub use config::FormatConfig;
pub use error::{ConfigError, FormatError};
pub use manipulator::{
    Emission, Manipulator, bg, bg_default, bg_rgb, bold, clear, fg, fg_default, fg_rgb, hide,
    italic, pos, rpos, underline,
};
pub use n_term::color::Color;
pub use session::{Session, init_global};
pub use stream::{FormatStream, StreamId, Tracked};

// SPDX-License-Identifier: MIT
//
// Manipulators — the values callers compose with an output stream.
//
// A manipulator is a plain tagged value: which category it belongs to and
// what state it asks for. It knows how to encode itself, but it does not
// decide whether to. Applying one hands it to a `Session`, which checks the
// cache, writes on a miss, and keeps the cache coherent.
//
// Composition is ordinary sequential code:
//
//   fg(5)?.apply(&mut out)?;
//   bold(true).apply(&mut out)?;
//   write!(out, "hello")?;
//   clear().apply(&mut out)?;
//
// Construction validates input. A palette index outside 0..=255 (other than
// -1, the terminal default) and a cursor position below 1 are rejected
// immediately instead of being clamped into something the caller did not
// ask for.

use std::io::{self, Write};

use n_term::ansi::{self, Attribute};
use n_term::color::{Channel, Color};

use crate::category::{Category, StateValue};
use crate::error::FormatError;
use crate::invalidation::Trigger;
use crate::session::Session;
use crate::stream::FormatStream;

// ─── Manipulator ─────────────────────────────────────────────────────────────

/// One formatting request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Manipulator {
    /// Foreground color at any depth, or the terminal default.
    Fg(Color),
    /// Background color at any depth, or the terminal default.
    Bg(Color),
    /// Bold on / off.
    Bold(bool),
    /// Italic on / off.
    Italic(bool),
    /// Underline on / off.
    Underline(bool),
    /// Absolute cursor placement, 1-based.
    Pos { row: i16, col: i16 },
    /// Relative cursor movement, signed deltas.
    RPos { row: i16, col: i16 },
    /// Hide (`true`) or show (`false`) the cursor.
    Hide(bool),
    /// Reset every attribute.
    Clear,
}

/// Outcome of applying a manipulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// Bytes were sent to the stream.
    Written,
    /// The stream was already in the requested state; nothing was sent.
    Skipped,
}

impl Emission {
    /// Whether bytes were sent.
    #[must_use]
    pub const fn is_written(self) -> bool {
        matches!(self, Self::Written)
    }
}

impl Manipulator {
    /// The category this request belongs to. `None` for [`Clear`](Self::Clear),
    /// which touches every category at once.
    #[must_use]
    pub const fn category(self) -> Option<Category> {
        Some(match self {
            Self::Fg(c) => Category::color(Channel::Foreground, c.depth()),
            Self::Bg(c) => Category::color(Channel::Background, c.depth()),
            Self::Bold(_) => Category::attribute(Attribute::Bold),
            Self::Italic(_) => Category::attribute(Attribute::Italic),
            Self::Underline(_) => Category::attribute(Attribute::Underline),
            Self::Pos { .. } => Category::AbsolutePosition,
            Self::RPos { .. } => Category::RelativePosition,
            Self::Hide(_) => Category::CursorVisibility,
            Self::Clear => return None,
        })
    }

    /// The state this request asks for. `None` for [`Clear`](Self::Clear).
    #[must_use]
    pub const fn state(self) -> Option<StateValue> {
        Some(match self {
            Self::Fg(c) | Self::Bg(c) => StateValue::Color(c),
            Self::Bold(on) | Self::Italic(on) | Self::Underline(on) | Self::Hide(on) => {
                StateValue::Flag(on)
            }
            Self::Pos { row, col } | Self::RPos { row, col } => StateValue::Coord { row, col },
            Self::Clear => return None,
        })
    }

    /// The category and state to remember after a successful write, if any.
    #[must_use]
    pub const fn cache_entry(self) -> Option<(Category, StateValue)> {
        match (self.category(), self.state()) {
            (Some(category), Some(value)) if category.is_cached() => Some((category, value)),
            _ => None,
        }
    }

    /// What this request does to other cached state once written.
    #[must_use]
    pub const fn trigger(self) -> Trigger {
        match self.category() {
            Some(category) => Trigger::Applied(category),
            None => Trigger::Clear,
        }
    }

    /// Write this request's escape sequence, unconditionally.
    ///
    /// # Errors
    ///
    /// Propagates any error from `w`.
    pub fn encode(self, w: &mut impl Write) -> io::Result<()> {
        match self {
            Self::Fg(c) => ansi::fg(w, c),
            Self::Bg(c) => ansi::bg(w, c),
            Self::Bold(on) => ansi::attribute(w, Attribute::Bold, on),
            Self::Italic(on) => ansi::attribute(w, Attribute::Italic, on),
            Self::Underline(on) => ansi::attribute(w, Attribute::Underline, on),
            Self::Pos { row, col } => ansi::cursor_to(w, row, col),
            Self::RPos { row, col } => ansi::cursor_move(w, row, col),
            Self::Hide(hidden) => ansi::cursor_hidden(w, hidden),
            Self::Clear => ansi::reset(w),
        }
    }

    /// The escape sequence as bytes.
    #[must_use]
    pub fn to_bytes(self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(20);
        // Writing into a Vec cannot fail.
        let _ = self.encode(&mut buf);
        buf
    }

    /// Apply through the process-wide session.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Io`] if the stream rejects the write.
    pub fn apply<S: FormatStream + ?Sized>(self, stream: &mut S) -> Result<Emission, FormatError> {
        Session::global().apply(self, stream)
    }

    /// Apply through an explicit session.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Io`] if the stream rejects the write.
    pub fn apply_in<S: FormatStream + ?Sized>(
        self,
        session: &Session,
        stream: &mut S,
    ) -> Result<Emission, FormatError> {
        session.apply(self, stream)
    }
}

// ─── Constructors ────────────────────────────────────────────────────────────

fn palette(index: i32) -> Result<Color, FormatError> {
    Color::from_index(index).ok_or(FormatError::ColorIndexOutOfRange { index })
}

/// Foreground from the xterm-256 palette; `-1` is the terminal default.
///
/// # Errors
///
/// Returns [`FormatError::ColorIndexOutOfRange`] outside `-1..=255`.
pub fn fg(index: i32) -> Result<Manipulator, FormatError> {
    palette(index).map(Manipulator::Fg)
}

/// 24-bit foreground.
#[must_use]
pub const fn fg_rgb(r: u8, g: u8, b: u8) -> Manipulator {
    Manipulator::Fg(Color::Rgb(r, g, b))
}

/// Terminal default foreground.
#[must_use]
pub const fn fg_default() -> Manipulator {
    Manipulator::Fg(Color::Default)
}

/// Background from the xterm-256 palette; `-1` is the terminal default.
///
/// # Errors
///
/// Returns [`FormatError::ColorIndexOutOfRange`] outside `-1..=255`.
pub fn bg(index: i32) -> Result<Manipulator, FormatError> {
    palette(index).map(Manipulator::Bg)
}

/// 24-bit background.
#[must_use]
pub const fn bg_rgb(r: u8, g: u8, b: u8) -> Manipulator {
    Manipulator::Bg(Color::Rgb(r, g, b))
}

/// Terminal default background.
#[must_use]
pub const fn bg_default() -> Manipulator {
    Manipulator::Bg(Color::Default)
}

#[must_use]
pub const fn bold(on: bool) -> Manipulator {
    Manipulator::Bold(on)
}

#[must_use]
pub const fn italic(on: bool) -> Manipulator {
    Manipulator::Italic(on)
}

#[must_use]
pub const fn underline(on: bool) -> Manipulator {
    Manipulator::Underline(on)
}

/// Place the cursor at `(row, col)`; `(1, 1)` is the top-left corner.
///
/// # Errors
///
/// Returns [`FormatError::PositionOutOfRange`] if either coordinate is below 1.
pub fn pos(row: i16, col: i16) -> Result<Manipulator, FormatError> {
    if row < 1 || col < 1 {
        return Err(FormatError::PositionOutOfRange { row, col });
    }
    Ok(Manipulator::Pos { row, col })
}

/// Move the cursor relative to where it is. Negative is up / left; the
/// terminal clamps the result to the screen.
#[must_use]
pub const fn rpos(row: i16, col: i16) -> Manipulator {
    Manipulator::RPos { row, col }
}

/// Hide (`true`) or show (`false`) the cursor.
#[must_use]
pub const fn hide(hidden: bool) -> Manipulator {
    Manipulator::Hide(hidden)
}

/// Reset all attributes. Always written.
#[must_use]
pub const fn clear() -> Manipulator {
    Manipulator::Clear
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bytes(m: Manipulator) -> String {
        String::from_utf8(m.to_bytes()).unwrap()
    }

    #[test]
    fn palette_bounds() {
        assert_eq!(fg(0).unwrap(), Manipulator::Fg(Color::Indexed(0)));
        assert_eq!(bg(255).unwrap(), Manipulator::Bg(Color::Indexed(255)));
        assert_eq!(fg(-1).unwrap(), fg_default());
        assert_eq!(bg(-1).unwrap(), bg_default());
    }

    #[test]
    fn palette_out_of_range_fails_fast() {
        assert!(matches!(
            fg(256),
            Err(FormatError::ColorIndexOutOfRange { index: 256 })
        ));
        assert!(matches!(
            bg(-2),
            Err(FormatError::ColorIndexOutOfRange { index: -2 })
        ));
    }

    #[test]
    fn pos_is_one_based() {
        assert_eq!(pos(1, 1).unwrap(), Manipulator::Pos { row: 1, col: 1 });
        assert!(matches!(
            pos(0, 5),
            Err(FormatError::PositionOutOfRange { row: 0, col: 5 })
        ));
        assert!(pos(3, -1).is_err());
    }

    #[test]
    fn categories() {
        assert_eq!(fg(5).unwrap().category(), Some(Category::ForegroundColor8));
        assert_eq!(fg_default().category(), Some(Category::ForegroundColor8));
        assert_eq!(fg_rgb(1, 2, 3).category(), Some(Category::ForegroundColor24));
        assert_eq!(bg_default().category(), Some(Category::BackgroundColor8));
        assert_eq!(bg_rgb(1, 2, 3).category(), Some(Category::BackgroundColor24));
        assert_eq!(italic(true).category(), Some(Category::ItalicAttribute));
        assert_eq!(rpos(1, 1).category(), Some(Category::RelativePosition));
        assert_eq!(hide(true).category(), Some(Category::CursorVisibility));
        assert_eq!(clear().category(), None);
    }

    #[test]
    fn cache_entry_skips_uncached_requests() {
        assert_eq!(
            bold(true).cache_entry(),
            Some((Category::BoldAttribute, StateValue::Flag(true)))
        );
        assert_eq!(rpos(-1, 0).cache_entry(), None);
        assert_eq!(clear().cache_entry(), None);
    }

    #[test]
    fn triggers() {
        assert_eq!(clear().trigger(), Trigger::Clear);
        assert_eq!(
            pos(2, 2).unwrap().trigger(),
            Trigger::Applied(Category::AbsolutePosition)
        );
    }

    #[test]
    fn encodings() {
        assert_eq!(bytes(fg(5).unwrap()), "\x1b[38;5;5m");
        assert_eq!(bytes(bg(200).unwrap()), "\x1b[48;5;200m");
        assert_eq!(bytes(fg_rgb(10, 20, 30)), "\x1b[38;2;10;20;30m");
        assert_eq!(bytes(bg_rgb(0, 0, 0)), "\x1b[48;2;0;0;0m");
        assert_eq!(bytes(fg_default()), "\x1b[39m");
        assert_eq!(bytes(bg_default()), "\x1b[49m");
        assert_eq!(bytes(bold(true)), "\x1b[1m");
        assert_eq!(bytes(bold(false)), "\x1b[22m");
        assert_eq!(bytes(italic(true)), "\x1b[3m");
        assert_eq!(bytes(italic(false)), "\x1b[23m");
        assert_eq!(bytes(underline(true)), "\x1b[4m");
        assert_eq!(bytes(underline(false)), "\x1b[24m");
        assert_eq!(bytes(pos(3, 7).unwrap()), "\x1b[3;7H");
        assert_eq!(bytes(rpos(-21, 0)), "\x1b[21A");
        assert_eq!(bytes(rpos(2, -3)), "\x1b[2B\x1b[3D");
        assert_eq!(bytes(hide(true)), "\x1b[?25l");
        assert_eq!(bytes(hide(false)), "\x1b[?25h");
        assert_eq!(bytes(clear()), "\x1b[0m");
    }

    #[test]
    fn emission() {
        assert!(Emission::Written.is_written());
        assert!(!Emission::Skipped.is_written());
    }
}

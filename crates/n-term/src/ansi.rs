// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit — that's the state cache's job in n-fmt.
// This module just knows the byte-level encoding of every terminal command
// the formatter needs.
//
// Coordinates are passed through exactly as given: absolute positions are
// already 1-based, relative moves are signed deltas. Range checks happen
// where values are constructed, not here.
//
// All functions return `io::Result` propagated from the underlying writer.
use std::io::{self, Write};

use crate::color::{Channel, Color};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(row, col)` using CUP. Both are 1-based.
#[inline]
pub fn cursor_to(w: &mut impl Write, row: i16, col: i16) -> io::Result<()> {
    write!(w, "\x1b[{row};{col}H")
}

/// Move the cursor by a signed delta using CUU / CUD / CUB / CUF.
///
/// Negative rows go up (`A`), positive rows go down (`B`), negative columns
/// go left (`D`), positive columns go right (`C`). A zero component emits
/// nothing, so `(0, 0)` writes no bytes at all. The terminal clamps the
/// result to the screen.
pub fn cursor_move(w: &mut impl Write, rows: i16, cols: i16) -> io::Result<()> {
    // Widen first: -i16::MIN does not fit in an i16.
    let (rows, cols) = (i32::from(rows), i32::from(cols));
    if rows < 0 {
        write!(w, "\x1b[{}A", -rows)?;
    }
    if rows > 0 {
        write!(w, "\x1b[{rows}B")?;
    }
    if cols < 0 {
        write!(w, "\x1b[{}D", -cols)?;
    }
    if cols > 0 {
        write!(w, "\x1b[{cols}C")?;
    }
    Ok(())
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

/// Hide or show the cursor.
#[inline]
pub fn cursor_hidden(w: &mut impl Write, hidden: bool) -> io::Result<()> {
    if hidden { cursor_hide(w) } else { cursor_show(w) }
}

// ─── Reset ───────────────────────────────────────────────────────────────────

/// Reset all SGR attributes to terminal defaults (SGR 0).
///
/// This clears **everything**: bold, italic, colors, underline — all of it.
/// Anything tracking terminal state must forget it after calling this.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Colors ──────────────────────────────────────────────────────────────────

/// Set a channel's color.
///
/// Palette indices always use the extended `38;5;N` form (no compact 30–37
/// codes) so the output is the same for every index. `Default` restores the
/// terminal's own color with SGR 39 / 49.
pub fn color(w: &mut impl Write, channel: Channel, color: Color) -> io::Result<()> {
    let code = channel.sgr_base();
    match color {
        Color::Default => write!(w, "\x1b[{}m", channel.sgr_default()),
        Color::Indexed(idx) => write!(w, "\x1b[{code};5;{idx}m"),
        Color::Rgb(r, g, b) => write!(w, "\x1b[{code};2;{r};{g};{b}m"),
    }
}

/// Set the foreground (text) color.
#[inline]
pub fn fg(w: &mut impl Write, c: Color) -> io::Result<()> {
    color(w, Channel::Foreground, c)
}

/// Set the background color.
#[inline]
pub fn bg(w: &mut impl Write, c: Color) -> io::Result<()> {
    color(w, Channel::Background, c)
}

// ─── Text Attributes ─────────────────────────────────────────────────────────

/// A binary text attribute with its SGR on / off pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// SGR 1 / 22.
    Bold,
    /// SGR 3 / 23.
    Italic,
    /// SGR 4 / 24.
    Underline,
}

impl Attribute {
    /// SGR code that turns the attribute on.
    #[must_use]
    pub const fn on_code(self) -> u8 {
        match self {
            Self::Bold => 1,
            Self::Italic => 3,
            Self::Underline => 4,
        }
    }

    /// SGR code that turns the attribute off.
    #[must_use]
    pub const fn off_code(self) -> u8 {
        match self {
            Self::Bold => 22,
            Self::Italic => 23,
            Self::Underline => 24,
        }
    }
}

/// Turn a text attribute on or off.
pub fn attribute(w: &mut impl Write, attr: Attribute, on: bool) -> io::Result<()> {
    let code = if on { attr.on_code() } else { attr.off_code() };
    write!(w, "\x1b[{code}m")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

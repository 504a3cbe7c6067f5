// SPDX-License-Identifier: MIT
//
// Terminal color values.
//
// A terminal channel (foreground or background) can be in exactly one of
// three states: the terminal's own default, an xterm-256 palette index, or a
// 24-bit true color. The first two share the 8-bit SGR family (38;5 / 39),
// the last one uses the 24-bit family (38;2). That split is the "depth" of a
// color, and the state cache upstream keys on it.

use std::fmt;

// ─── Channel ─────────────────────────────────────────────────────────────────

/// Which half of a cell a color applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Text color (SGR 38 / 39).
    Foreground,
    /// Cell background (SGR 48 / 49).
    Background,
}

impl Channel {
    /// Base SGR parameter for extended colors: 38 or 48.
    #[inline]
    #[must_use]
    pub const fn sgr_base(self) -> u8 {
        match self {
            Self::Foreground => 38,
            Self::Background => 48,
        }
    }

    /// SGR parameter that restores the terminal default: 39 or 49.
    #[inline]
    #[must_use]
    pub const fn sgr_default(self) -> u8 {
        self.sgr_base() + 1
    }
}

// ─── Depth ───────────────────────────────────────────────────────────────────

/// Encoding family of a [`Color`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Depth {
    /// xterm-256 palette (and the terminal default).
    Indexed,
    /// 24-bit `TrueColor`.
    TrueColor,
}

// ─── Color ───────────────────────────────────────────────────────────────────

/// A color as the terminal sees it.
///
/// `Default` is an explicit request for "no color": the terminal falls back
/// to whatever the user's theme says. It belongs to the [`Depth::Indexed`]
/// family because it is encoded with the 8-bit SGR codes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Terminal default color.
    #[default]
    Default,

    /// xterm-256 palette index.
    Indexed(u8),

    /// 24-bit `TrueColor`.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Build a color from a signed palette index.
    ///
    /// `-1` means the terminal default, `0..=255` is a palette entry.
    /// Anything else returns `None`; callers decide how to report it.
    ///
    /// ```
    /// use n_term::color::Color;
    ///
    /// assert_eq!(Color::from_index(-1), Some(Color::Default));
    /// assert_eq!(Color::from_index(42), Some(Color::Indexed(42)));
    /// assert_eq!(Color::from_index(256), None);
    /// ```
    #[must_use]
    pub fn from_index(index: i32) -> Option<Self> {
        if index == -1 {
            return Some(Self::Default);
        }
        u8::try_from(index).ok().map(Self::Indexed)
    }

    /// The encoding family this color is emitted with.
    #[inline]
    #[must_use]
    pub const fn depth(self) -> Depth {
        match self {
            Self::Default | Self::Indexed(_) => Depth::Indexed,
            Self::Rgb(..) => Depth::TrueColor,
        }
    }

    /// Whether this is the terminal default color.
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Indexed(idx) => write!(f, "ansi({idx})"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_index_accepts_full_palette() {
        assert_eq!(Color::from_index(0), Some(Color::Indexed(0)));
        assert_eq!(Color::from_index(255), Some(Color::Indexed(255)));
    }

    #[test]
    fn from_index_minus_one_is_default() {
        assert_eq!(Color::from_index(-1), Some(Color::Default));
    }

    #[test]
    fn from_index_rejects_out_of_range() {
        assert_eq!(Color::from_index(256), None);
        assert_eq!(Color::from_index(-2), None);
        assert_eq!(Color::from_index(i32::MIN), None);
    }

    #[test]
    fn default_shares_the_indexed_depth() {
        assert_eq!(Color::Default.depth(), Depth::Indexed);
        assert_eq!(Color::Indexed(9).depth(), Depth::Indexed);
        assert_eq!(Color::Rgb(1, 2, 3).depth(), Depth::TrueColor);
    }

    #[test]
    fn channel_codes() {
        assert_eq!(Channel::Foreground.sgr_base(), 38);
        assert_eq!(Channel::Foreground.sgr_default(), 39);
        assert_eq!(Channel::Background.sgr_base(), 48);
        assert_eq!(Channel::Background.sgr_default(), 49);
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Color::Rgb(255, 0, 16)), "#ff0010");
        assert_eq!(format!("{}", Color::Indexed(7)), "ansi(7)");
        assert_eq!(format!("{}", Color::Default), "default");
    }
}

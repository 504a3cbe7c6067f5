// SPDX-License-Identifier: MIT
//
// Categories — classes of mutually exclusive terminal state.
//
// Every manipulator belongs to exactly one category. Two requests in the
// same category supersede each other (the terminal can only be in one bold
// state, at one absolute position, with one 8-bit foreground); requests in
// different categories are independent unless the invalidation table says
// otherwise.
//
// Colors are split by depth on purpose. `fg(5)` and `fg(r, g, b)` both set
// the foreground, but they are cached separately so a cached 8-bit value can
// never answer for a 24-bit request. The invalidation table keeps the two
// depths from both claiming to be active.

use n_term::ansi::Attribute;
use n_term::color::{Channel, Color, Depth};

// ─── Category ────────────────────────────────────────────────────────────────

/// A class of terminal formatting state tracked independently in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    ForegroundColor8,
    ForegroundColor24,
    BackgroundColor8,
    BackgroundColor24,
    AbsolutePosition,
    RelativePosition,
    CursorVisibility,
    BoldAttribute,
    ItalicAttribute,
    UnderlineAttribute,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::ForegroundColor8,
        Self::ForegroundColor24,
        Self::BackgroundColor8,
        Self::BackgroundColor24,
        Self::AbsolutePosition,
        Self::RelativePosition,
        Self::CursorVisibility,
        Self::BoldAttribute,
        Self::ItalicAttribute,
        Self::UnderlineAttribute,
    ];

    /// The color category for a channel at a given depth.
    #[must_use]
    pub const fn color(channel: Channel, depth: Depth) -> Self {
        match (channel, depth) {
            (Channel::Foreground, Depth::Indexed) => Self::ForegroundColor8,
            (Channel::Foreground, Depth::TrueColor) => Self::ForegroundColor24,
            (Channel::Background, Depth::Indexed) => Self::BackgroundColor8,
            (Channel::Background, Depth::TrueColor) => Self::BackgroundColor24,
        }
    }

    /// The category of a binary text attribute.
    #[must_use]
    pub const fn attribute(attr: Attribute) -> Self {
        match attr {
            Attribute::Bold => Self::BoldAttribute,
            Attribute::Italic => Self::ItalicAttribute,
            Attribute::Underline => Self::UnderlineAttribute,
        }
    }

    /// Whether values in this category are remembered.
    ///
    /// A relative move is a new delta every time; "move down one row" twice
    /// means two rows, so it can never be skipped.
    #[must_use]
    pub const fn is_cached(self) -> bool {
        !matches!(self, Self::RelativePosition)
    }

    /// This category as a single-member set.
    #[must_use]
    pub const fn flag(self) -> CategorySet {
        match self {
            Self::ForegroundColor8 => CategorySet::FOREGROUND_COLOR_8,
            Self::ForegroundColor24 => CategorySet::FOREGROUND_COLOR_24,
            Self::BackgroundColor8 => CategorySet::BACKGROUND_COLOR_8,
            Self::BackgroundColor24 => CategorySet::BACKGROUND_COLOR_24,
            Self::AbsolutePosition => CategorySet::ABSOLUTE_POSITION,
            Self::RelativePosition => CategorySet::RELATIVE_POSITION,
            Self::CursorVisibility => CategorySet::CURSOR_VISIBILITY,
            Self::BoldAttribute => CategorySet::BOLD_ATTRIBUTE,
            Self::ItalicAttribute => CategorySet::ITALIC_ATTRIBUTE,
            Self::UnderlineAttribute => CategorySet::UNDERLINE_ATTRIBUTE,
        }
    }
}

// ─── CategorySet ─────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// A set of categories, used by the invalidation table.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CategorySet: u16 {
        const FOREGROUND_COLOR_8  = 1 << 0;
        const FOREGROUND_COLOR_24 = 1 << 1;
        const BACKGROUND_COLOR_8  = 1 << 2;
        const BACKGROUND_COLOR_24 = 1 << 3;
        const ABSOLUTE_POSITION   = 1 << 4;
        const RELATIVE_POSITION   = 1 << 5;
        const CURSOR_VISIBILITY   = 1 << 6;
        const BOLD_ATTRIBUTE      = 1 << 7;
        const ITALIC_ATTRIBUTE    = 1 << 8;
        const UNDERLINE_ATTRIBUTE = 1 << 9;

        /// Both channels at both depths.
        const COLORS = Self::FOREGROUND_COLOR_8.bits()
            | Self::FOREGROUND_COLOR_24.bits()
            | Self::BACKGROUND_COLOR_8.bits()
            | Self::BACKGROUND_COLOR_24.bits();
    }
}

impl CategorySet {
    /// Whether `category` is a member.
    #[inline]
    #[must_use]
    pub const fn has(self, category: Category) -> bool {
        self.contains(category.flag())
    }

    /// The member categories, in declaration order.
    pub fn categories(self) -> impl Iterator<Item = Category> {
        Category::ALL.into_iter().filter(move |c| self.has(*c))
    }
}

impl From<Category> for CategorySet {
    fn from(category: Category) -> Self {
        category.flag()
    }
}

// ─── StateValue ──────────────────────────────────────────────────────────────

/// The payload cached for one category on one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateValue {
    /// A color, for any of the four color categories.
    Color(Color),
    /// An on/off state: attributes and cursor visibility.
    Flag(bool),
    /// A coordinate pair: absolute (1-based) or relative (signed delta).
    Coord { row: i16, col: i16 },
}

// ─── Tests ───────────────────────────────────────────────────────────────────

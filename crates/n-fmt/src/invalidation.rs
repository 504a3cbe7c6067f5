// SPDX-License-Identifier: MIT
//
// Invalidation bus.
//
// Terminal state is not fully orthogonal. After certain writes, entries of
// *other* categories stop describing the terminal and must be forgotten:
//
//   trigger                    forgets (same stream only)
//   ─────────────────────────  ─────────────────────────────────────────
//   foreground 8-bit / default foreground 24-bit
//   foreground 24-bit          foreground 8-bit
//   background 8-bit / default background 24-bit
//   background 24-bit          background 8-bit
//   absolute position          all four colors
//   relative position          all four colors, absolute position
//   clear (SGR 0)              everything
//
// Rules run after a successful write and after the trigger's own entry has
// been stored, so a trigger never forgets itself.

use tracing::trace;

use crate::cache::StateCache;
use crate::category::{Category, CategorySet};
use crate::stream::StreamId;

/// What just happened on a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A manipulator of this category was written.
    Applied(Category),
    /// A full attribute reset was written.
    Clear,
}

/// Categories that a trigger makes stale.
#[must_use]
pub const fn conflicts(trigger: Trigger) -> CategorySet {
    let category = match trigger {
        Trigger::Clear => return CategorySet::all(),
        Trigger::Applied(category) => category,
    };
    match category {
        Category::ForegroundColor8 => CategorySet::FOREGROUND_COLOR_24,
        Category::ForegroundColor24 => CategorySet::FOREGROUND_COLOR_8,
        Category::BackgroundColor8 => CategorySet::BACKGROUND_COLOR_24,
        Category::BackgroundColor24 => CategorySet::BACKGROUND_COLOR_8,
        Category::AbsolutePosition => CategorySet::COLORS,
        Category::RelativePosition => CategorySet::COLORS.union(CategorySet::ABSOLUTE_POSITION),
        Category::CursorVisibility
        | Category::BoldAttribute
        | Category::ItalicAttribute
        | Category::UnderlineAttribute => CategorySet::empty(),
    }
}

/// Apply the rules for `trigger` to `stream`. Returns entries removed.
pub fn run(cache: &mut StateCache, stream: StreamId, trigger: Trigger) -> usize {
    let removed = match trigger {
        Trigger::Clear => cache.invalidate_all(stream),
        Trigger::Applied(_) => {
            let set = conflicts(trigger);
            if set.is_empty() {
                return 0;
            }
            cache.invalidate_set(stream, set)
        }
    };
    if removed > 0 {
        trace!(%stream, ?trigger, removed, "invalidated conflicting state");
    }
    removed
}

// ─── Tests ───────────────────────────────────────────────────────────────────

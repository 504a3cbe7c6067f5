// SPDX-License-Identifier: MIT
//
// Terminal queries and panic-safe restore.
//
// Safety: This module necessarily uses `unsafe` for ioctl (TIOCGWINSZ),
// isatty, and a raw fd write. These are the standard POSIX interfaces for
// terminal queries — there is no safe alternative in std. Each unsafe block
// is minimal.
#![allow(unsafe_code)]
//
// The formatter never reads terminal state; it only needs the window size
// to lay out a frame. The panic hook exists because an animation hides the
// cursor while drawing: if the program dies mid-frame, the user's shell
// would be left with no cursor and whatever colors were active. The hook
// bypasses Rust's stdout lock entirely (the panic may have happened while
// holding it) and writes the restore bytes straight to fd 1.

use std::sync::Once;

#[cfg(not(unix))]
use std::io::{self, Write};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

impl Size {
    /// The classic VT100 screen, used when the real size is unknown.
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };

    /// Total number of cells (`cols × rows`).
    #[inline]
    #[must_use]
    pub const fn area(self) -> u32 {
        self.cols as u32 * self.rows as u32
    }
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether stdout is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDOUT_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic-Safe Restore ─────────────────────────────────────────────────────

/// Restore sequence for emergency use: reset SGR attributes, show cursor.
pub const EMERGENCY_RESTORE: &[u8] = b"\x1b[0m\x1b[?25h";

/// Panic hook guard — ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// The hook writes [`EMERGENCY_RESTORE`] directly to fd 1, then delegates to
/// the original panic handler so the message prints to a usable terminal.
/// Calling this more than once is harmless.
pub fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();
            original(info);
        }));
    });
}

/// Write the restore sequence directly to stdout's file descriptor.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

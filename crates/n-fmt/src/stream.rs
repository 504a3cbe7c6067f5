// SPDX-License-Identifier: MIT
//
// Stream identity.
//
// The cache needs to tell output sinks apart, and it must do so by *which*
// sink it is, never by what the sink contains. Rust writers have no address
// that stays stable across moves, so identity is an explicit number handed
// out once per physical sink:
//
//   - `Tracked<W>` draws a fresh id when it wraps a writer.
//   - stdout and stderr have reserved ids, so `io::stdout()` obtained at two
//     different call sites is still the same stream to the cache.
//
// The cache only ever compares ids. It never holds the writer.

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

// ─── StreamId ────────────────────────────────────────────────────────────────

/// Opaque identity of one output sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(u64);

/// First id handed out by [`StreamId::fresh`]; everything below is reserved.
const FIRST_FRESH: u64 = 16;

static NEXT_ID: AtomicU64 = AtomicU64::new(FIRST_FRESH);

impl StreamId {
    /// The process's standard output.
    pub const STDOUT: Self = Self(1);

    /// The process's standard error.
    pub const STDERR: Self = Self(2);

    /// Allocate an id no other sink in this process has.
    #[must_use]
    pub fn fresh() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw number, for logging.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::STDOUT => f.write_str("stdout"),
            Self::STDERR => f.write_str("stderr"),
            Self(n) => write!(f, "stream#{n}"),
        }
    }
}

// ─── FormatStream ────────────────────────────────────────────────────────────

/// A writer the formatter can cache state for.
pub trait FormatStream: Write {
    /// Identity of the physical sink behind this writer.
    fn stream_id(&self) -> StreamId;
}

impl FormatStream for io::Stdout {
    fn stream_id(&self) -> StreamId {
        StreamId::STDOUT
    }
}

impl FormatStream for io::StdoutLock<'_> {
    fn stream_id(&self) -> StreamId {
        StreamId::STDOUT
    }
}

impl FormatStream for io::Stderr {
    fn stream_id(&self) -> StreamId {
        StreamId::STDERR
    }
}

impl FormatStream for io::StderrLock<'_> {
    fn stream_id(&self) -> StreamId {
        StreamId::STDERR
    }
}

impl<S: FormatStream + ?Sized> FormatStream for &mut S {
    fn stream_id(&self) -> StreamId {
        (**self).stream_id()
    }
}

impl<S: FormatStream + ?Sized> FormatStream for Box<S> {
    fn stream_id(&self) -> StreamId {
        (**self).stream_id()
    }
}

// ─── Tracked ─────────────────────────────────────────────────────────────────

/// Any writer, given its own stream identity.
///
/// Not `Clone`: two clones would be two sinks sharing one identity, and the
/// cache would wrongly believe state applied to one is active on the other.
///
/// Bytes written through [`get_mut`](Self::get_mut) bypass the formatter.
/// Plain text is fine; escape sequences written that way are invisible to the
/// cache, so call [`Session::invalidate_stream`](crate::Session::invalidate_stream)
/// afterwards.
#[derive(Debug)]
pub struct Tracked<W> {
    id: StreamId,
    inner: W,
}

impl<W: Write> Tracked<W> {
    /// Wrap `inner` with a fresh identity.
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self {
            id: StreamId::fresh(),
            inner,
        }
    }

    /// This stream's identity.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> StreamId {
        self.id
    }

    /// Borrow the wrapped writer.
    #[inline]
    pub const fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the wrapped writer.
    #[inline]
    pub const fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Unwrap, discarding the identity.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for Tracked<W> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    #[inline]
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write> FormatStream for Tracked<W> {
    fn stream_id(&self) -> StreamId {
        self.id
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

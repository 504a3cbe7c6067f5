// SPDX-License-Identifier: MIT
//
// Formatting session — the shared owner of the state cache.
//
// Manipulators are built at unrelated call sites, yet they must all agree on
// what is currently active on a given stream. A Session is the thing they
// agree through: a cheap, clonable handle to one cache behind one mutex.
//
// Apply protocol, all under a single lock acquisition:
//
//   1. Cacheable request whose cached value already matches → Skipped.
//   2. Otherwise encode into a scratch buffer and write it with one
//      `write_all`.
//   3. Write failed → forget the request's category and its conflicts (the
//      stream may hold a partial sequence), return the error.
//   4. Write succeeded → remember the new value, then run the invalidation
//      rules for it.
//
// Most programs need one session for their lifetime. `Session::global()` is
// that session, created lazily from the environment, or up front with
// `init_global()` for an explicit config.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::{debug, trace, warn};

use crate::cache::StateCache;
use crate::category::{Category, StateValue};
use crate::config::FormatConfig;
use crate::error::FormatError;
use crate::invalidation;
use crate::manipulator::{Emission, Manipulator};
use crate::stream::{FormatStream, StreamId};

static GLOBAL: OnceLock<Session> = OnceLock::new();

/// Install the process-wide session with an explicit config.
///
/// # Errors
///
/// Returns [`FormatError::AlreadyInitialized`] if the global session already
/// exists, whether from an earlier call or from a [`Session::global`] use.
pub fn init_global(config: FormatConfig) -> Result<(), FormatError> {
    GLOBAL
        .set(Session::new(config))
        .map_err(|_| FormatError::AlreadyInitialized)
}

/// A shared handle to one state cache.
#[derive(Debug, Clone)]
pub struct Session {
    cache: Arc<Mutex<StateCache>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(FormatConfig::default())
    }
}

impl Session {
    /// A new session with an empty cache.
    #[must_use]
    pub fn new(config: FormatConfig) -> Self {
        debug!(capacity = config.cache_capacity.get(), "created formatting session");
        Self {
            cache: Arc::new(Mutex::new(StateCache::new(config.cache_capacity))),
        }
    }

    /// A new session holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Config`] if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, FormatError> {
        Ok(Self::new(FormatConfig::with_capacity(capacity)?))
    }

    /// The process-wide session.
    ///
    /// Created on first use from [`FormatConfig::from_env`]; a malformed
    /// environment value is logged and the default capacity used instead.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| {
            let config = FormatConfig::from_env().unwrap_or_else(|e| {
                warn!(error = %e, "ignoring cache capacity from environment");
                FormatConfig::default()
            });
            Self::new(config)
        })
    }

    fn lock(&self) -> MutexGuard<'_, StateCache> {
        // A panic while holding the lock can at worst leave an entry that
        // is stale; clearing would also be correct but re-emits everything.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one manipulator to `stream`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Io`] if the stream rejects the write. Nothing is
    /// remembered for a failed write.
    pub fn apply<S: FormatStream + ?Sized>(
        &self,
        manipulator: Manipulator,
        stream: &mut S,
    ) -> Result<Emission, FormatError> {
        let id = stream.stream_id();
        let entry = manipulator.cache_entry();
        let mut cache = self.lock();

        if let Some((category, value)) = entry {
            if cache.lookup(id, category) == Some(value) {
                trace!(stream = %id, ?manipulator, "skipped: already active");
                return Ok(Emission::Skipped);
            }
        }

        let mut bytes = Vec::with_capacity(24);
        manipulator.encode(&mut bytes)?;

        if let Err(e) = stream.write_all(&bytes) {
            if let Some(category) = manipulator.category() {
                cache.invalidate(id, category);
            }
            invalidation::run(&mut cache, id, manipulator.trigger());
            return Err(e.into());
        }

        if let Some((category, value)) = entry {
            cache.put(id, category, value);
        }
        invalidation::run(&mut cache, id, manipulator.trigger());
        trace!(stream = %id, ?manipulator, len = bytes.len(), "written");
        Ok(Emission::Written)
    }

    /// Apply several manipulators in order. Returns how many were written.
    ///
    /// # Errors
    ///
    /// Stops at, and returns, the first write error.
    pub fn apply_all<S, I>(&self, manipulators: I, stream: &mut S) -> Result<usize, FormatError>
    where
        S: FormatStream + ?Sized,
        I: IntoIterator<Item = Manipulator>,
    {
        let mut written = 0;
        for m in manipulators {
            if self.apply(m, stream)?.is_written() {
                written += 1;
            }
        }
        Ok(written)
    }

    /// Forget one category on one stream, e.g. after writing raw escape codes
    /// that bypassed the formatter.
    pub fn invalidate(&self, stream: StreamId, category: Category) {
        self.lock().invalidate(stream, category);
    }

    /// Forget everything known about one stream.
    pub fn invalidate_stream(&self, stream: StreamId) {
        let removed = self.lock().invalidate_all(stream);
        debug!(%stream, removed, "invalidated stream");
    }

    /// Forget everything about every stream.
    pub fn reset(&self) {
        self.lock().clear();
        debug!("reset formatting session");
    }

    /// The cached value for a category, without affecting recency.
    #[must_use]
    pub fn cached(&self, stream: StreamId, category: Category) -> Option<StateValue> {
        self.lock().peek(stream, category)
    }

    /// Number of live cache entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Maximum number of live cache entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.lock().capacity().get()
    }

    /// Whether `other` is a handle to the same cache.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cache, &other.cache)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

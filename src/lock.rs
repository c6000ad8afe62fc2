//! Lock capability for the shared cache wrapper.
//!
//! [`SharedLruCache`](crate::policy::lru::SharedLruCache) is generic over a
//! [`RawMutex`] so the synchronization cost is chosen at construction time
//! rather than by compiling two cache types:
//!
//! - `parking_lot::RawMutex` — real mutual exclusion for multi-threaded use
//!   (the [`SyncLruCache`](crate::policy::lru::SyncLruCache) alias);
//! - [`NoopRawMutex`] — a free stand-in with the identical acquire/release
//!   surface for single-threaded embeddings
//!   (the [`UnsyncLruCache`](crate::policy::lru::UnsyncLruCache) alias).
//!
//! `NoopRawMutex` performs no exclusion, so it is deliberately `!Sync`: a
//! cache built on it cannot be shared across threads, which turns a data race
//! into a compile error. The lock is a plain mutex, not a reentrant one —
//! no operation in this crate re-enters the cache that invoked it, and
//! cache-to-cache merges snapshot the source before locking the destination.

use std::cell::Cell;
use std::marker::PhantomData;

use parking_lot::lock_api::{GuardNoSend, RawMutex};

/// Raw mutex that never blocks and never excludes.
///
/// Intended for single-threaded deployments where the lock acquire/release
/// discipline should stay in place but cost nothing. The `PhantomData<Cell<()>>`
/// keeps the type `Send` but `!Sync`, so the compiler rejects any attempt to
/// share a no-op-locked cache between threads.
pub struct NoopRawMutex {
    _not_sync: PhantomData<Cell<()>>,
}

unsafe impl RawMutex for NoopRawMutex {
    const INIT: NoopRawMutex = NoopRawMutex {
        _not_sync: PhantomData,
    };

    type GuardMarker = GuardNoSend;

    #[inline]
    fn lock(&self) {}

    #[inline]
    fn try_lock(&self) -> bool {
        true
    }

    #[inline]
    unsafe fn unlock(&self) {}
}

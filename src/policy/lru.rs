//! # Least Recently Used (LRU) Cache Implementation
//!
//! Exact LRU with O(1) lookup, insertion, promotion, and eviction, plus
//! hit/miss instrumentation. This is the policy to pick when the access
//! pattern should influence retention; see [`lri`](crate::policy::lri) when
//! only population order matters.
//!
//! ## Architecture
//!
//! ```text
//!   ┌────────────────────────────────────────────────────────────────────┐
//!   │                          LruCore<K, V>                             │
//!   │                                                                    │
//!   │   ┌──────────────────────────────────────────────────────────┐    │
//!   │   │  FxHashMap<K, EntryId> (index into the ring)             │    │
//!   │   │                                                          │    │
//!   │   │  ┌─────────┬──────────────────────────────────────┐      │    │
//!   │   │  │   Key   │  EntryId                             │      │    │
//!   │   │  ├─────────┼──────────────────────────────────────┤      │    │
//!   │   │  │  k_1    │  ──────────────────────────────┐     │      │    │
//!   │   │  │  k_2    │  ────────────────────────┐     │     │      │    │
//!   │   │  └─────────┴──────────────────────────┼─────┼─────┘      │    │
//!   │   └─────────────────────────────────────── ─────┼────────────┘    │
//!   │                                           │     │                 │
//!   │   ┌───────────────────────────────────────┼─────┼────────────┐    │
//!   │   │  SentinelRing<(K, V)> (recency order) ▼     ▼            │    │
//!   │   │                                                          │    │
//!   │   │  sentinel ──► [MRU] ◄──► [...] ◄──► [LRU] ──► sentinel   │    │
//!   │   │                                                          │    │
//!   │   │  Most Recently Used ─────────► Least Recently Used       │    │
//!   │   └──────────────────────────────────────────────────────────┘    │
//!   └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## LRU Operations Flow
//!
//! ```text
//!   INSERT new key (cache full)
//!   ═══════════════════════════════════════════════════════════════════
//!
//!   Before:  sentinel ──► [A] ◄──► [B] ◄──► [C] ◄── sentinel   (cap 3)
//!                         MRU                LRU
//!
//!   insert(D):
//!     1. Recycle [C] in place: overwrite key/value, drop C's index entry
//!     2. Relink the recycled node at the MRU end
//!
//!   After:   sentinel ──► [D] ◄──► [A] ◄──► [B] ◄── sentinel
//!
//!   No node is freed and none is allocated: at steady state the node
//!   count is constant.
//!
//!   ═══════════════════════════════════════════════════════════════════
//!
//!   ACCESS existing key
//!   ═══════════════════════════════════════════════════════════════════
//!
//!   get(B):
//!     1. Find [B] in the index: O(1)
//!     2. Splice [B] out and relink at the MRU end: O(1)
//!     3. hits += 1
//!
//!   get(missing): misses += 1, answer None
//!   get_or(missing, default): soft_misses += 1, answer the default —
//!   the default is NOT inserted.
//! ```
//!
//! ## Key Components
//!
//! | Component             | Description                                      |
//! |-----------------------|--------------------------------------------------|
//! | `LruCore<K, V>`       | Single-threaded core: index + sentinel ring      |
//! | `LruCache<K, V>`      | Type alias for `LruCore` (single-threaded usage) |
//! | `SharedLruCache`      | Lock-guarded shared wrapper (values as `Arc<V>`) |
//! | `SyncLruCache`        | `SharedLruCache` over `parking_lot::RawMutex`    |
//! | `UnsyncLruCache`      | `SharedLruCache` over the no-op mutex            |
//!
//! ## LruCore Methods
//!
//! | Method                 | Complexity | Description                            |
//! |------------------------|------------|----------------------------------------|
//! | `new` / `try_new`      | O(1)       | Capacity must be positive              |
//! | `with_entries`         | O(n)       | Preload; overflow keeps newest entries |
//! | `insert(k, v)`         | O(1)       | Insert or update-and-promote           |
//! | `get(&k)`              | O(1)       | Value + promote to MRU, counts hit/miss|
//! | `get_or(&k, default)`  | O(1)       | Miss answers default, counts soft miss |
//! | `get_or_insert_with`   | O(1)       | Compute-and-insert on absence          |
//! | `peek(&k)`             | O(1)       | Value without promoting                |
//! | `remove(&k)`           | O(1)       | Remove entry by key                    |
//! | `pop_lru` / `peek_lru` | O(1)       | Evict/inspect the LRU end              |
//! | `touch(&k)`            | O(1)       | Promote without retrieving             |
//! | `iter` / `keys`        | O(n)       | MRU → LRU order                        |
//! | `check_invariants`     | O(n)       | Structural self-check for tests        |
//!
//! ## Concurrency Model
//!
//! ```text
//!   Thread 1            Thread 2            Thread 3
//!      │                   │                   │
//!      │ get(k1)           │ insert(k3, v)     │ merge_from(other)
//!      ▼                   ▼                   ▼
//!   ┌──────────────────────────────────────────────────────────┐
//!   │            one Mutex per SharedLruCache instance         │
//!   │                                                          │
//!   │  Every operation takes the lock for its full duration.   │
//!   │  There is no reader/writer split: even get() reorders    │
//!   │  the ring, so all paths are writers.                     │
//!   └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The mutex is not reentrant. No operation in this crate calls back into
//! the same cache while holding the lock; in particular `merge_from` on the
//! same instance short-circuits before locking, and cross-instance merges
//! snapshot the source first.
//!
//! ## Design Rationale
//!
//! - **Arena ring, no raw pointers**: recency links are `usize` slot indices
//!   into a [`SentinelRing`], so the core is safe Rust with stable handles.
//! - **Sentinel node**: an empty cache is still a well-formed circle, which
//!   removes every empty/full edge case from the splice paths.
//! - **Node recycling**: evicting at capacity overwrites the LRU node in
//!   place instead of freeing and reallocating.
//! - **Values escape as `Arc<V>`** from the shared wrapper, never as
//!   references into the structure.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::policy::lru::LruCache;
//! use evictkit::traits::{CoreCache, ReadOnlyCache};
//!
//! let mut cache: LruCache<u32, String> = LruCache::new(2);
//! cache.insert(1, "one".to_string());
//! cache.insert(2, "two".to_string());
//!
//! // A hit promotes key 1, so key 2 becomes the eviction candidate.
//! cache.get(&1);
//! cache.insert(3, "three".to_string());
//!
//! assert!(cache.contains(&1));
//! assert!(!cache.contains(&2));
//! assert_eq!(cache.hit_count(), 1);
//! ```
//!
//! ## Thread Safety
//!
//! - `LruCore`: **not thread-safe**, single-threaded or externally locked.
//! - `SyncLruCache`: thread-safe via `parking_lot`.
//! - `UnsyncLruCache`: same API, free no-op lock, `!Sync` by construction.

use std::fmt;
use std::hash::Hash;
use std::mem;

use rustc_hash::FxHashMap;

#[cfg(feature = "concurrency")]
use std::sync::Arc;

#[cfg(feature = "concurrency")]
use parking_lot::lock_api::{self, RawMutex};

#[cfg(feature = "concurrency")]
use crate::lock::NoopRawMutex;

use crate::ds::{EntryId, SentinelRing};
use crate::error::{ConfigError, InvariantError};
use crate::metrics::{LruMetrics, LruMetricsSnapshot};
use crate::traits::{CoreCache, LruCacheTrait, MutableCache, ReadOnlyCache};

/// Capacity used by [`Default`] constructors.
pub const DEFAULT_MAX_SIZE: usize = 128;

/// Exact-LRU cache core: hash index plus arena-backed recency ring.
///
/// All operations are O(1) except full-cache traversals. Counters distinguish
/// hits, hard misses (plain lookup of an absent key), and soft misses
/// (lookup of an absent key satisfied by a caller-supplied default).
///
/// # Type Parameters
///
/// - `K`: key type, `Eq + Hash + Clone` (one clone of the key is kept in the
///   ring node so eviction can find its index entry)
/// - `V`: value type
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruCore;
/// use evictkit::traits::CoreCache;
///
/// let mut cache = LruCore::new(100);
/// cache.insert("key1", "value1");
/// assert_eq!(cache.get(&"key1"), Some(&"value1"));
/// ```
pub struct LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    index: FxHashMap<K, EntryId>,
    ring: SentinelRing<(K, V)>,
    capacity: usize,
    metrics: LruMetrics,
}

/// Type alias for single-threaded usage.
pub type LruCache<K, V> = LruCore<K, V>;

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a new LRU cache with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use [`try_new`](Self::try_new) to
    /// validate untrusted configuration without panicking.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::lru::LruCore;
    ///
    /// let cache: LruCore<u32, String> = LruCore::new(100);
    /// ```
    #[inline]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        LruCore {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            ring: SentinelRing::with_capacity(capacity),
            capacity,
            metrics: LruMetrics::default(),
        }
    }

    /// Creates a new LRU cache, rejecting a zero capacity.
    ///
    /// A cache that can hold nothing is a configuration mistake, not a
    /// degenerate mode worth supporting, so it is refused up front.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::lru::LruCore;
    ///
    /// assert!(LruCore::<u32, u32>::try_new(16).is_ok());
    /// assert!(LruCore::<u32, u32>::try_new(0).is_err());
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be > 0"));
        }
        Ok(Self::new(capacity))
    }

    /// Creates a cache preloaded with `entries`.
    ///
    /// Each entry is a regular insertion, so preloading more entries than
    /// `capacity` leaves exactly the `capacity` most recently supplied ones.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::lru::LruCore;
    /// use evictkit::traits::ReadOnlyCache;
    ///
    /// let cache = LruCore::with_entries(2, [(1, 'a'), (2, 'b'), (3, 'c')]);
    /// assert_eq!(cache.len(), 2);
    /// assert!(cache.contains(&2));
    /// assert!(cache.contains(&3));
    /// ```
    pub fn with_entries<I>(capacity: usize, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut cache = Self::new(capacity);
        cache.extend(entries);
        cache
    }

    /// Read-only lookup without promoting the entry.
    ///
    /// Does not count as a hit or a miss.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::lru::LruCore;
    /// use evictkit::traits::{CoreCache, ReadOnlyCache};
    ///
    /// let mut cache = LruCore::new(2);
    /// cache.insert(1, "first");
    /// cache.insert(2, "second");
    ///
    /// // Peek does not protect key 1 from eviction.
    /// assert_eq!(cache.peek(&1), Some(&"first"));
    /// cache.insert(3, "third");
    /// assert!(!cache.contains(&1));
    /// ```
    #[inline]
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = self.index.get(key).copied()?;
        self.ring.get(id).map(|entry| &entry.1)
    }

    /// Lookup with a caller-supplied fallback.
    ///
    /// On a hit this behaves exactly like [`get`](CoreCache::get). On a miss
    /// it returns `default`, bumps the soft-miss counter, and leaves the
    /// cache untouched — the default is never inserted.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::lru::LruCore;
    /// use evictkit::traits::{CoreCache, ReadOnlyCache};
    ///
    /// let mut cache = LruCore::new(2);
    /// cache.insert(1, "one");
    ///
    /// let fallback = "n/a";
    /// assert_eq!(*cache.get_or(&1, &fallback), "one");
    /// assert_eq!(*cache.get_or(&9, &fallback), "n/a");
    /// assert_eq!(cache.len(), 1);
    /// assert_eq!(cache.soft_miss_count(), 1);
    /// ```
    pub fn get_or<'a>(&'a mut self, key: &K, default: &'a V) -> &'a V {
        if self.index.contains_key(key) {
            match self.get(key) {
                Some(value) => value,
                None => default,
            }
        } else {
            self.metrics.record_soft_miss();
            default
        }
    }

    /// Returns the cached value for `key`, inserting `make()` on absence.
    ///
    /// A hit promotes the entry and counts as a hit; an absence counts as a
    /// soft miss (it is satisfied without failing) and may evict the LRU
    /// entry to admit the new one.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::lru::LruCore;
    ///
    /// let mut cache: LruCore<&str, usize> = LruCore::new(4);
    /// assert_eq!(*cache.get_or_insert_with("word", || "word".len()), 4);
    /// // Second call hits; the closure does not run again.
    /// assert_eq!(*cache.get_or_insert_with("word", || unreachable!()), 4);
    /// ```
    pub fn get_or_insert_with<F>(&mut self, key: K, make: F) -> &V
    where
        F: FnOnce() -> V,
    {
        let id = match self.index.get(&key).copied() {
            Some(id) => {
                self.metrics.record_hit();
                self.ring.move_to_front(id);
                id
            }
            None => {
                self.metrics.record_soft_miss();
                let value = make();
                self.insert_new(key, value)
            }
        };
        match self.ring.get(id) {
            Some(entry) => &entry.1,
            None => unreachable!("live id vanished from the ring"),
        }
    }

    /// Bulk-merges all entries from another cache.
    ///
    /// Keys are unique in the source, so the application order does not
    /// matter; keys already present are updated in place and promoted. The
    /// borrow checker rules out merging a cache into itself.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::lru::LruCore;
    /// use evictkit::traits::ReadOnlyCache;
    ///
    /// let mut a = LruCore::with_entries(4, [(1, "one"), (2, "two")]);
    /// let b = LruCore::with_entries(4, [(2, "TWO"), (3, "three")]);
    ///
    /// a.merge_from(&b);
    /// assert_eq!(a.len(), 3);
    /// assert_eq!(a.peek(&2), Some(&"TWO"));
    /// ```
    pub fn merge_from(&mut self, other: &Self)
    where
        V: Clone,
    {
        for (key, value) in other.iter() {
            self.insert(key.clone(), value.clone());
        }
    }

    /// Returns an iterator over entries from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.ring.iter().map(|entry| (&entry.0, &entry.1))
    }

    /// Returns an iterator over keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.ring.iter().map(|entry| &entry.0)
    }

    /// Returns an iterator over values from most to least recently used.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.ring.iter().map(|entry| &entry.1)
    }

    /// Number of lookups answered from the cache.
    #[inline]
    pub fn hit_count(&self) -> u64 {
        self.metrics.hits
    }

    /// Number of plain lookups of absent keys.
    #[inline]
    pub fn miss_count(&self) -> u64 {
        self.metrics.misses
    }

    /// Number of absent-key lookups satisfied by a caller-supplied default.
    #[inline]
    pub fn soft_miss_count(&self) -> u64 {
        self.metrics.soft_misses
    }

    /// Returns a point-in-time view of all counters plus size gauges.
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        LruMetricsSnapshot {
            hits: self.metrics.hits,
            misses: self.metrics.misses,
            soft_misses: self.metrics.soft_misses,
            insert_new: self.metrics.insert_new,
            insert_updates: self.metrics.insert_updates,
            evicted_entries: self.metrics.evicted_entries,
            cache_len: self.index.len(),
            capacity: self.capacity,
        }
    }

    /// Verifies the structural invariants tying the index to the ring.
    ///
    /// Intended for tests and debug assertions; a violation is always a bug
    /// in this crate.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() != self.ring.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but ring holds {} nodes",
                self.index.len(),
                self.ring.len()
            )));
        }
        if self.ring.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                self.ring.len(),
                self.capacity
            )));
        }
        let mut walked = 0usize;
        for (id, entry) in self.ring.iter_entries() {
            walked += 1;
            match self.index.get(&entry.0) {
                Some(&mapped) if mapped == id => {}
                Some(_) => {
                    return Err(InvariantError::new(
                        "index maps a key to a different node than the ring",
                    ))
                }
                None => {
                    return Err(InvariantError::new(
                        "ring node's key is missing from the index",
                    ))
                }
            }
        }
        if walked != self.ring.len() {
            return Err(InvariantError::new("ring links do not visit every node"));
        }
        Ok(())
    }

    /// Admits a key known to be absent, evicting the LRU entry at capacity.
    fn insert_new(&mut self, key: K, value: V) -> EntryId {
        self.metrics.record_insert_new();
        if self.ring.len() < self.capacity {
            let id = self.ring.push_front((key.clone(), value));
            self.index.insert(key, id);
            id
        } else {
            self.metrics.record_eviction();
            match self.ring.recycle_back((key.clone(), value)) {
                Some((id, (old_key, _evicted))) => {
                    self.index.remove(&old_key);
                    self.index.insert(key, id);
                    id
                }
                None => unreachable!("capacity is positive, ring cannot be empty at capacity"),
            }
        }
    }
}

impl<K, V> ReadOnlyCache<K> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> CoreCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Inserts or updates `key`.
    ///
    /// An existing key keeps its node: the value is overwritten in place and
    /// the entry is promoted to most recently used, so the cache never grows
    /// from re-insertion. A new key at capacity recycles the LRU node.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::lru::LruCore;
    /// use evictkit::traits::{CoreCache, ReadOnlyCache};
    ///
    /// let mut cache = LruCore::new(10);
    /// assert_eq!(cache.insert(1, "first"), None);
    /// assert_eq!(cache.insert(1, "second"), Some("first"));
    /// assert_eq!(cache.len(), 1);
    /// ```
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            self.metrics.record_insert_update();
            self.ring.move_to_front(id);
            return self
                .ring
                .get_mut(id)
                .map(|entry| mem::replace(&mut entry.1, value));
        }
        self.insert_new(key, value);
        None
    }

    /// Gets a value by key, promoting it to most recently used.
    ///
    /// A present key counts as a hit, an absent one as a hard miss.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::lru::LruCore;
    /// use evictkit::traits::CoreCache;
    ///
    /// let mut cache = LruCore::new(10);
    /// cache.insert(1, "value");
    ///
    /// assert_eq!(cache.get(&1), Some(&"value"));
    /// assert_eq!(cache.get(&99), None);
    /// assert_eq!(cache.hit_count(), 1);
    /// assert_eq!(cache.miss_count(), 1);
    /// ```
    fn get(&mut self, key: &K) -> Option<&V> {
        match self.index.get(key).copied() {
            Some(id) => {
                self.metrics.record_hit();
                self.ring.move_to_front(id);
                self.ring.get(id).map(|entry| &entry.1)
            }
            None => {
                self.metrics.record_hard_miss();
                None
            }
        }
    }

    fn clear(&mut self) {
        self.index.clear();
        self.ring.clear();
    }
}

impl<K, V> MutableCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Removes an entry; the freed node goes back on the arena free list.
    #[inline]
    fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        self.ring.remove(id).map(|(_, value)| value)
    }
}

impl<K, V> LruCacheTrait<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_lru(&mut self) -> Option<(K, V)> {
        let (key, value) = self.ring.pop_back()?;
        self.index.remove(&key);
        self.metrics.record_eviction();
        Some((key, value))
    }

    fn peek_lru(&self) -> Option<(&K, &V)> {
        self.ring.back().map(|entry| (&entry.0, &entry.1))
    }

    fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key).copied() {
            Some(id) => {
                self.ring.move_to_front(id);
                true
            }
            None => false,
        }
    }
}

/// Two caches are equal iff they hold the same key→value pairs.
///
/// Capacity, recency order, and counters are deliberately excluded.
impl<K, V> PartialEq for LruCore<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.index.len() == other.index.len()
            && self.iter().all(|(key, value)| other.peek(key) == Some(value))
    }
}

impl<K, V> Eq for LruCore<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq,
{
}

struct ContentsDebug<'a, K, V>(&'a SentinelRing<(K, V)>);

impl<K, V> fmt::Debug for ContentsDebug<'_, K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|entry| (&entry.0, &entry.1)))
            .finish()
    }
}

/// Shows the capacity and the key→value contents, never the ring links.
impl<K, V> fmt::Debug for LruCore<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("entries", &ContentsDebug(&self.ring))
            .finish()
    }
}

impl<K, V> Default for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU cache with [`DEFAULT_MAX_SIZE`] capacity.
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}

/// Bulk sequence update: pairs are applied in order, so when a key appears
/// several times the last pair wins and decides the entry's recency position.
impl<K, V> Extend<(K, V)> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

// ---------------------------------------------------------------------------
// SharedLruCache: lock-guarded wrapper
// ---------------------------------------------------------------------------

/// Thread-shareable LRU cache guarded by one mutex per instance.
///
/// Every operation acquires the lock for its full duration and releases it on
/// every exit path; there is no reader/writer split because even lookups
/// reorder the ring. Values are stored as `Arc<V>` and escape only as `Arc`
/// clones — callers never hold references into the structure.
///
/// The raw mutex type `R` is picked at construction time through the type:
/// [`SyncLruCache`] locks for real, [`UnsyncLruCache`] uses the free
/// [`NoopRawMutex`] and is `!Sync`, keeping the identical API surface for
/// single-threaded embeddings.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::SyncLruCache;
///
/// let cache: SyncLruCache<u32, String> = SyncLruCache::new(100);
/// cache.insert(1, "first".to_string());
///
/// let value = cache.get(&1).unwrap();
/// assert_eq!(*value, "first");
/// ```
#[cfg(feature = "concurrency")]
pub struct SharedLruCache<K, V, R = parking_lot::RawMutex>
where
    K: Eq + Hash + Clone,
    R: RawMutex,
{
    inner: Arc<lock_api::Mutex<R, LruCore<K, Arc<V>>>>,
}

/// Shared LRU cache with real mutual exclusion.
#[cfg(feature = "concurrency")]
pub type SyncLruCache<K, V> = SharedLruCache<K, V, parking_lot::RawMutex>;

/// Shared-API LRU cache with a no-op lock for single-threaded use.
#[cfg(feature = "concurrency")]
pub type UnsyncLruCache<K, V> = SharedLruCache<K, V, NoopRawMutex>;

#[cfg(feature = "concurrency")]
impl<K, V, R> SharedLruCache<K, V, R>
where
    K: Eq + Hash + Clone,
    R: RawMutex,
{
    /// Creates a new shared LRU cache with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; see [`try_new`](Self::try_new).
    pub fn new(capacity: usize) -> Self {
        SharedLruCache {
            inner: Arc::new(lock_api::Mutex::new(LruCore::new(capacity))),
        }
    }

    /// Creates a new shared LRU cache, rejecting a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(SharedLruCache {
            inner: Arc::new(lock_api::Mutex::new(LruCore::try_new(capacity)?)),
        })
    }

    /// Creates a cache preloaded with `entries` (newest survive overflow).
    pub fn with_entries<I>(capacity: usize, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let shared = Self::new(capacity);
        shared.merge(entries);
        shared
    }

    /// Inserts a value, wrapping it in `Arc<V>` internally.
    ///
    /// Returns the previous `Arc<V>` if the key existed.
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        self.inner.lock().insert(key, Arc::new(value))
    }

    /// Inserts a pre-wrapped `Arc<V>` without re-wrapping.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use evictkit::policy::lru::SyncLruCache;
    ///
    /// let cache: SyncLruCache<u32, String> = SyncLruCache::new(8);
    /// let shared = Arc::new("shared".to_string());
    /// cache.insert_arc(1, Arc::clone(&shared));
    ///
    /// assert!(Arc::ptr_eq(&shared, &cache.get(&1).unwrap()));
    /// ```
    pub fn insert_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        self.inner.lock().insert(key, value)
    }

    /// Gets a value, promoting it to most recently used.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().get(key).map(Arc::clone)
    }

    /// Lookup with a fallback; the default is never inserted.
    ///
    /// A miss counts as a soft miss, not a hard one.
    pub fn get_or(&self, key: &K, default: Arc<V>) -> Arc<V> {
        let mut cache = self.inner.lock();
        Arc::clone(cache.get_or(key, &default))
    }

    /// Reads a value without promoting it.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().peek(key).map(Arc::clone)
    }

    /// Removes an entry and returns its value.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().remove(key)
    }

    /// Promotes an entry without retrieving it; `true` if the key was found.
    pub fn touch(&self, key: &K) -> bool {
        self.inner.lock().touch(key)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&self) -> Option<(K, Arc<V>)> {
        self.inner.lock().pop_lru()
    }

    /// Returns the least recently used entry without removing it.
    pub fn peek_lru(&self) -> Option<(K, Arc<V>)> {
        let cache = self.inner.lock();
        cache.peek_lru().map(|(key, value)| (key.clone(), Arc::clone(value)))
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns the maximum capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Returns `true` if the key exists, without promoting it.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.inner.lock().clear()
    }

    /// Returns the keys from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        self.inner.lock().keys().cloned().collect()
    }

    /// Returns all entries from most to least recently used.
    pub fn entries(&self) -> Vec<(K, Arc<V>)> {
        self.inner
            .lock()
            .iter()
            .map(|(key, value)| (key.clone(), Arc::clone(value)))
            .collect()
    }

    /// Bulk sequence update under a single lock acquisition.
    ///
    /// Pairs apply in order; the last pair for a key wins and fixes the
    /// entry's recency position.
    pub fn merge<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut cache = self.inner.lock();
        for (key, value) in entries {
            cache.insert(key, Arc::new(value));
        }
    }

    /// Bulk-merges all entries from another shared cache.
    ///
    /// Merging a cache into itself is a no-op (and never a self-deadlock).
    /// For distinct instances the source is snapshotted before the
    /// destination lock is taken, so two threads cross-merging cannot
    /// deadlock on lock order.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::lru::SyncLruCache;
    ///
    /// let a: SyncLruCache<u32, &str> = SyncLruCache::with_entries(4, [(1, "one")]);
    /// let b = SyncLruCache::with_entries(4, [(2, "two")]);
    ///
    /// a.merge_from(&b);
    /// assert_eq!(a.len(), 2);
    ///
    /// // Self-merge changes nothing.
    /// a.merge_from(&a);
    /// assert_eq!(a.len(), 2);
    /// ```
    pub fn merge_from(&self, other: &Self) {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return;
        }
        let snapshot = other.entries();
        let mut cache = self.inner.lock();
        for (key, value) in snapshot {
            cache.insert(key, value);
        }
    }

    /// Number of lookups answered from the cache.
    pub fn hit_count(&self) -> u64 {
        self.inner.lock().hit_count()
    }

    /// Number of plain lookups of absent keys.
    pub fn miss_count(&self) -> u64 {
        self.inner.lock().miss_count()
    }

    /// Number of absent-key lookups satisfied by a caller-supplied default.
    pub fn soft_miss_count(&self) -> u64 {
        self.inner.lock().soft_miss_count()
    }

    /// Returns a point-in-time view of all counters plus size gauges.
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        self.inner.lock().metrics_snapshot()
    }

    /// Verifies structural invariants; see [`LruCore::check_invariants`].
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }
}

#[cfg(feature = "concurrency")]
impl<K, V, R> Clone for SharedLruCache<K, V, R>
where
    K: Eq + Hash + Clone,
    R: RawMutex,
{
    /// Clones the handle; both handles address the same cache.
    fn clone(&self) -> Self {
        SharedLruCache {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(feature = "concurrency")]
impl<K, V, R> Default for SharedLruCache<K, V, R>
where
    K: Eq + Hash + Clone,
    R: RawMutex,
{
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}

/// Contents-only equality, mirroring [`LruCore`]'s `PartialEq`.
#[cfg(feature = "concurrency")]
impl<K, V, R> PartialEq for SharedLruCache<K, V, R>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
    R: RawMutex,
{
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        let snapshot = other.entries();
        let cache = self.inner.lock();
        cache.len() == snapshot.len()
            && snapshot
                .iter()
                .all(|(key, value)| cache.peek(key) == Some(value))
    }
}

#[cfg(feature = "concurrency")]
impl<K, V, R> fmt::Debug for SharedLruCache<K, V, R>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: fmt::Debug,
    R: RawMutex,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.lock();
        f.debug_struct("SharedLruCache")
            .field("capacity", &cache.capacity)
            .field("entries", &ContentsDebug(&cache.ring))
            .finish()
    }
}

//! Least Recently Inserted (LRI) read-through cache.
//!
//! A capacity-bounded map that computes missing values through a loader
//! callback fixed at construction, and evicts in strict first-insertion
//! order. Reads are never "touches": a key's eviction slot is decided the
//! moment it is first populated, no matter how often it is read afterwards.
//! That makes LRI a FIFO policy, deliberately simpler and cheaper than
//! [`lru`](crate::policy::lru) — there is no recency list to maintain and no
//! lock to take.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────────────────────────────┐
//!   │                     LriCache<K, V, F>                           │
//!   │                                                                 │
//!   │   store: FxHashMap<K, V>        queue: VecDeque<K>              │
//!   │          key → value                   first-insertion order    │
//!   │                                                                 │
//!   │   ┌──────────┬──────┐           ┌───────────────────────┐       │
//!   │   │   Key    │Value │           │ front          back   │       │
//!   │   ├──────────┼──────┤           ├───────────────────────┤       │
//!   │   │   "a"    │  va  │           │ [a] [b] [c] [d]       │       │
//!   │   │   "b"    │  vb  │           │  ↑           ↑        │       │
//!   │   │   "c"    │  vc  │           │ oldest      newest    │       │
//!   │   │   "d"    │  vd  │           │ EVICT       keep      │       │
//!   │   └──────────┴──────┘           └───────────────────────┘       │
//!   │                                                                 │
//!   │   on_miss: F                    invoked exactly on absence      │
//!   └─────────────────────────────────────────────────────────────────┘
//!
//!   get(k), k absent:
//!     1. value = on_miss(k)          (a panic here leaves no trace)
//!     2. store[k] = value, queue.push_back(k)
//!     3. if queue.len() > capacity: evict queue.front()
//! ```
//!
//! ## When to Use
//!
//! **Use LRI when:**
//! - population order is the right retention signal (streaming ingest,
//!   session-scoped memoization)
//! - values are derivable from keys and you want miss handling in one place
//!
//! **Avoid LRI when:**
//! - temporal locality matters (use [`LruCore`](crate::policy::lru::LruCore))
//! - multiple threads mutate the cache (LRI carries no lock; serialize
//!   externally or keep it thread-local)

use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::error::{ConfigError, InvariantError};
use crate::traits::ReadOnlyCache;

/// Read-through FIFO cache: misses are computed by the loader, eviction
/// follows first-insertion order.
///
/// # Type Parameters
///
/// - `K`: key type, `Eq + Hash + Clone` (the key is held by both the store
///   and the insertion queue)
/// - `V`: value type
/// - `F`: loader, `Fn(&K) -> V`, side-effect-free by contract
///
/// # Example
///
/// ```
/// use evictkit::policy::lri::LriCache;
/// use evictkit::traits::ReadOnlyCache;
///
/// let mut cache = LriCache::new(2, |k: &&str| k.to_uppercase());
///
/// assert_eq!(cache.get(&"a"), "A");   // loader runs
/// assert_eq!(cache.get(&"b"), "B");
/// assert_eq!(cache.get(&"a"), "A");   // hit: pure read, no reorder
///
/// // "a" is still the oldest insertion, so it goes first.
/// assert_eq!(cache.get(&"c"), "C");
/// assert!(!cache.contains(&"a"));
/// assert!(cache.contains(&"b"));
/// ```
pub struct LriCache<K, V, F>
where
    K: Eq + Hash + Clone,
    F: Fn(&K) -> V,
{
    store: FxHashMap<K, V>,
    queue: VecDeque<K>,
    capacity: usize,
    on_miss: F,
}

impl<K, V, F> LriCache<K, V, F>
where
    K: Eq + Hash + Clone,
    F: Fn(&K) -> V,
{
    /// Creates a new LRI cache with the given capacity and miss loader.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use [`try_new`](Self::try_new) to
    /// validate untrusted configuration without panicking.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::lri::LriCache;
    /// use evictkit::traits::ReadOnlyCache;
    ///
    /// let cache = LriCache::new(64, |k: &u32| k * 2);
    /// assert_eq!(cache.capacity(), 64);
    /// ```
    #[inline]
    pub fn new(capacity: usize, on_miss: F) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        Self {
            store: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            queue: VecDeque::with_capacity(capacity),
            capacity,
            on_miss,
        }
    }

    /// Creates a new LRI cache, rejecting a zero capacity.
    pub fn try_new(capacity: usize, on_miss: F) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be > 0"));
        }
        Ok(Self::new(capacity, on_miss))
    }

    /// Returns the value for `key`, computing and storing it on absence.
    ///
    /// A hit is a pure read. A miss invokes the loader synchronously, stores
    /// the result, queues the key, and then evicts the oldest-queued key if
    /// the bound was exceeded. A panicking loader propagates unchanged and
    /// leaves the cache without the key — the store and queue are only
    /// touched after the loader returns.
    pub fn get(&mut self, key: &K) -> &V {
        if !self.store.contains_key(key) {
            let value = (self.on_miss)(key);
            self.store.insert(key.clone(), value);
            self.queue.push_back(key.clone());
            if self.queue.len() > self.capacity {
                if let Some(oldest) = self.queue.pop_front() {
                    self.store.remove(&oldest);
                }
            }
        }
        &self.store[key]
    }

    /// Probes for a resident value without invoking the loader.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::lri::LriCache;
    ///
    /// let mut cache = LriCache::new(4, |k: &u32| k + 1);
    /// assert_eq!(cache.peek(&1), None); // no population
    /// cache.get(&1);
    /// assert_eq!(cache.peek(&1), Some(&2));
    /// ```
    #[inline]
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.store.get(key)
    }

    /// Explicitly deletes an entry, returning its value if it was resident.
    ///
    /// The key's queue slot is dropped as well, which costs a queue scan.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let value = self.store.remove(key)?;
        if let Some(pos) = self.queue.iter().position(|queued| queued == key) {
            self.queue.remove(pos);
        }
        Some(value)
    }

    /// Removes all entries; the loader is retained.
    pub fn clear(&mut self) {
        self.store.clear();
        self.queue.clear();
    }

    /// Returns an iterator over entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.queue.iter().map(move |key| (key, &self.store[key]))
    }

    /// Returns an iterator over keys in first-insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.queue.iter()
    }

    /// Verifies that the store and the insertion queue agree.
    ///
    /// Intended for tests; a violation is always a bug in this crate.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.store.len() != self.queue.len() {
            return Err(InvariantError::new(format!(
                "store holds {} keys but queue holds {}",
                self.store.len(),
                self.queue.len()
            )));
        }
        if self.queue.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                self.queue.len(),
                self.capacity
            )));
        }
        for key in &self.queue {
            if !self.store.contains_key(key) {
                return Err(InvariantError::new("queued key is missing from the store"));
            }
        }
        Ok(())
    }
}

impl<K, V, F> ReadOnlyCache<K> for LriCache<K, V, F>
where
    K: Eq + Hash + Clone,
    F: Fn(&K) -> V,
{
    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.store.contains_key(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Shows the capacity and the key→value contents; the loader is elided.
impl<K, V, F> fmt::Debug for LriCache<K, V, F>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: fmt::Debug,
    F: Fn(&K) -> V,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LriCache")
            .field("capacity", &self.capacity)
            .field("entries", &self.store)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper() -> impl Fn(&&'static str) -> String {
        |key| key.to_uppercase()
    }

    mod correctness {
        use super::*;

        #[test]
        fn test_miss_populates_through_loader() {
            let mut cache = LriCache::new(4, |k: &u32| k * 10);
            assert_eq!(*cache.get(&3), 30);
            assert_eq!(cache.len(), 1);
            assert!(cache.contains(&3));
        }

        #[test]
        fn test_hit_is_a_pure_read() {
            let mut cache = LriCache::new(2, upper());
            cache.get(&"a");
            cache.get(&"b");

            // Reading "a" must not refresh its queue slot.
            assert_eq!(cache.get(&"a"), "A");
            let order: Vec<_> = cache.keys().copied().collect();
            assert_eq!(order, vec!["a", "b"]);
        }

        #[test]
        fn test_fifo_eviction_ignores_reads() {
            let mut cache = LriCache::new(2, upper());
            assert_eq!(cache.get(&"a"), "A");
            assert_eq!(cache.get(&"b"), "B");
            assert_eq!(cache.get(&"a"), "A"); // most recently *read*
            assert_eq!(cache.get(&"c"), "C"); // still evicts "a"

            assert!(!cache.contains(&"a"));
            assert!(cache.contains(&"b"));
            assert!(cache.contains(&"c"));
            assert_eq!(cache.len(), 2);
        }

        #[test]
        fn test_sustained_overflow_keeps_bound() {
            let mut cache = LriCache::new(10, |k: &u32| *k);
            for i in 0..100 {
                cache.get(&i);
                assert!(cache.len() <= 10);
                cache.check_invariants().unwrap();
            }
            // The ten newest insertions survive.
            for i in 90..100 {
                assert!(cache.contains(&i));
            }
        }

        #[test]
        fn test_loader_runs_once_per_resident_key() {
            use std::cell::Cell;
            let calls = Cell::new(0u32);
            let mut cache = LriCache::new(4, |k: &u32| {
                calls.set(calls.get() + 1);
                k + 1
            });

            cache.get(&1);
            cache.get(&1);
            cache.get(&1);
            assert_eq!(calls.get(), 1);

            cache.get(&2);
            assert_eq!(calls.get(), 2);
        }

        #[test]
        fn test_reload_after_eviction() {
            use std::cell::Cell;
            let calls = Cell::new(0u32);
            let mut cache = LriCache::new(1, |k: &u32| {
                calls.set(calls.get() + 1);
                *k
            });

            cache.get(&1);
            cache.get(&2); // evicts 1
            cache.get(&1); // loads again
            assert_eq!(calls.get(), 3);
        }
    }

    mod removal {
        use super::*;

        #[test]
        fn test_remove_drops_store_and_queue() {
            let mut cache = LriCache::new(4, upper());
            cache.get(&"a");
            cache.get(&"b");

            assert_eq!(cache.remove(&"a"), Some("A".to_string()));
            assert_eq!(cache.len(), 1);
            let order: Vec<_> = cache.keys().copied().collect();
            assert_eq!(order, vec!["b"]);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn test_remove_absent_is_none() {
            let mut cache = LriCache::new(4, upper());
            assert_eq!(cache.remove(&"ghost"), None);
        }

        #[test]
        fn test_removed_slot_frees_room() {
            let mut cache = LriCache::new(2, upper());
            cache.get(&"a");
            cache.get(&"b");
            cache.remove(&"a");
            cache.get(&"c");

            // No eviction was needed, so "b" is still resident.
            assert!(cache.contains(&"b"));
            assert!(cache.contains(&"c"));
            assert_eq!(cache.len(), 2);
        }

        #[test]
        fn test_clear_retains_loader() {
            let mut cache = LriCache::new(4, |k: &u32| k * 2);
            cache.get(&1);
            cache.clear();
            assert!(cache.is_empty());
            assert_eq!(*cache.get(&5), 10);
        }
    }

    mod loader_failure {
        use super::*;
        use std::panic::{catch_unwind, AssertUnwindSafe};

        #[test]
        fn test_panicking_loader_leaves_no_partial_state() {
            let mut cache = LriCache::new(4, |k: &&str| {
                if *k == "boom" {
                    panic!("loader failure");
                }
                k.to_uppercase()
            });
            cache.get(&"a");

            let result = catch_unwind(AssertUnwindSafe(|| {
                cache.get(&"boom");
            }));
            assert!(result.is_err());

            assert!(!cache.contains(&"boom"));
            assert_eq!(cache.len(), 1);
            cache.check_invariants().unwrap();

            // The cache still works after the unwind.
            assert_eq!(cache.get(&"b"), "B");
        }
    }

    mod construction {
        use super::*;

        #[test]
        fn test_try_new_rejects_zero() {
            let err = LriCache::try_new(0, |k: &u32| *k).unwrap_err();
            assert!(err.to_string().contains("capacity"));
        }

        #[test]
        #[should_panic(expected = "capacity must be > 0")]
        fn test_new_panics_on_zero() {
            let _ = LriCache::new(0, |k: &u32| *k);
        }
    }

    mod representation {
        use super::*;

        #[test]
        fn test_iteration_is_insertion_order() {
            let mut cache = LriCache::new(4, |k: &u32| *k);
            cache.get(&3);
            cache.get(&1);
            cache.get(&2);

            let keys: Vec<_> = cache.keys().copied().collect();
            assert_eq!(keys, vec![3, 1, 2]);
            let entries: Vec<_> = cache.iter().map(|(k, v)| (*k, *v)).collect();
            assert_eq!(entries, vec![(3, 3), (1, 1), (2, 2)]);
        }

        #[test]
        fn test_debug_shows_capacity_and_contents() {
            let mut cache = LriCache::new(3, |k: &u32| k + 1);
            cache.get(&1);
            let out = format!("{:?}", cache);

            assert!(out.contains("capacity: 3"));
            assert!(out.contains("1: 2"));
            assert!(!out.contains("on_miss"));
        }
    }
}

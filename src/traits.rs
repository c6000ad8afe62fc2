//! # Cache Trait Hierarchy
//!
//! Capability traits for the cache subsystem. A cache is not "a kind of" map;
//! each policy exposes a mapping-like capability through composition, and
//! client code programs against the narrowest trait it needs.
//!
//! ```text
//!        ┌───────────────────────────────┐
//!        │       ReadOnlyCache<K>        │
//!        │  contains / len / is_empty /  │
//!        │  capacity                     │
//!        └───────────────┬───────────────┘
//!                        │
//!        ┌───────────────▼───────────────┐
//!        │        CoreCache<K, V>        │
//!        │  insert / get / clear         │
//!        └───────────────┬───────────────┘
//!                        │
//!        ┌───────────────▼───────────────┐
//!        │      MutableCache<K, V>       │
//!        │  remove                       │
//!        └───────────────┬───────────────┘
//!                        │
//!        ┌───────────────▼───────────────┐
//!        │     LruCacheTrait<K, V>       │
//!        │  pop_lru / peek_lru / touch   │
//!        └───────────────────────────────┘
//! ```
//!
//! [`LruCore`](crate::policy::lru::LruCore) implements the full stack.
//! [`LriCache`](crate::policy::lri::LriCache) implements only
//! [`ReadOnlyCache`]: its entries are created by the miss loader and nothing
//! else, so exposing `insert` would let callers bypass the loader contract,
//! the same way arbitrary removal would break a FIFO queue's insertion order.

/// Read-only cache observations: existence, size, capacity.
///
/// None of these operations may affect eviction order.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruCore;
/// use evictkit::traits::{CoreCache, ReadOnlyCache};
///
/// fn report<K, C: ReadOnlyCache<K>>(cache: &C) -> (usize, usize) {
///     (cache.len(), cache.capacity())
/// }
///
/// let mut cache = LruCore::new(8);
/// cache.insert(1u64, "one");
/// assert_eq!(report(&cache), (1, 8));
/// ```
pub trait ReadOnlyCache<K> {
    /// Checks if a key exists without updating access state.
    fn contains(&self, key: &K) -> bool;

    /// Returns the current number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of entries the cache can hold.
    fn capacity(&self) -> usize;
}

/// Core mutating operations shared by every policy that accepts writes.
pub trait CoreCache<K, V>: ReadOnlyCache<K> {
    /// Inserts a key-value pair, returning the previous value if the key
    /// existed.
    ///
    /// At capacity, an absent-key insert evicts one entry according to the
    /// policy before the new entry is admitted.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Gets a reference to a value by key.
    ///
    /// May update internal recency state depending on the policy; use
    /// [`contains`](ReadOnlyCache::contains) to probe without side effects.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Removes all entries.
    fn clear(&mut self);
}

/// Adds arbitrary key-based removal.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes an entry by key, returning its value if it existed.
    fn remove(&mut self, key: &K) -> Option<V>;
}

/// LRU-specific operations over the recency order.
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least recently used entry.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Returns the least recently used entry without removing it.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Marks a key as most recently used without retrieving its value.
    ///
    /// Returns `true` if the key was found.
    fn touch(&mut self, key: &K) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::lri::LriCache;
    use crate::policy::lru::LruCore;

    #[test]
    fn lru_core_satisfies_the_full_stack() {
        fn wants_lru<K, V, C: LruCacheTrait<K, V>>(_: &C) {}
        let cache: LruCore<u32, u32> = LruCore::new(4);
        wants_lru(&cache);
    }

    #[test]
    fn lri_cache_is_read_only_observable() {
        fn wants_read_only<K, C: ReadOnlyCache<K>>(_: &C) {}
        let cache = LriCache::new(4, |k: &u32| k * 2);
        wants_read_only(&cache);
    }

    #[test]
    fn generic_helper_works_across_policies() {
        fn half_full<K, C: ReadOnlyCache<K>>(cache: &C) -> bool {
            cache.len() * 2 >= cache.capacity()
        }

        let mut lru: LruCore<u32, &str> = LruCore::new(4);
        lru.insert(1, "a");
        lru.insert(2, "b");
        assert!(half_full(&lru));

        let lri = LriCache::new(4, |k: &u32| *k);
        assert!(!half_full(&lri));
    }
}

//! Hit/miss instrumentation for the LRU policy.
//!
//! Recording and snapshotting are split the way the rest of the crate splits
//! mutation from observation: [`LruMetrics`] is the internal recorder owned by
//! the cache core and bumped inside the lock, [`LruMetricsSnapshot`] is the
//! `Copy` view handed to callers.
//!
//! A *hard miss* is a plain lookup of an absent key; a *soft miss* is a lookup
//! of an absent key that the caller satisfied with a default. The two are
//! counted separately because they signal different things: hard misses are
//! cache ineffectiveness, soft misses are expected fallbacks.

/// Counters recorded by [`LruCore`](crate::policy::lru::LruCore).
///
/// Plain `u64` fields; every recording path holds `&mut` on the cache, so no
/// interior mutability is needed.
#[derive(Debug, Default, Clone)]
pub(crate) struct LruMetrics {
    pub hits: u64,
    pub misses: u64,
    pub soft_misses: u64,
    pub insert_new: u64,
    pub insert_updates: u64,
    pub evicted_entries: u64,
}

impl LruMetrics {
    #[inline]
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    #[inline]
    pub fn record_hard_miss(&mut self) {
        self.misses += 1;
    }

    #[inline]
    pub fn record_soft_miss(&mut self) {
        self.soft_misses += 1;
    }

    #[inline]
    pub fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    #[inline]
    pub fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    #[inline]
    pub fn record_eviction(&mut self) {
        self.evicted_entries += 1;
    }
}

/// Point-in-time view of an LRU cache's counters plus size gauges.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruCore;
/// use evictkit::traits::CoreCache;
///
/// let mut cache = LruCore::new(2);
/// cache.insert(1, "one");
/// cache.get(&1);
/// cache.get(&2);
///
/// let snap = cache.metrics_snapshot();
/// assert_eq!(snap.hits, 1);
/// assert_eq!(snap.misses, 1);
/// assert_eq!(snap.cache_len, 1);
/// assert_eq!(snap.capacity, 2);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct LruMetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub soft_misses: u64,

    pub insert_new: u64,
    pub insert_updates: u64,
    pub evicted_entries: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorders_bump_the_right_counter() {
        let mut m = LruMetrics::default();
        m.record_hit();
        m.record_hit();
        m.record_hard_miss();
        m.record_soft_miss();
        m.record_insert_new();
        m.record_insert_update();
        m.record_eviction();

        assert_eq!(m.hits, 2);
        assert_eq!(m.misses, 1);
        assert_eq!(m.soft_misses, 1);
        assert_eq!(m.insert_new, 1);
        assert_eq!(m.insert_updates, 1);
        assert_eq!(m.evicted_entries, 1);
    }

    #[test]
    fn snapshot_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<LruMetricsSnapshot>();
    }
}

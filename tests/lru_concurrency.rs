// ==============================================
// SHARED LRU CACHE CONCURRENCY TESTS (integration)
// ==============================================
//
// Threads hammer one SharedLruCache through its per-instance lock. The lock
// serializes every operation, so whatever interleaving the scheduler picks,
// the final state must be one a sequential execution could have produced:
// the capacity bound holds, the structure is internally consistent, and
// every surviving value is one some thread actually wrote.

#![cfg(feature = "concurrency")]

use std::thread;

use evictkit::policy::lru::{SyncLruCache, UnsyncLruCache};

#[test]
fn interleaved_inserts_and_gets_serialize() {
    const THREADS: u64 = 8;
    const OPS_PER_THREAD: u64 = 500;
    const CAPACITY: usize = 32;

    let cache: SyncLruCache<u64, u64> = SyncLruCache::new(CAPACITY);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 0..OPS_PER_THREAD {
                    let key = (t * OPS_PER_THREAD + i) % 64;
                    cache.insert(key, t * 1_000_000 + key);
                    if let Some(value) = cache.get(&key) {
                        // Any thread may have overwritten the key since our
                        // insert, but the value always encodes its key.
                        assert_eq!(*value % 1_000_000, key);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= CAPACITY);
    cache.check_invariants().unwrap();

    // Every surviving entry was written by some thread, verbatim.
    for (key, value) in cache.entries() {
        let writer = *value / 1_000_000;
        assert!(writer < THREADS);
        assert_eq!(*value % 1_000_000, key);
    }

    // The serialized operation count is visible in the counters.
    let snap = cache.metrics_snapshot();
    assert_eq!(
        snap.hits + snap.misses,
        THREADS * OPS_PER_THREAD,
        "each get resolved to exactly one of hit or hard miss"
    );
}

#[test]
fn concurrent_removals_never_break_structure() {
    const CAPACITY: usize = 16;
    let cache: SyncLruCache<u64, u64> = SyncLruCache::new(CAPACITY);

    let writers: Vec<_> = (0..4u64)
        .map(|t| {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 0..400u64 {
                    let key = i % 24;
                    if (t + i) % 3 == 0 {
                        cache.remove(&key);
                    } else {
                        cache.insert(key, i);
                    }
                    cache.touch(&(key / 2));
                }
            })
        })
        .collect();

    for handle in writers {
        handle.join().unwrap();
    }

    assert!(cache.len() <= CAPACITY);
    cache.check_invariants().unwrap();
}

#[test]
fn cross_merges_from_two_threads_do_not_deadlock() {
    let a: SyncLruCache<u64, u64> = SyncLruCache::with_entries(64, (0..32).map(|i| (i, i)));
    let b: SyncLruCache<u64, u64> =
        SyncLruCache::with_entries(64, (32..64).map(|i| (i, i)));

    let (a2, b2) = (a.clone(), b.clone());
    let forward = thread::spawn(move || {
        for _ in 0..200 {
            a2.merge_from(&b2);
        }
    });
    let (a3, b3) = (a.clone(), b.clone());
    let backward = thread::spawn(move || {
        for _ in 0..200 {
            b3.merge_from(&a3);
        }
    });

    forward.join().unwrap();
    backward.join().unwrap();

    // Both caches end up holding all 64 keys.
    assert_eq!(a.len(), 64);
    assert_eq!(b.len(), 64);
    a.check_invariants().unwrap();
    b.check_invariants().unwrap();
}

#[test]
fn shared_values_outlive_eviction() {
    let cache: SyncLruCache<u64, Vec<u8>> = SyncLruCache::new(1);
    cache.insert(1, vec![1, 2, 3]);

    let held = cache.get(&1).unwrap();
    cache.insert(2, vec![4, 5, 6]); // evicts key 1

    // The caller's Arc keeps the evicted value alive.
    assert_eq!(*held, vec![1, 2, 3]);
    assert!(!cache.contains(&1));
}

#[test]
fn sync_handles_cross_threads() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<SyncLruCache<u64, String>>();
    assert_sync::<SyncLruCache<u64, String>>();
    // UnsyncLruCache is deliberately neither: its no-op lock provides no
    // exclusion, so the handle cannot leave the thread that built it.
}

#[test]
fn noop_locked_cache_matches_sync_semantics() {
    let sync: SyncLruCache<u64, u64> = SyncLruCache::new(3);
    let unsync: UnsyncLruCache<u64, u64> = UnsyncLruCache::new(3);

    for (key, value) in [(1, 10), (2, 20), (3, 30), (1, 11), (4, 40)] {
        sync.insert(key, value);
        unsync.insert(key, value);
    }
    sync.get(&2);
    unsync.get(&2);

    assert_eq!(sync.keys(), unsync.keys());
    assert_eq!(sync.hit_count(), unsync.hit_count());
    unsync.check_invariants().unwrap();
}

pub use crate::ds::{EntryId, SentinelRing};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::metrics::LruMetricsSnapshot;
pub use crate::policy::lri::LriCache;
pub use crate::policy::lru::{LruCache, LruCore, DEFAULT_MAX_SIZE};
pub use crate::traits::{CoreCache, LruCacheTrait, MutableCache, ReadOnlyCache};

#[cfg(feature = "concurrency")]
pub use crate::lock::NoopRawMutex;
#[cfg(feature = "concurrency")]
pub use crate::policy::lru::{SharedLruCache, SyncLruCache, UnsyncLruCache};

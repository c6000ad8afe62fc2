pub mod ring;

pub use ring::{EntryId, SentinelRing};

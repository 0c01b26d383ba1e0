//! Local persistent cache for offline access.
//!
//! This module provides:
//! - `KeyValueStore`: the storage port, with a file-backed and an in-memory
//!   implementation
//! - `CacheManager`: JSON read/write over a store plus the network-first
//!   accessor that falls back to the last cached value
//!
//! Entries have no TTL. They persist until overwritten or removed.

pub mod error;
pub mod manager;
pub mod store;

pub use error::CacheError;
pub use manager::{CacheManager, ACCESS_TOKEN_KEY, EVENTS_KEY, USER_INFO_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore};

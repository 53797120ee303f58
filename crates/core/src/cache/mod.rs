//! Feed metadata caches.
//!
//! This module provides storage for per-URL feed metadata:
//!
//! - A disk cache storing one JSON file per URL in a dedicated directory
//! - An in-memory cache for tests and short-lived processes
//! - The lossy URL → file name key encoding used by the disk cache

pub mod disk;
pub mod envelope;
pub mod key;
pub mod memory;

use url::Url;

pub use crate::Error;

pub use disk::DiskCache;
pub use key::cache_key;
pub use memory::MemoryCache;

/// Operations shared by every feed metadata cache.
///
/// A miss is `Ok(None)`. Any `Err` means the cache could not answer and the
/// caller should treat it as unavailable.
pub trait FeedInfoCache {
    type Entry;

    /// Read the entry for `url`.
    fn get(&self, url: &Url) -> Result<Option<Self::Entry>, Error>;

    /// Store `entry` for `url`, replacing any previous entry.
    fn put(&self, url: &Url, entry: &Self::Entry) -> Result<(), Error>;

    /// Take the entry for `url` out of the cache.
    fn remove(&self, url: &Url) -> Result<Option<Self::Entry>, Error>;

    /// Drop every entry. Returns how many were dropped.
    fn clear(&self) -> Result<usize, Error>;
}

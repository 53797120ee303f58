//! In-memory cache keyed by the full URL.
//!
//! Unlike [`DiskCache`](super::DiskCache), keys are the URL strings
//! themselves, so URLs never collide. Contents are lost when the cache is
//! dropped.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use url::Url;

use super::FeedInfoCache;
use crate::{Error, FeedInfo};

/// Mutex-guarded map from URL to entry.
#[derive(Debug)]
pub struct MemoryCache<V = FeedInfo> {
    entries: Mutex<HashMap<String, V>>,
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self { entries: Mutex::new(HashMap::new()) }
    }
}

impl<V: Clone> MemoryCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, V>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone> FeedInfoCache for MemoryCache<V> {
    type Entry = V;

    fn get(&self, url: &Url) -> Result<Option<V>, Error> {
        Ok(self.entries().get(url.as_str()).cloned())
    }

    fn put(&self, url: &Url, entry: &V) -> Result<(), Error> {
        self.entries().insert(url.to_string(), entry.clone());
        Ok(())
    }

    fn remove(&self, url: &Url) -> Result<Option<V>, Error> {
        Ok(self.entries().remove(url.as_str()))
    }

    fn clear(&self) -> Result<usize, Error> {
        let mut entries = self.entries();
        let removed = entries.len();
        entries.clear();
        Ok(removed)
    }
}

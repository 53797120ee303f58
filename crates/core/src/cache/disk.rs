//! Disk-backed cache with one file per URL.
//!
//! Entries live directly inside a caller-supplied directory, named by
//! [`cache_key`]. Writes go through a temporary file in the same directory
//! that is renamed over the target, so a reader sees either the old entry or
//! the new one.

use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::envelope;
use super::key::cache_key;
use super::FeedInfoCache;
use crate::config::CacheConfig;
use crate::{Error, FeedInfo};

/// Disk cache handle.
///
/// The directory must already exist; the cache never creates it. `clear`
/// removes every file in it, so it should not be shared with anything else.
pub struct DiskCache<V = FeedInfo> {
    dir: PathBuf,
    clear_lock: Mutex<()>,
    _entry: PhantomData<fn() -> V>,
}

impl<V> fmt::Debug for DiskCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiskCache").field("dir", &self.dir).finish()
    }
}

impl<V> DiskCache<V>
where
    V: Serialize + DeserializeOwned,
{
    /// Create a cache rooted at `dir`. Performs no I/O.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), clear_lock: Mutex::new(()), _entry: PhantomData }
    }

    /// Create a cache rooted at the configured directory.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.cache_dir.clone())
    }

    /// The cache root.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Backing file for `url`.
    pub fn path_for(&self, url: &Url) -> PathBuf {
        self.dir.join(cache_key(url))
    }

    /// Whether a backing file exists for `url`. Says nothing about whether it
    /// decodes.
    pub fn contains(&self, url: &Url) -> bool {
        self.path_for(url).is_file()
    }

    /// Read the entry for `url`.
    ///
    /// Returns `Ok(None)` if no file exists. A file that exists but cannot be
    /// read or decoded is an error, never a miss.
    pub fn get(&self, url: &Url) -> Result<Option<V>, Error> {
        read_entry(&self.path_for(url))
    }

    /// Store `entry` for `url`, replacing any previous entry.
    pub fn put(&self, url: &Url, entry: &V) -> Result<(), Error> {
        let path = self.path_for(url);
        let bytes = envelope::encode(url.as_str(), entry)?;
        let write_err = |source| Error::Write { path: path.clone(), source };

        let mut tmp = tempfile::Builder::new()
            .prefix(".tmp-")
            .tempfile_in(&self.dir)
            .map_err(write_err)?;
        tmp.write_all(&bytes).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;

        tracing::debug!(key = %cache_key(url), bytes = bytes.len(), "stored cache entry");
        Ok(())
    }

    /// Read the entry for `url` and delete its file.
    ///
    /// The file is deleted only if the read produced an entry. A failed delete
    /// is logged and the entry is still returned.
    pub fn remove(&self, url: &Url) -> Result<Option<V>, Error> {
        let path = self.path_for(url);
        let Some(entry) = read_entry(&path)? else {
            return Ok(None);
        };

        match fs::remove_file(&path) {
            Ok(()) => tracing::debug!(key = %cache_key(url), "removed cache entry"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "failed to delete cache entry after reading it")
            }
        }

        Ok(Some(entry))
    }

    /// Delete every file directly inside the cache directory.
    ///
    /// Subdirectories are left alone. Does nothing if the directory is missing
    /// or read-only. Individual delete failures are logged and skipped.
    /// Returns the number of files deleted.
    pub fn clear(&self) -> Result<usize, Error> {
        let _guard = self.clear_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if !is_writable_dir(&self.dir) {
            tracing::debug!(dir = %self.dir.display(), "cache directory missing or read-only, nothing to clear");
            return Ok(0);
        }

        let entries = fs::read_dir(&self.dir).map_err(|source| Error::Clear { path: self.dir.clone(), source })?;

        let mut removed = 0;
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    tracing::warn!(dir = %self.dir.display(), %error, "failed to list cache directory entry");
                    continue;
                }
            };

            let path = entry.path();
            match entry.file_type() {
                Ok(kind) if kind.is_dir() => continue,
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "failed to stat cache file");
                    continue;
                }
            }

            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(error) => tracing::warn!(path = %path.display(), %error, "failed to delete cache file"),
            }
        }

        tracing::debug!(dir = %self.dir.display(), removed, "cleared cache directory");
        Ok(removed)
    }
}

impl<V> FeedInfoCache for DiskCache<V>
where
    V: Serialize + DeserializeOwned,
{
    type Entry = V;

    fn get(&self, url: &Url) -> Result<Option<V>, Error> {
        DiskCache::get(self, url)
    }

    fn put(&self, url: &Url, entry: &V) -> Result<(), Error> {
        DiskCache::put(self, url, entry)
    }

    fn remove(&self, url: &Url) -> Result<Option<V>, Error> {
        DiskCache::remove(self, url)
    }

    fn clear(&self) -> Result<usize, Error> {
        DiskCache::clear(self)
    }
}

fn read_entry<V: DeserializeOwned>(path: &Path) -> Result<Option<V>, Error> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(Error::Read { path: path.to_path_buf(), source }),
    };

    envelope::decode(path, &bytes).map(Some)
}

fn is_writable_dir(dir: &Path) -> bool {
    fs::metadata(dir)
        .map(|meta| meta.is_dir() && !meta.permissions().readonly())
        .unwrap_or(false)
}

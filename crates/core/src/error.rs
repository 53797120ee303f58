//! Unified error types for feedcache.
//!
//! A cache miss is not an error: lookups return `Ok(None)`. Every variant here
//! is fatal from the cache's point of view and is surfaced to the caller.

use std::io;
use std::path::{Path, PathBuf};

/// Unified error type for cache operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An entry file exists but could not be opened or read.
    #[error("CACHE_READ: {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An entry file was read but its content does not decode.
    #[error("CACHE_CORRUPT: {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An entry file decoded but was written by an unknown format version.
    #[error("CACHE_FORMAT: {}: unsupported version {version}", path.display())]
    UnsupportedVersion { path: PathBuf, version: u32 },

    /// Creating, writing or renaming an entry file failed.
    #[error("CACHE_WRITE: {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The entry value could not be serialized.
    #[error("CACHE_ENCODE: {0}")]
    Encode(#[source] serde_json::Error),

    /// The cache directory could not be listed while clearing.
    #[error("CACHE_CLEAR: {}: {source}", path.display())]
    Clear {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Whether the error means stored data is unusable, as opposed to the
    /// filesystem being unavailable.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::Corrupt { .. } | Error::UnsupportedVersion { .. })
    }

    /// Path of the file or directory involved, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::Read { path, .. }
            | Error::Corrupt { path, .. }
            | Error::UnsupportedVersion { path, .. }
            | Error::Write { path, .. }
            | Error::Clear { path, .. } => Some(path.as_path()),
            Error::Encode(_) => None,
        }
    }
}

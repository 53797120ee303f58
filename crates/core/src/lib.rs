//! Persistent feed metadata cache for feed-polling clients.
//!
//! This crate provides:
//! - A disk cache storing one file per feed URL
//! - An in-memory cache with the same interface
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod feed_info;

pub use cache::{DiskCache, FeedInfoCache, MemoryCache};
pub use config::{CacheConfig, ConfigError};
pub use error::Error;
pub use feed_info::FeedInfo;

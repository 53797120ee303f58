//! Configuration validation rules.
//!
//! This module provides validation logic for `CacheConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::CacheConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl CacheConfig {
    /// Validate configuration values after loading.
    ///
    /// The cache never creates its directory, so it has to exist up front.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `cache_dir` is empty, and
    /// `ConfigError::Missing` if it does not exist or is not a directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid { field: "cache_dir".into(), reason: "must not be empty".into() });
        }

        if !self.cache_dir.is_dir() {
            let hint = if self.cache_dir.exists() {
                format!("{} is not a directory", self.cache_dir.display())
            } else {
                format!("create {} before starting", self.cache_dir.display())
            };
            return Err(ConfigError::Missing { field: "cache_dir".into(), hint });
        }

        if std::fs::metadata(&self.cache_dir).is_ok_and(|meta| meta.permissions().readonly()) {
            tracing::warn!(
                cache_dir = %self.cache_dir.display(),
                "cache_dir is read-only; put will fail and clear will do nothing"
            );
        }

        Ok(())
    }
}

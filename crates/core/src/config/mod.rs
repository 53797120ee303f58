//! Cache configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (FEEDCACHE_*)
//! 2. TOML config file (if FEEDCACHE_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! This layer is optional. `DiskCache::new(path)` takes the directory directly
//! and never reads the environment or any file besides its entries.

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Cache configuration.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (FEEDCACHE_*)
/// 2. TOML config file (if FEEDCACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding one file per cached feed.
    ///
    /// Set via FEEDCACHE_CACHE_DIR environment variable. Must already exist.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./feed-cache")
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { cache_dir: default_cache_dir() }
    }
}

impl CacheConfig {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self { cache_dir: cache_dir.into() }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment()
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("FEEDCACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("FEEDCACHE_").map(|key| key.as_str().to_lowercase().into()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.cache_dir, PathBuf::from("./feed-cache"));
    }

    #[test]
    fn test_load_from_env() {
        Jail::expect_with(|jail| {
            std::fs::create_dir("from-env").map_err(|e| e.to_string())?;
            jail.set_env("FEEDCACHE_CACHE_DIR", "from-env");

            let config = CacheConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.cache_dir, PathBuf::from("from-env"));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            std::fs::create_dir("from-file").map_err(|e| e.to_string())?;
            std::fs::create_dir("from-env").map_err(|e| e.to_string())?;
            jail.create_file("feedcache.toml", r#"cache_dir = "from-file""#)?;
            jail.set_env("FEEDCACHE_CONFIG_FILE", "feedcache.toml");

            let config = CacheConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.cache_dir, PathBuf::from("from-file"));

            jail.set_env("FEEDCACHE_CACHE_DIR", "from-env");
            let config = CacheConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.cache_dir, PathBuf::from("from-env"));
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_missing_directory() {
        Jail::expect_with(|jail| {
            jail.set_env("FEEDCACHE_CACHE_DIR", "nope");

            let result = CacheConfig::load();
            assert!(matches!(result, Err(ConfigError::Missing { .. })));
            Ok(())
        });
    }
}

//! # Sync Configuration
//!
//! Configuration for one sync-engine instance (one execution context).
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. TOML Config File                                                   │
//! │     ~/.config/basket/sync.toml (Linux)                                 │
//! │     ~/Library/Application Support/io.basket.cart/sync.toml (macOS)     │
//! │                                                                         │
//! │  2. Default Values                                                     │
//! │     generated context id, 1000 ms debounce, per-user cache slot        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # sync.toml
//! context_id = "550e8400-e29b-41d4-a716-446655440000"
//! topic = "basket.cart"
//! debounce_window_ms = 1000
//! cache_path = "/home/me/.cache/basket/cart-slot.json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{SyncError, SyncResult};

/// Default trailing-debounce window for durable writes, in milliseconds.
pub const DEFAULT_DEBOUNCE_WINDOW_MS: u64 = 1000;

/// Default cross-context topic name.
pub const DEFAULT_TOPIC: &str = "basket.cart";

/// Configuration for one sync coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Identifier of this execution context. Notifications carry it so a
    /// publisher never reconciles against its own broadcast.
    pub context_id: String,

    /// Named topic on the cross-context channel.
    pub topic: String,

    /// Trailing-debounce window for durable writes, measured from the most
    /// recent mutation. Only the last state in a burst is persisted.
    pub debounce_window_ms: u64,

    /// Path of the fast-tier JSON slot.
    pub cache_path: PathBuf,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            context_id: Uuid::new_v4().to_string(),
            topic: DEFAULT_TOPIC.to_string(),
            debounce_window_ms: DEFAULT_DEBOUNCE_WINDOW_MS,
            cache_path: default_cache_path(),
        }
    }
}

impl SyncConfig {
    /// The debounce window as a `Duration`.
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_window_ms)
    }

    /// Sets the debounce window. Windows beyond `u64::MAX` milliseconds
    /// saturate rather than truncate.
    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the fast-tier slot path.
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    /// Sets the topic name.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    /// Loads the configuration from a TOML file, falling back to defaults
    /// when the file does not exist.
    ///
    /// ## Arguments
    /// * `path` - Explicit config file path; `None` uses the platform
    ///   config directory
    pub fn load_or_default(path: Option<PathBuf>) -> SyncResult<Self> {
        let path = path.unwrap_or_else(default_config_path);

        if !path.exists() {
            info!(path = %path.display(), "No config file; using defaults");
            return Ok(SyncConfig::default());
        }

        let raw = std::fs::read_to_string(&path)
            .map_err(|e| SyncError::ConfigLoadFailed(format!("{}: {}", path.display(), e)))?;
        let config: SyncConfig = toml::from_str(&raw)?;

        debug!(path = %path.display(), topic = %config.topic, "Loaded sync config");
        Ok(config)
    }
}

/// Platform config file location.
fn default_config_path() -> PathBuf {
    directories::ProjectDirs::from("io", "basket", "basket")
        .map(|dirs| dirs.config_dir().join("sync.toml"))
        .unwrap_or_else(|| PathBuf::from("sync.toml"))
}

/// Platform fast-tier slot location.
fn default_cache_path() -> PathBuf {
    directories::ProjectDirs::from("io", "basket", "basket")
        .map(|dirs| dirs.cache_dir().join("cart-slot.json"))
        .unwrap_or_else(|| std::env::temp_dir().join("basket-cart-slot.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.debounce_window(), Duration::from_millis(1000));
        assert_eq!(config.topic, DEFAULT_TOPIC);
        assert!(!config.context_id.is_empty());
    }

    #[test]
    fn test_default_context_ids_are_unique() {
        assert_ne!(
            SyncConfig::default().context_id,
            SyncConfig::default().context_id
        );
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: SyncConfig = toml::from_str("debounce_window_ms = 250").unwrap();
        assert_eq!(config.debounce_window(), Duration::from_millis(250));
        assert_eq!(config.topic, DEFAULT_TOPIC);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config =
            SyncConfig::load_or_default(Some(PathBuf::from("/nonexistent/sync.toml"))).unwrap();
        assert_eq!(config.debounce_window_ms, DEFAULT_DEBOUNCE_WINDOW_MS);
    }

    #[test]
    fn test_load_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync.toml");
        std::fs::write(&path, "topic = \"checkout.cart\"\ndebounce_window_ms = 40").unwrap();

        let config = SyncConfig::load_or_default(Some(path)).unwrap();
        assert_eq!(config.topic, "checkout.cart");
        assert_eq!(config.debounce_window_ms, 40);
    }

    #[test]
    fn test_oversized_debounce_window_saturates() {
        let config =
            SyncConfig::default().with_debounce_window(Duration::from_secs(u64::MAX));
        assert_eq!(config.debounce_window_ms, u64::MAX);
    }

    #[test]
    fn test_builder_setters() {
        let config = SyncConfig::default()
            .with_debounce_window(Duration::from_millis(50))
            .with_topic("t")
            .with_cache_path("/tmp/slot.json");
        assert_eq!(config.debounce_window_ms, 50);
        assert_eq!(config.topic, "t");
        assert_eq!(config.cache_path, PathBuf::from("/tmp/slot.json"));
    }
}

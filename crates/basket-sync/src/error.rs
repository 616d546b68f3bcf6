//! # Sync Error Types
//!
//! Error types for the sync engine.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sync Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────────┐  ┌─────────────────────┐  ┌────────────────┐  │
//! │  │    Durable Tier     │  │     Fast Tier       │  │    Ambient     │  │
//! │  │                     │  │                     │  │                │  │
//! │  │  StorageUnavailable │  │  CacheWriteFailed   │  │  Serialization │  │
//! │  │  ReadFailed         │  │  (log-only, never   │  │  ConfigLoad    │  │
//! │  │  WriteFailed        │  │   rolls back)       │  │                │  │
//! │  │  (trigger rollback) │  │                     │  │                │  │
//! │  └─────────────────────┘  └─────────────────────┘  └────────────────┘  │
//! │                                                                         │
//! │  The coordinator catches every storage error at its boundary and        │
//! │  converts it into a state correction or a log entry; nothing here       │
//! │  surfaces to presentation code as a hard failure.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Sync error type covering all sync-engine failures.
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Durable Tier Errors
    // =========================================================================
    /// The durable store cannot be opened at all.
    ///
    /// Cold start degrades to fast-tier-only operation on this.
    #[error("Durable store unavailable: {0}")]
    StorageUnavailable(String),

    /// A durable-tier read failed.
    #[error("Durable read failed: {0}")]
    ReadFailed(String),

    /// A durable-tier write failed. The coordinator rolls the in-memory
    /// snapshot back when this happens (policy A).
    #[error("Durable write failed: {0}")]
    WriteFailed(String),

    // =========================================================================
    // Fast Tier Errors
    // =========================================================================
    /// A fast-tier write failed (quota, permissions, disk).
    ///
    /// Non-fatal: the fast tier is a cache, not a source of truth, so this
    /// is logged and the optimistic state stands (policy B).
    #[error("Fast-tier write failed: {0}")]
    CacheWriteFailed(String),

    // =========================================================================
    // Ambient Errors
    // =========================================================================
    /// Failed to serialize or deserialize a payload.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Failed to load the configuration file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::SerializationFailed(err.to_string())
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl SyncError {
    /// Returns true if this error came from the durable tier and therefore
    /// triggers the rollback path.
    pub fn is_durable_failure(&self) -> bool {
        matches!(
            self,
            SyncError::StorageUnavailable(_)
                | SyncError::ReadFailed(_)
                | SyncError::WriteFailed(_)
        )
    }

    /// Returns true if this error is a fast-tier failure, which is only
    /// ever logged.
    pub fn is_cache_failure(&self) -> bool {
        matches!(self, SyncError::CacheWriteFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durable_failures_categorized() {
        assert!(SyncError::StorageUnavailable("no disk".into()).is_durable_failure());
        assert!(SyncError::WriteFailed("locked".into()).is_durable_failure());
        assert!(!SyncError::CacheWriteFailed("quota".into()).is_durable_failure());
    }

    #[test]
    fn test_cache_failures_categorized() {
        assert!(SyncError::CacheWriteFailed("quota".into()).is_cache_failure());
        assert!(!SyncError::ReadFailed("oops".into()).is_cache_failure());
    }
}

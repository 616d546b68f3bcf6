//! # Fast-Tier Cache Slot
//!
//! The synchronous storage tier: a single named slot holding the
//! JSON-serialized snapshot.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fast Tier Contract                               │
//! │                                                                         │
//! │  load()   ──► Snapshot      never fails: absent or malformed payload    │
//! │                             is an EMPTY snapshot, logged at debug       │
//! │                                                                         │
//! │  save()   ──► Result        failure maps to CacheWriteFailed; the       │
//! │                             coordinator only logs it (policy B) since   │
//! │                             this tier is a cache, not a source of truth │
//! │                                                                         │
//! │  remove() ──► ()            removing an absent slot is fine             │
//! │                                                                         │
//! │  All operations are synchronous and never suspend.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{SyncError, SyncResult};
use basket_core::{LineItem, Snapshot};

/// A single JSON-file slot used as the fast, possibly-stale tier.
#[derive(Debug, Clone)]
pub struct CacheSlot {
    path: PathBuf,
}

impl CacheSlot {
    /// Creates a slot backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CacheSlot { path: path.into() }
    }

    /// The slot's file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the slot synchronously.
    ///
    /// An absent slot or a malformed payload yields an empty snapshot;
    /// neither is an error.
    pub fn load(&self) -> Snapshot {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Cache slot absent; starting empty");
                return Snapshot::empty();
            }
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Cache slot unreadable; treating as empty");
                return Snapshot::empty();
            }
        };

        match serde_json::from_str::<Vec<LineItem>>(&raw) {
            Ok(items) => Snapshot::from_items(items),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Malformed cache payload; treating as empty");
                Snapshot::empty()
            }
        }
    }

    /// Writes the snapshot to the slot synchronously.
    pub fn save(&self, snapshot: &Snapshot) -> SyncResult<()> {
        let payload = serde_json::to_string(snapshot.items())?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SyncError::CacheWriteFailed(e.to_string()))?;
        }
        std::fs::write(&self.path, payload)
            .map_err(|e| SyncError::CacheWriteFailed(e.to_string()))?;

        debug!(path = %self.path.display(), count = snapshot.len(), "Cache slot saved");
        Ok(())
    }

    /// Empties the slot. Removing an absent slot is a no-op.
    pub fn remove(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Cache slot removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove cache slot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::ProductInfo;

    fn slot(dir: &tempfile::TempDir) -> CacheSlot {
        CacheSlot::new(dir.path().join("cart-slot.json"))
    }

    #[test]
    fn test_absent_slot_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(slot(&dir).load().is_empty());
    }

    #[test]
    fn test_malformed_payload_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let slot = slot(&dir);
        std::fs::write(slot.path(), "{not json]").unwrap();

        assert!(slot.load().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let slot = slot(&dir);
        let snapshot = Snapshot::empty()
            .with_item_added(&ProductInfo::new("p-1", "SKU-1", "Laptop", 99_900))
            .with_item_added(&ProductInfo::new("p-2", "SKU-2", "Mouse", 2_500));

        slot.save(&snapshot).unwrap();

        assert_eq!(slot.load(), snapshot);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let slot = CacheSlot::new(dir.path().join("nested/deeper/slot.json"));

        slot.save(&Snapshot::empty()).unwrap();
        assert!(slot.path().exists());
    }

    #[test]
    fn test_save_under_file_parent_fails_as_cache_write() {
        let dir = tempfile::tempdir().unwrap();
        // A plain file where the slot's parent directory should be makes
        // every write fail.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let slot = CacheSlot::new(blocker.join("slot.json"));

        let err = slot.save(&Snapshot::empty()).unwrap_err();
        assert!(matches!(err, SyncError::CacheWriteFailed(_)));
        assert!(err.is_cache_failure());

        // The unreadable slot still loads as empty.
        assert!(slot.load().is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let slot = slot(&dir);
        slot.save(&Snapshot::empty()).unwrap();

        slot.remove();
        assert!(slot.load().is_empty());
        // Second removal: slot already gone, still fine.
        slot.remove();
    }
}

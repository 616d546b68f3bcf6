//! # Durable Store Adapter
//!
//! The asynchronous transactional tier behind the coordinator, expressed as
//! an object-safe trait so storage can be swapped (and faulted) in tests.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Durable Store Contract                             │
//! │                                                                         │
//! │  initialize() ─► open/create the backing store                          │
//! │                  fails with StorageUnavailable; cold start then         │
//! │                  degrades to fast-tier-only operation                   │
//! │                                                                         │
//! │  load_all()   ─► the full collection in cart order (ReadFailed)         │
//! │                                                                         │
//! │  put_all()    ─► atomic replace: ALL items land or NONE (WriteFailed)   │
//! │                                                                         │
//! │  clear()      ─► empty the collection (WriteFailed)                     │
//! │                                                                         │
//! │  Operations before a successful initialize fail with                    │
//! │  StorageUnavailable rather than panicking.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{SyncError, SyncResult};
use basket_core::LineItem;
use basket_db::{CartItemRepository, Database, DbConfig};

// =============================================================================
// Trait
// =============================================================================

/// The durable, restart-surviving storage tier.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Opens or creates the backing store. Idempotent.
    async fn initialize(&self) -> SyncResult<()>;

    /// Reads the full collection in cart order.
    async fn load_all(&self) -> SyncResult<Vec<LineItem>>;

    /// Atomically replaces the full collection.
    async fn put_all(&self, items: Vec<LineItem>) -> SyncResult<()>;

    /// Empties the collection.
    async fn clear(&self) -> SyncResult<()>;
}

// =============================================================================
// SQLite Implementation
// =============================================================================

/// `DurableStore` over the basket-db SQLite layer.
///
/// Construction is cheap and does no I/O; `initialize` opens the pool and
/// runs migrations.
#[derive(Debug)]
pub struct SqliteDurableStore {
    config: DbConfig,
    db: RwLock<Option<Database>>,
}

impl SqliteDurableStore {
    /// Creates an unopened store for the given database config.
    pub fn new(config: DbConfig) -> Self {
        SqliteDurableStore {
            config,
            db: RwLock::new(None),
        }
    }

    /// Repository handle, or `StorageUnavailable` before initialization.
    async fn repo(&self) -> SyncResult<CartItemRepository> {
        self.db
            .read()
            .await
            .as_ref()
            .map(Database::cart_items)
            .ok_or_else(|| {
                SyncError::StorageUnavailable("durable store not initialized".to_string())
            })
    }
}

#[async_trait]
impl DurableStore for SqliteDurableStore {
    async fn initialize(&self) -> SyncResult<()> {
        let mut db = self.db.write().await;
        if db.is_some() {
            return Ok(());
        }

        let opened = Database::new(self.config.clone())
            .await
            .map_err(|e| SyncError::StorageUnavailable(e.to_string()))?;

        info!(path = %self.config.database_path.display(), "Durable store initialized");
        *db = Some(opened);
        Ok(())
    }

    async fn load_all(&self) -> SyncResult<Vec<LineItem>> {
        self.repo()
            .await?
            .load_all()
            .await
            .map_err(|e| SyncError::ReadFailed(e.to_string()))
    }

    async fn put_all(&self, items: Vec<LineItem>) -> SyncResult<()> {
        self.repo()
            .await?
            .replace_all(&items)
            .await
            .map_err(|e| SyncError::WriteFailed(e.to_string()))
    }

    async fn clear(&self) -> SyncResult<()> {
        self.repo()
            .await?
            .clear_all()
            .await
            .map_err(|e| SyncError::WriteFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::{ProductInfo, Snapshot};

    fn items() -> Vec<LineItem> {
        Snapshot::empty()
            .with_item_added(&ProductInfo::new("p-1", "SKU-1", "Laptop", 99_900))
            .into_items()
    }

    #[tokio::test]
    async fn test_operations_before_initialize_fail_unavailable() {
        let store = SqliteDurableStore::new(DbConfig::in_memory());

        let err = store.load_all().await.unwrap_err();
        assert!(matches!(err, SyncError::StorageUnavailable(_)));
        let err = store.put_all(items()).await.unwrap_err();
        assert!(matches!(err, SyncError::StorageUnavailable(_)));
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let store = SqliteDurableStore::new(DbConfig::in_memory());
        store.initialize().await.unwrap();
        store.initialize().await.unwrap();

        store.put_all(items()).await.unwrap();
        assert_eq!(store.load_all().await.unwrap(), items());
    }

    #[tokio::test]
    async fn test_put_load_clear_cycle() {
        let store = SqliteDurableStore::new(DbConfig::in_memory());
        store.initialize().await.unwrap();

        store.put_all(items()).await.unwrap();
        assert_eq!(store.load_all().await.unwrap().len(), 1);

        store.clear().await.unwrap();
        assert!(store.load_all().await.unwrap().is_empty());
    }
}

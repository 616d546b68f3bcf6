//! # Cart Handle
//!
//! The public cart API for one execution context. Wraps a
//! [`SyncCoordinator`] and exposes the cart vocabulary (add, change
//! quantity, remove, clear) instead of the sync machinery.
//!
//! Every mutation is expressed as a pure snapshot transformation from
//! `basket-core`; the coordinator handles commit, mirroring, debounced
//! persistence and rollback. Mutations return nothing: they cannot fail at
//! the call site, and a later durable failure surfaces as a state change.

use std::sync::Arc;

use crate::cache::CacheSlot;
use crate::config::SyncConfig;
use crate::coordinator::SyncCoordinator;
use crate::notifier::NoticeBus;
use crate::store::DurableStore;
use basket_core::{LineItem, ProductInfo, Snapshot};

/// A live cart bound to one execution context.
///
/// Cheap to clone; all clones share the same coordinator.
#[derive(Clone)]
pub struct CartHandle {
    coordinator: Arc<SyncCoordinator>,
}

impl CartHandle {
    /// Opens the cart: fast-tier snapshot immediately, durable warm-up in
    /// the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(store: Arc<dyn DurableStore>, bus: &NoticeBus, config: SyncConfig) -> Self {
        let cache = CacheSlot::new(config.cache_path.clone());
        let notifier = bus.notifier(&config.topic, &config.context_id);
        CartHandle {
            coordinator: SyncCoordinator::start(store, cache, notifier, config),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current line items, in insertion order.
    pub fn items(&self) -> Vec<LineItem> {
        self.coordinator.snapshot().into_items()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.coordinator.snapshot()
    }

    /// Cart total in cents.
    pub fn total_cents(&self) -> i64 {
        self.coordinator.total_cents()
    }

    /// True until the durable warm-up settles.
    pub fn loading(&self) -> bool {
        self.coordinator.is_loading()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a product: increments quantity if it is already in the cart,
    /// appends a quantity-1 line otherwise.
    pub fn add_item(&self, product: &ProductInfo) {
        self.coordinator
            .mutate(|snapshot| Some(snapshot.with_item_added(product)));
    }

    /// Sets the quantity of an existing line. Quantities below 1, unknown
    /// ids and unchanged quantities are quiet no-ops; remove the line
    /// explicitly instead of setting quantity zero.
    pub fn update_quantity(&self, item_id: &str, quantity: i64) {
        self.coordinator
            .mutate(|snapshot| snapshot.with_quantity(item_id, quantity));
    }

    /// Removes a line entirely, whatever its quantity. Unknown ids are a
    /// quiet no-op.
    pub fn remove_item(&self, item_id: &str) {
        self.coordinator
            .mutate(|snapshot| snapshot.without_item(item_id));
    }

    /// Empties the cart and both storage tiers immediately, skipping the
    /// debounce window.
    pub async fn clear_cart(&self) {
        self.coordinator.clear_cart().await;
    }

    /// Detaches this context: cancels timers and background tasks.
    pub fn close(&self) {
        self.coordinator.close();
    }
}

// =============================================================================
// Integration Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteDurableStore;
    use basket_db::DbConfig;
    use std::time::Duration;

    fn product(id: &str, price_cents: i64) -> ProductInfo {
        ProductInfo::new(id, format!("SKU-{id}"), format!("Product {id}"), price_cents)
    }

    async fn open_cart(dir: &tempfile::TempDir) -> CartHandle {
        let store: Arc<dyn DurableStore> =
            Arc::new(SqliteDurableStore::new(DbConfig::in_memory()));
        let config = SyncConfig::default()
            .with_debounce_window(Duration::from_millis(50))
            .with_cache_path(dir.path().join("cart.json"));
        let cart = CartHandle::open(store, &NoticeBus::new(), config);
        for _ in 0..200 {
            if !cart.loading() {
                return cart;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("cart never finished loading");
    }

    #[tokio::test]
    async fn test_full_cart_lifecycle_totals() {
        let dir = tempfile::tempdir().unwrap();
        let cart = open_cart(&dir).await;
        let laptop = product("1", 999);

        cart.add_item(&laptop);
        assert_eq!(cart.total_cents(), 999);

        cart.add_item(&laptop);
        assert_eq!(cart.total_cents(), 1998);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);

        cart.update_quantity("1", 5);
        assert_eq!(cart.total_cents(), 4995);

        // Below-minimum quantity is ignored, not treated as a removal.
        cart.update_quantity("1", 0);
        assert_eq!(cart.total_cents(), 4995);

        cart.remove_item("1");
        assert_eq!(cart.total_cents(), 0);
        assert!(cart.items().is_empty());

        // Removing again and clearing an empty cart are quiet no-ops.
        cart.remove_item("1");
        cart.clear_cart().await;
        assert!(cart.items().is_empty());

        cart.close();
    }

    #[tokio::test]
    async fn test_mutations_persist_through_debounce() {
        let dir = tempfile::tempdir().unwrap();

        let store: Arc<dyn DurableStore> =
            Arc::new(SqliteDurableStore::new(DbConfig::in_memory()));
        let config = SyncConfig::default()
            .with_debounce_window(Duration::from_millis(50))
            .with_cache_path(dir.path().join("cart.json"));
        let cart = CartHandle::open(Arc::clone(&store), &NoticeBus::new(), config);
        while cart.loading() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        cart.add_item(&product("1", 999));
        cart.add_item(&product("2", 2500));
        tokio::time::sleep(Duration::from_millis(300)).await;

        // The durable tier holds the folded result of the burst.
        let stored = store.load_all().await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].id, "1");
        assert_eq!(stored[1].id, "2");

        cart.close();
    }

    #[tokio::test]
    async fn test_insertion_order_survives_quantity_changes() {
        let dir = tempfile::tempdir().unwrap();
        let cart = open_cart(&dir).await;

        cart.add_item(&product("a", 100));
        cart.add_item(&product("b", 200));
        cart.add_item(&product("c", 300));
        cart.update_quantity("a", 9);

        let ids: Vec<_> = cart.items().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        cart.close();
    }
}

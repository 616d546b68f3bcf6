//! # Cart Item Repository
//!
//! Durable operations for the cart line-item collection.
//!
//! ## Write Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      replace_all (atomic)                               │
//! │                                                                         │
//! │  BEGIN TRANSACTION                                                     │
//! │       │                                                                 │
//! │       ├── DELETE FROM cart_items        (drop the old collection)      │
//! │       │                                                                 │
//! │       ├── INSERT row 0 (position 0)                                    │
//! │       ├── INSERT row 1 (position 1)                                    │
//! │       └── INSERT row n (position n)                                    │
//! │       │                                                                 │
//! │  COMMIT ── either ALL rows land or NONE do                             │
//! │                                                                         │
//! │  The whole snapshot is written every time. The collection is small     │
//! │  (a cart), and clear-then-insert keeps positions dense without diff    │
//! │  logic.                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use basket_core::LineItem;

/// Repository for cart line-item operations.
#[derive(Debug, Clone)]
pub struct CartItemRepository {
    pool: SqlitePool,
}

impl CartItemRepository {
    /// Creates a new CartItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartItemRepository { pool }
    }

    /// Loads the full collection in cart order.
    pub async fn load_all(&self) -> DbResult<Vec<LineItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, sku, name, price_cents, quantity
            FROM cart_items
            ORDER BY position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(LineItem {
                id: row.try_get("id")?,
                sku: row.try_get("sku")?,
                name: row.try_get("name")?,
                price_cents: row.try_get("price_cents")?,
                quantity: row.try_get("quantity")?,
            });
        }

        debug!(count = items.len(), "Loaded cart items");
        Ok(items)
    }

    /// Replaces the full collection atomically.
    ///
    /// Delete-then-insert inside one transaction: a failure mid-way rolls
    /// the whole write back and the previous collection stays intact.
    pub async fn replace_all(&self, items: &[LineItem]) -> DbResult<()> {
        debug!(count = items.len(), "Replacing cart items");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM cart_items")
            .execute(&mut *tx)
            .await?;

        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO cart_items (id, sku, name, price_cents, quantity, position)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&item.id)
            .bind(&item.sku)
            .bind(&item.name)
            .bind(item.price_cents)
            .bind(item.quantity)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Removes every row from the collection.
    pub async fn clear_all(&self) -> DbResult<()> {
        debug!("Clearing cart items");

        sqlx::query("DELETE FROM cart_items")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Number of rows currently stored.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use basket_core::{ProductInfo, Snapshot};

    async fn repo() -> CartItemRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.cart_items()
    }

    fn items(ids: &[(&str, i64, i64)]) -> Vec<LineItem> {
        ids.iter()
            .map(|(id, price, qty)| {
                let mut item =
                    LineItem::from_product(&ProductInfo::new(*id, format!("SKU-{id}"), *id, *price));
                item.quantity = *qty;
                item
            })
            .collect()
    }

    #[tokio::test]
    async fn test_replace_and_load_preserves_order() {
        let repo = repo().await;
        let stored = items(&[("c", 300, 1), ("a", 100, 2), ("b", 200, 5)]);

        repo.replace_all(&stored).await.unwrap();
        let loaded = repo.load_all().await.unwrap();

        assert_eq!(loaded, stored);
        let ids: Vec<&str> = loaded.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_replace_all_is_idempotent_not_additive() {
        let repo = repo().await;
        let stored = items(&[("a", 100, 1), ("b", 200, 1)]);

        repo.replace_all(&stored).await.unwrap();
        repo.replace_all(&stored).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_replace_all_with_duplicate_id_leaves_previous_state() {
        let repo = repo().await;
        let good = items(&[("a", 100, 1)]);
        repo.replace_all(&good).await.unwrap();

        // Duplicate primary key: the second insert fails, the transaction
        // rolls back, the previous collection must still be there.
        let bad = items(&[("x", 100, 1), ("x", 100, 2)]);
        assert!(repo.replace_all(&bad).await.is_err());

        let loaded = repo.load_all().await.unwrap();
        assert_eq!(loaded, good);
    }

    #[tokio::test]
    async fn test_clear_all() {
        let repo = repo().await;
        repo.replace_all(&items(&[("a", 100, 1)])).await.unwrap();

        repo.clear_all().await.unwrap();

        assert!(repo.load_all().await.unwrap().is_empty());
        // Clearing an already-empty collection is fine.
        repo.clear_all().await.unwrap();
    }

    #[tokio::test]
    async fn test_round_trips_into_snapshot() {
        let repo = repo().await;
        let stored = items(&[("a", 999, 2)]);
        repo.replace_all(&stored).await.unwrap();

        let snapshot = Snapshot::from_items(repo.load_all().await.unwrap());
        assert_eq!(snapshot.total_cents(), 1_998);
    }
}

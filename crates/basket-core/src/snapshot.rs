//! # Cart Snapshot
//!
//! The full ordered collection of line items at an instant, plus the pure
//! computations the sync coordinator commits.
//!
//! ## Mutation Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Pure Mutation Computations                           │
//! │                                                                         │
//! │  current: &Snapshot ──► with_item_added(product)  ──► Snapshot          │
//! │  current: &Snapshot ──► with_quantity(id, qty)    ──► Option<Snapshot>  │
//! │  current: &Snapshot ──► without_item(id)          ──► Option<Snapshot>  │
//! │  current: &Snapshot ──► Snapshot::empty()         ──► Snapshot          │
//! │                                                                         │
//! │  `None` means "no change": the caller skips commit, storage and         │
//! │  notification entirely. Nothing here mutates in place.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line item per `id`
//! - Insertion order is preserved: new items append, updates happen in place,
//!   removal keeps the remainder's order
//! - `quantity >= 1` always; a request for less is a no-op, never an implicit
//!   removal

use serde::{Deserialize, Serialize};

use crate::item::{LineItem, ProductInfo};

/// The canonical ordered cart state at an instant.
///
/// Cheap to clone relative to its role: the coordinator clones it for
/// rollback capture and for handing copies to readers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    items: Vec<LineItem>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    pub fn empty() -> Self {
        Snapshot { items: Vec::new() }
    }

    /// Builds a snapshot from already-validated line items.
    ///
    /// Used when loading from a storage tier. Items with a quantity below 1
    /// or a duplicate id are dropped rather than poisoning the whole load.
    pub fn from_items(items: Vec<LineItem>) -> Self {
        let mut seen: Vec<&str> = Vec::with_capacity(items.len());
        let mut valid = Vec::with_capacity(items.len());
        for item in &items {
            if item.quantity >= 1
                && item.price_cents >= 0
                && !seen.contains(&item.id.as_str())
            {
                seen.push(&item.id);
                valid.push(item.clone());
            }
        }
        Snapshot { items: valid }
    }

    /// Borrows the ordered line items.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consumes the snapshot, yielding its line items.
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Looks up a line item by id.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Number of distinct line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks whether the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cart total in cents: Σ price × quantity.
    ///
    /// Never negative: prices are >= 0 and quantities >= 1.
    pub fn total_cents(&self) -> i64 {
        self.items.iter().map(LineItem::line_total_cents).sum()
    }

    // =========================================================================
    // Pure Mutation Computations
    // =========================================================================

    /// Computes the snapshot after adding `product`.
    ///
    /// ## Behavior
    /// - Product already present (by id): quantity increments by 1, the line
    ///   keeps its position and its frozen fields
    /// - Otherwise: a new line item with quantity 1 appends at the end
    pub fn with_item_added(&self, product: &ProductInfo) -> Snapshot {
        let mut items = self.items.clone();
        match items.iter_mut().find(|i| i.id == product.id) {
            Some(existing) => existing.quantity += 1,
            None => items.push(LineItem::from_product(product)),
        }
        Snapshot { items }
    }

    /// Computes the snapshot after setting an item's quantity.
    ///
    /// Returns `None` (no change) when `quantity < 1`, when `id` is unknown,
    /// or when the item already has that quantity.
    pub fn with_quantity(&self, id: &str, quantity: i64) -> Option<Snapshot> {
        if quantity < 1 {
            return None;
        }
        let pos = self.items.iter().position(|i| i.id == id)?;
        if self.items[pos].quantity == quantity {
            return None;
        }
        let mut items = self.items.clone();
        items[pos].quantity = quantity;
        Some(Snapshot { items })
    }

    /// Computes the snapshot after removing an item.
    ///
    /// Returns `None` (no change) when `id` is not in the cart. The order of
    /// the remaining items is preserved.
    pub fn without_item(&self, id: &str) -> Option<Snapshot> {
        if !self.items.iter().any(|i| i.id == id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .filter(|i| i.id != id)
            .cloned()
            .collect();
        Some(Snapshot { items })
    }
}

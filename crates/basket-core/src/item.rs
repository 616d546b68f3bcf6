//! # Cart Item Types
//!
//! Domain types for a single line in the cart.
//!
//! ## Dual-Shape Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Item Shapes                                       │
//! │                                                                         │
//! │  ┌──────────────────┐        add to cart        ┌──────────────────┐   │
//! │  │   ProductInfo    │ ────────────────────────► │     LineItem     │   │
//! │  │  ──────────────  │                           │  ──────────────  │   │
//! │  │  id              │   product fields frozen   │  id (identity)   │   │
//! │  │  sku             │   at the moment of add,   │  sku             │   │
//! │  │  name            │   quantity starts at 1    │  name            │   │
//! │  │  price_cents     │                           │  price_cents     │   │
//! │  └──────────────────┘                           │  quantity (>= 1) │   │
//! │                                                 └──────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Price Freezing
//! The price is captured when the item enters the cart. If the catalog price
//! changes later, the line item keeps the price it was added at.

use serde::{Deserialize, Serialize};

// =============================================================================
// Product Info
// =============================================================================

/// The product-shaped input to `addItem`.
///
/// This is everything the cart needs to know about a product; the catalog
/// itself lives outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    /// Identity key. At most one line item per id exists in a snapshot.
    pub id: String,

    /// Stock Keeping Unit - business identifier, carried along verbatim.
    pub sku: String,

    /// Display name.
    pub name: String,

    /// Price in cents (smallest currency unit). Never negative.
    pub price_cents: i64,
}

impl ProductInfo {
    /// Creates a product description for cart input.
    pub fn new(
        id: impl Into<String>,
        sku: impl Into<String>,
        name: impl Into<String>,
        price_cents: i64,
    ) -> Self {
        ProductInfo {
            id: id.into(),
            sku: sku.into(),
            name: name.into(),
            price_cents,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product entry with quantity in the cart.
///
/// ## Invariants
/// - `quantity >= 1` - a line with zero quantity does not exist, it is removed
/// - `price_cents >= 0` - totals can therefore never go negative
/// - Equality is element-wise over every field; reconciliation uses it to
///   decide whether a foreign snapshot actually differs from the local one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Identity key (matches the originating `ProductInfo::id`).
    pub id: String,

    /// SKU at the time of adding (frozen).
    pub sku: String,

    /// Product name at the time of adding (frozen).
    pub name: String,

    /// Price in cents at the time of adding (frozen).
    pub price_cents: i64,

    /// Quantity in cart. Always >= 1.
    pub quantity: i64,
}

impl LineItem {
    /// Creates a line item from a product with quantity 1.
    pub fn from_product(product: &ProductInfo) -> Self {
        LineItem {
            id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            price_cents: product.price_cents,
            quantity: 1,
        }
    }

    /// Line total in cents (unit price × quantity).
    pub fn line_total_cents(&self) -> i64 {
        self.price_cents * self.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_product_starts_at_quantity_one() {
        let product = ProductInfo::new("p-1", "SKU-1", "Laptop", 99_900);
        let item = LineItem::from_product(&product);

        assert_eq!(item.id, "p-1");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.line_total_cents(), 99_900);
    }

    #[test]
    fn test_line_total_scales_with_quantity() {
        let mut item = LineItem::from_product(&ProductInfo::new("p-1", "S", "Mouse", 2_500));
        item.quantity = 4;
        assert_eq!(item.line_total_cents(), 10_000);
    }

    #[test]
    fn test_value_equality_is_field_wise() {
        let a = LineItem::from_product(&ProductInfo::new("p-1", "S", "Mouse", 2_500));
        let mut b = a.clone();
        assert_eq!(a, b);

        b.quantity = 2;
        assert_ne!(a, b);
    }
}

//! # basket-core: Pure Cart Logic for Basket
//!
//! This crate is the **heart** of Basket. It contains the cart domain model
//! and every snapshot computation as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Basket Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 basket-sync (Sync Coordinator)                  │   │
//! │  │   optimistic commit ── debounced persist ── reconciliation     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ computes with                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ basket-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐            ┌────────────────────────────┐  │   │
//! │  │   │     item      │            │         snapshot           │  │   │
//! │  │   │   LineItem    │            │  Snapshot + pure mutation  │  │   │
//! │  │   │  ProductInfo  │            │  computations + totals     │  │   │
//! │  │   └───────────────┘            └────────────────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CHANNELS • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every mutation produces a NEW snapshot; the caller
//!    decides when (and whether) to commit it
//! 2. **Integer Money**: all prices are cents (i64), never floats
//! 3. **No-op over error**: an invalid request (quantity < 1, unknown id)
//!    computes to "no change", it never panics and never removes data
//!
//! ## Example
//!
//! ```rust
//! use basket_core::{ProductInfo, Snapshot};
//!
//! let laptop = ProductInfo::new("p-1", "SKU-LAP", "Laptop", 99_900);
//! let snapshot = Snapshot::empty()
//!     .with_item_added(&laptop)
//!     .with_item_added(&laptop);
//!
//! assert_eq!(snapshot.len(), 1);
//! assert_eq!(snapshot.total_cents(), 199_800); // quantity 2
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod item;
pub mod snapshot;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use item::{LineItem, ProductInfo};
pub use snapshot::Snapshot;

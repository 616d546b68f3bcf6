//! # basket-db: Durable Tier for Basket
//!
//! Asynchronous transactional storage for the cart, backed by SQLite.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Durable Tier                                     │
//! │                                                                         │
//! │  basket-sync (coordinator)                                              │
//! │       │                                                                 │
//! │       │ debounced put_all / cold-start load_all / clear                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    basket-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐   ┌──────────────┐   ┌─────────────────────┐   │   │
//! │  │   │   pool    │   │  migrations  │   │  repository::cart   │   │   │
//! │  │   │ DbConfig  │   │  embedded    │   │  load_all           │   │   │
//! │  │   │ Database  │   │  sql files   │   │  replace_all (txn)  │   │   │
//! │  │   └───────────┘   └──────────────┘   │  clear_all          │   │   │
//! │  │                                      └─────────────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (WAL mode), survives process restarts                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity Contract
//! `replace_all` is the bulk write behind `put_all`: delete-then-insert inside ONE
//! read-write transaction, so a crash or error leaves either the previous
//! collection or the new one, never a mix.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::cart::CartItemRepository;

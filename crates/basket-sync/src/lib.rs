//! # Basket Sync
//!
//! Multi-tier cart synchronization engine. Keeps one in-memory snapshot per
//! execution context consistent across a fast local cache, a durable SQLite
//! store and any sibling contexts on the same machine.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Basket Sync Architecture                        │
//! │                                                                         │
//! │   CartHandle (cart.rs)            public cart API, one per context     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   SyncCoordinator (coordinator.rs) snapshot + consistency decisions    │
//! │        │                                                                │
//! │        ├── CacheSlot (cache.rs)       fast tier: one JSON file,        │
//! │        │                              synchronous, best effort         │
//! │        │                                                                │
//! │        ├── DurableStore (store.rs)    slow tier: async trait over      │
//! │        │                              basket-db's SQLite repository    │
//! │        │                                                                │
//! │        └── CartNotifier (notifier.rs) cross-context pub/sub over a     │
//! │                                       named-topic broadcast bus        │
//! │                                                                         │
//! │   SyncConfig (config.rs)          TOML config with platform defaults   │
//! │   SyncError (error.rs)            tiered error taxonomy                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency Model
//! - Mutations commit optimistically: callers see the new snapshot before
//!   any storage tier is touched.
//! - The fast tier mirrors every commit synchronously; its failures are
//!   logged, never propagated.
//! - The durable tier is written through a trailing debounce window; its
//!   failures roll the snapshot back to the pre-burst state.
//! - Sibling contexts converge through post-persistence notifications with
//!   value-equality adoption. Last notification wins; there is no
//!   cross-context version vector.

pub mod cache;
pub mod cart;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod notifier;
pub mod store;

pub use cache::CacheSlot;
pub use cart::CartHandle;
pub use config::{SyncConfig, DEFAULT_DEBOUNCE_WINDOW_MS, DEFAULT_TOPIC};
pub use coordinator::SyncCoordinator;
pub use error::{SyncError, SyncResult};
pub use notifier::{CartMessage, CartNotifier, CartSubscription, NoticeBus};
pub use store::{DurableStore, SqliteDurableStore};

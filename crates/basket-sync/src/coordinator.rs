//! # Sync Coordinator
//!
//! Owns the canonical in-memory snapshot and every consistency decision:
//! optimistic mutation, fast-tier mirroring, debounced durable persistence,
//! rollback, and cross-context reconciliation.
//!
//! ## Mutation State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     One Mutation, Start To Finish                       │
//! │                                                                         │
//! │  1. COMPUTE    pure function over the current snapshot (basket-core)   │
//! │       │        `None` = no change: stop here entirely                  │
//! │       ▼                                                                 │
//! │  2. COMMIT     replace the in-memory snapshot synchronously;           │
//! │       │        readers observe the new state immediately               │
//! │       ▼                                                                 │
//! │  3. MIRROR     write the fast tier synchronously                       │
//! │       │        failure is LOGGED ONLY (policy B - it is a cache)       │
//! │       ▼                                                                 │
//! │  4. SCHEDULE   trailing debounce: abort any pending durable write,     │
//! │       │        schedule a new one `debounce_window` from NOW; the      │
//! │       │        replacement inherits the burst's original rollback      │
//! │       │        snapshot, so only ONE write is ever pending             │
//! │       ▼                                                                 │
//! │  5. PERSIST    put_all(current snapshot) when the timer fires          │
//! │       │                                                                 │
//! │       ├── Ok:  publish the snapshot to sibling contexts                │
//! │       │                                                                 │
//! │       └── Err: roll the in-memory snapshot back to the pre-burst       │
//! │                state and re-mirror it (policy A); the original          │
//! │                caller is long gone, so the rollback surfaces only      │
//! │                as a later state change                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reconciliation
//! A foreign snapshot replaces the local one only when it DIFFERS under
//! value equality; identical broadcasts are dropped to avoid clobbering an
//! equivalent local optimistic state. There is no versioning: concurrent
//! mutation in two contexts is last-notification-wins, an accepted race.
//!
//! ## Cold Start
//! The fast tier answers immediately (possibly stale) while the durable
//! tier warms up in the background; the durable result is authoritative and
//! gets mirrored back. If the durable tier never opens, the coordinator
//! stays on the fast-tier snapshot rather than hanging.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cache::CacheSlot;
use crate::config::SyncConfig;
use crate::notifier::{CartMessage, CartNotifier, CartSubscription};
use crate::store::DurableStore;
use basket_core::Snapshot;

/// A scheduled durable write.
///
/// At most one exists at a time: scheduling a new one always aborts and
/// replaces the previous handle.
struct PendingWrite {
    /// Monotonic id; a finished task only clears the slot if it still owns it.
    generation: u64,
    /// State to restore if the write fails (captured before the burst).
    revert_to: Snapshot,
    /// The debounce timer + write task.
    handle: JoinHandle<()>,
}

/// The multi-tier sync core for one execution context.
pub struct SyncCoordinator {
    config: SyncConfig,
    /// Canonical snapshot: the single source of truth for reads. Both
    /// storage tiers are projections of it.
    snapshot: RwLock<Snapshot>,
    /// True until the durable warm-up settles (success or degrade).
    loading: AtomicBool,
    store: Arc<dyn DurableStore>,
    cache: CacheSlot,
    notifier: CartNotifier,
    pending: Mutex<Option<PendingWrite>>,
    generation: AtomicU64,
    /// Warm-up and reconciliation tasks, aborted on close.
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl SyncCoordinator {
    /// Starts a coordinator: fast-tier snapshot now, durable warm-up and
    /// the reconciliation loop in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        store: Arc<dyn DurableStore>,
        cache: CacheSlot,
        notifier: CartNotifier,
        config: SyncConfig,
    ) -> Arc<Self> {
        let initial = cache.load();
        info!(
            context = %config.context_id,
            items = initial.len(),
            "Coordinator starting from fast tier"
        );

        let this = Arc::new(SyncCoordinator {
            config,
            snapshot: RwLock::new(initial),
            loading: AtomicBool::new(true),
            store,
            cache,
            notifier,
            pending: Mutex::new(None),
            generation: AtomicU64::new(0),
            tasks: Mutex::new(Vec::new()),
        });

        let warm = Arc::clone(&this);
        let warm_task = tokio::spawn(async move { warm.warm_up().await });

        let subscription = this.notifier.subscribe();
        let rec = Arc::clone(&this);
        let reconcile_task = tokio::spawn(async move { rec.reconcile_loop(subscription).await });

        this.tasks
            .lock()
            .expect("task list lock poisoned")
            .extend([warm_task, reconcile_task]);

        this
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// A copy of the current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot
            .read()
            .expect("snapshot lock poisoned")
            .clone()
    }

    /// Cart total in cents.
    pub fn total_cents(&self) -> i64 {
        self.snapshot
            .read()
            .expect("snapshot lock poisoned")
            .total_cents()
    }

    /// True while the durable warm-up is still in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Runs one mutation through the state machine above.
    ///
    /// `compute` is a pure function from the current snapshot to the next
    /// one; `None` means no change and skips commit, storage and
    /// notification entirely.
    pub fn mutate<F>(self: &Arc<Self>, compute: F)
    where
        F: FnOnce(&Snapshot) -> Option<Snapshot>,
    {
        let next = {
            let current = self.snapshot.read().expect("snapshot lock poisoned");
            compute(&current)
        };

        match next {
            Some(next) => self.commit(next),
            None => debug!("Mutation computed no change; skipping"),
        }
    }

    /// Steps 2-4: optimistic commit, fast mirror, debounce schedule.
    fn commit(self: &Arc<Self>, next: Snapshot) {
        let prev = {
            let mut snapshot = self.snapshot.write().expect("snapshot lock poisoned");
            std::mem::replace(&mut *snapshot, next.clone())
        };

        // Policy B: the fast tier is a cache, a failed mirror never rolls
        // the optimistic commit back.
        if let Err(e) = self.cache.save(&next) {
            warn!(error = %e, "Fast-tier mirror failed; optimistic state stands");
        }

        self.schedule_persist(prev);
    }

    /// Trailing debounce: abort the pending durable write (if any) and
    /// schedule a fresh one a full window from now.
    fn schedule_persist(self: &Arc<Self>, prev: Snapshot) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut pending = self.pending.lock().expect("pending lock poisoned");

        // Folding a burst: keep the FIRST mutation's rollback snapshot so a
        // failed folded write restores the pre-burst state.
        let revert_to = match pending.take() {
            Some(previous) => {
                previous.handle.abort();
                previous.revert_to
            }
            None => prev,
        };

        let this = Arc::clone(self);
        let revert = revert_to.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(this.config.debounce_window()).await;
            this.persist(generation, revert).await;
        });

        *pending = Some(PendingWrite {
            generation,
            revert_to,
            handle,
        });
    }

    /// Steps 5-7: the debounced durable write, then notify or roll back.
    async fn persist(self: &Arc<Self>, generation: u64, revert_to: Snapshot) {
        let target = self.snapshot();

        match self.store.put_all(target.items().to_vec()).await {
            Ok(()) => {
                self.finish_pending(generation);
                debug!(items = target.len(), "Durable write complete; notifying siblings");
                self.notifier.publish(CartMessage::updated(&target));
            }
            Err(e) => {
                self.finish_pending(generation);
                error!(error = %e, "Durable write failed; rolling back to pre-burst snapshot");
                {
                    let mut snapshot = self.snapshot.write().expect("snapshot lock poisoned");
                    *snapshot = revert_to.clone();
                }
                if let Err(e) = self.cache.save(&revert_to) {
                    warn!(error = %e, "Fast-tier mirror failed during rollback");
                }
            }
        }
    }

    /// Clears the pending slot, but only if this generation still owns it.
    /// A newer scheduled write must not lose its entry to a finishing
    /// predecessor.
    fn finish_pending(&self, generation: u64) {
        let mut pending = self.pending.lock().expect("pending lock poisoned");
        if pending.as_ref().map(|p| p.generation) == Some(generation) {
            *pending = None;
        }
    }

    /// Empties the snapshot and BOTH tiers immediately. Clearing is not
    /// batched: any pending debounced write is cancelled first.
    pub async fn clear_cart(self: &Arc<Self>) {
        if let Some(previous) = self
            .pending
            .lock()
            .expect("pending lock poisoned")
            .take()
        {
            previous.handle.abort();
        }

        let prev = {
            let mut snapshot = self.snapshot.write().expect("snapshot lock poisoned");
            std::mem::replace(&mut *snapshot, Snapshot::empty())
        };

        self.cache.remove();

        match self.store.clear().await {
            Ok(()) => {
                debug!("Cart cleared in both tiers");
                self.notifier.publish(CartMessage::updated(&Snapshot::empty()));
            }
            Err(e) => {
                error!(error = %e, "Durable clear failed; restoring snapshot");
                {
                    let mut snapshot = self.snapshot.write().expect("snapshot lock poisoned");
                    *snapshot = prev.clone();
                }
                if let Err(e) = self.cache.save(&prev) {
                    warn!(error = %e, "Fast-tier mirror failed while restoring after clear");
                }
            }
        }
    }

    // =========================================================================
    // Cold Start
    // =========================================================================

    /// Background durable warm-up: the durable result replaces the fast-tier
    /// snapshot (authoritative) and is mirrored back. On failure the
    /// coordinator degrades to whatever the fast tier provided instead of
    /// blocking indefinitely.
    async fn warm_up(self: Arc<Self>) {
        let loaded = match self.store.initialize().await {
            Ok(()) => self.store.load_all().await,
            Err(e) => Err(e),
        };

        match loaded {
            Ok(items) => {
                let authoritative = Snapshot::from_items(items);
                info!(items = authoritative.len(), "Durable snapshot loaded");
                {
                    let mut snapshot = self.snapshot.write().expect("snapshot lock poisoned");
                    *snapshot = authoritative.clone();
                }
                if let Err(e) = self.cache.save(&authoritative) {
                    warn!(error = %e, "Fast-tier mirror failed after durable load");
                }
            }
            Err(e) => {
                warn!(error = %e, "Durable tier unavailable; staying on fast-tier snapshot");
            }
        }

        self.loading.store(false, Ordering::SeqCst);
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Applies foreign notifications until the subscription closes.
    async fn reconcile_loop(self: Arc<Self>, mut subscription: CartSubscription) {
        while let Some(message) = subscription.recv().await {
            match message {
                CartMessage::Updated { items: Some(items) } => {
                    self.adopt_foreign(Snapshot::from_items(items));
                }
                CartMessage::Updated { items: None } => {
                    // Legacy bare signal: the payload lives in the durable
                    // tier, go read it.
                    match self.store.load_all().await {
                        Ok(items) => self.adopt_foreign(Snapshot::from_items(items)),
                        Err(e) => {
                            warn!(error = %e, "Durable re-read after bare signal failed")
                        }
                    }
                }
            }
        }
        debug!("Reconciliation loop ended");
    }

    /// Replaces the local snapshot with a foreign one, but only when they
    /// differ under value equality.
    fn adopt_foreign(&self, foreign: Snapshot) {
        let changed = {
            let mut snapshot = self.snapshot.write().expect("snapshot lock poisoned");
            if *snapshot == foreign {
                false
            } else {
                *snapshot = foreign.clone();
                true
            }
        };

        if changed {
            debug!(items = foreign.len(), "Adopted foreign snapshot");
            if let Err(e) = self.cache.save(&foreign) {
                warn!(error = %e, "Fast-tier mirror failed after reconciliation");
            }
        } else {
            debug!("Foreign snapshot identical; skipping");
        }
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Tears the coordinator down: cancels the pending debounce timer,
    /// stops the background tasks, detaches the notifier. A durable write
    /// already dispatched may still complete (fire-and-forget).
    pub fn close(&self) {
        if let Some(pending) = self
            .pending
            .lock()
            .expect("pending lock poisoned")
            .take()
        {
            pending.handle.abort();
        }
        for task in self.tasks.lock().expect("task list lock poisoned").drain(..) {
            task.abort();
        }
        self.notifier.close();
        info!(context = %self.config.context_id, "Coordinator closed");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

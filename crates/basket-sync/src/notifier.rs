//! # Cross-Context Notifier
//!
//! A publish/subscribe channel scoped to one named topic, used to tell
//! sibling execution contexts that the cart changed.
//!
//! ## Delivery Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Notification Semantics                             │
//! │                                                                         │
//! │  Context A ──publish──► topic "basket.cart" ──┬──► Context B (delivers) │
//! │                                               ├──► Context C (delivers) │
//! │                                               └──► Context A (FILTERED) │
//! │                                                                         │
//! │  • Fire-and-forget: no acknowledgement, no delivery guarantee           │
//! │  • At-most-once per live subscriber                                     │
//! │  • Messages before a subscriber attaches are lost                       │
//! │  • A publisher never receives its own message (origin filter)           │
//! │                                                                         │
//! │  MESSAGE SHAPES (both supported on receipt)                             │
//! │  ──────────────                                                         │
//! │  { "type": "CART_UPDATED", "items": [...] }   payload-carrying          │
//! │  { "type": "CART_UPDATED" }                   legacy bare signal:       │
//! │                                               receiver re-reads the     │
//! │                                               durable tier              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use basket_core::{LineItem, Snapshot};

/// Broadcast buffer per topic. Slow subscribers past this lag drop messages,
/// which is within the at-most-once contract.
const TOPIC_CAPACITY: usize = 64;

// =============================================================================
// Message
// =============================================================================

/// Cross-context notification payload.
///
/// Tagged union over the two deployed message shapes: the payload-carrying
/// variant and the legacy bare signal (`items` absent), which tells the
/// receiver to re-read the durable tier instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CartMessage {
    /// The cart changed.
    #[serde(rename = "CART_UPDATED")]
    Updated {
        /// The resulting snapshot, absent in the legacy shape.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        items: Option<Vec<LineItem>>,
    },
}

impl CartMessage {
    /// A payload-carrying update.
    pub fn updated(snapshot: &Snapshot) -> Self {
        CartMessage::Updated {
            items: Some(snapshot.items().to_vec()),
        }
    }

    /// The legacy bare signal: "re-read from the durable store".
    pub fn bare_signal() -> Self {
        CartMessage::Updated { items: None }
    }
}

/// Internal envelope: the origin id lets subscriptions drop self-published
/// messages.
#[derive(Debug, Clone)]
pub(crate) struct Envelope {
    pub(crate) origin: String,
    pub(crate) message: CartMessage,
}

// =============================================================================
// Notice Bus
// =============================================================================

/// Registry of named topics over tokio broadcast channels.
///
/// Every execution context sharing a bus handle can open a notifier on any
/// topic; contexts hold explicit handles, there is no ambient global.
#[derive(Debug, Clone, Default)]
pub struct NoticeBus {
    topics: Arc<Mutex<HashMap<String, broadcast::Sender<Envelope>>>>,
}

impl NoticeBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        NoticeBus::default()
    }

    /// Opens a notifier on `topic` for the context identified by `origin`.
    pub fn notifier(&self, topic: &str, origin: &str) -> CartNotifier {
        let tx = {
            let mut topics = self.topics.lock().expect("topic registry lock poisoned");
            topics
                .entry(topic.to_string())
                .or_insert_with(|| broadcast::channel(TOPIC_CAPACITY).0)
                .clone()
        };

        CartNotifier {
            origin: origin.to_string(),
            topic: topic.to_string(),
            tx,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }
}

// =============================================================================
// Notifier
// =============================================================================

/// One context's handle on a topic: publish, subscribe, close.
#[derive(Debug, Clone)]
pub struct CartNotifier {
    origin: String,
    topic: String,
    tx: broadcast::Sender<Envelope>,
    closed: Arc<AtomicBool>,
}

impl CartNotifier {
    /// The owning context's id.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Publishes a message to every live sibling subscriber.
    ///
    /// Fire-and-forget: no receivers is not an error, and a closed notifier
    /// publishes nothing.
    pub fn publish(&self, message: CartMessage) {
        if self.closed.load(Ordering::SeqCst) {
            debug!(topic = %self.topic, "Notifier closed; dropping publish");
            return;
        }
        let _ = self.tx.send(Envelope {
            origin: self.origin.clone(),
            message,
        });
    }

    /// Attaches a subscription. Messages published before this call are lost.
    pub fn subscribe(&self) -> CartSubscription {
        CartSubscription {
            origin: self.origin.clone(),
            topic: self.topic.clone(),
            rx: self.tx.subscribe(),
        }
    }

    /// Detaches this notifier: subsequent publishes are dropped.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

// =============================================================================
// Subscription
// =============================================================================

/// A live subscription on a topic, filtered to foreign origins.
#[derive(Debug)]
pub struct CartSubscription {
    origin: String,
    topic: String,
    rx: broadcast::Receiver<Envelope>,
}

impl CartSubscription {
    /// Receives the next foreign message, or `None` when the topic is gone.
    ///
    /// Self-published messages are skipped; a lagged receiver drops the
    /// missed messages and keeps going (at-most-once, best-effort).
    pub async fn recv(&mut self) -> Option<CartMessage> {
        loop {
            match self.rx.recv().await {
                Ok(env) if env.origin == self.origin => continue,
                Ok(env) => return Some(env.message),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(topic = %self.topic, missed, "Subscription lagged; dropping missed notifications");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Detaches the subscription.
    pub fn close(self) {
        drop(self);
    }
}

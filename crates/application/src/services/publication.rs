//! Publication layer
//!
//! Keeps the set of live subscribers and fans each new cache snapshot out to
//! them. Delivery is best-effort and never waits on a subscriber: every
//! subscriber owns a bounded queue, and a full queue only costs that
//! subscriber the update.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use domain::WeatherSnapshot;
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::services::WeatherCache;

/// Default number of undelivered snapshots a subscriber may have queued
pub const DEFAULT_SUBSCRIBER_QUEUE: usize = 8;

/// Identifier of one push-channel subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a subscriber connection
///
/// `Connecting` lasts until the transport handshake completes and
/// `Publisher::subscribe` is called. `Disconnected` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberState {
    /// Transport handshake in progress, not yet registered
    Connecting,
    /// Registered and receiving broadcasts
    Connected,
    /// Removed from the broadcast set
    Disconnected,
}

impl fmt::Display for SubscriberState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Outcome counts of one broadcast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Subscribers the snapshot was queued for
    pub delivered: usize,
    /// Subscribers skipped because they already had this cycle or a newer one
    pub skipped: usize,
    /// Subscribers whose queue was full
    pub dropped: usize,
    /// Subscribers found closed and removed
    pub removed: usize,
}

struct SubscriberSlot {
    sender: mpsc::Sender<Arc<WeatherSnapshot>>,
    /// Highest cycle queued for this subscriber
    last_cycle: u64,
}

/// Subscriber registry and broadcaster
pub struct Publisher {
    cache: WeatherCache,
    subscribers: Mutex<HashMap<SubscriberId, SubscriberSlot>>,
    queue_capacity: usize,
    closed: AtomicBool,
}

impl fmt::Debug for Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("subscribers", &self.subscriber_count())
            .field("queue_capacity", &self.queue_capacity)
            .finish_non_exhaustive()
    }
}

impl Publisher {
    /// Create a publisher reading late-joiner snapshots from `cache`
    #[must_use]
    pub fn new(cache: WeatherCache) -> Self {
        Self::with_queue_capacity(cache, DEFAULT_SUBSCRIBER_QUEUE)
    }

    /// Create a publisher with a custom per-subscriber queue size (minimum 1)
    #[must_use]
    pub fn with_queue_capacity(cache: WeatherCache, queue_capacity: usize) -> Self {
        Self {
            cache,
            subscribers: Mutex::new(HashMap::new()),
            queue_capacity: queue_capacity.max(1),
            closed: AtomicBool::new(false),
        }
    }

    /// Register a subscriber; the current snapshot is queued for it immediately
    ///
    /// Registration and the initial send happen under the registry lock, so a
    /// concurrent broadcast either reaches the subscriber after the initial
    /// snapshot or is recognised as already delivered. After `close_all` the
    /// subscription yields the current snapshot and then ends.
    pub fn subscribe(self: &Arc<Self>) -> Subscription {
        let id = SubscriberId::new();
        let (sender, receiver) = mpsc::channel(self.queue_capacity);

        let mut subscribers = self.subscribers.lock();
        let current = self.cache.get();
        let last_cycle = current.cycle();
        // Fresh queue with capacity >= 1 cannot be full
        let _ = sender.try_send(current);
        if !self.closed.load(Ordering::Acquire) {
            subscribers.insert(id, SubscriberSlot { sender, last_cycle });
        }
        let total = subscribers.len();
        drop(subscribers);

        info!(subscriber = %id, cycle = last_cycle, subscribers = total, "Subscriber connected");

        Subscription {
            id,
            receiver,
            publisher: Arc::clone(self),
            state: SubscriberState::Connected,
        }
    }

    /// Queue `snapshot` for every subscriber that has not seen its cycle yet
    pub fn broadcast(&self, snapshot: &Arc<WeatherSnapshot>) -> BroadcastReport {
        let cycle = snapshot.cycle();
        let mut report = BroadcastReport::default();
        let mut subscribers = self.subscribers.lock();

        subscribers.retain(|id, slot| {
            if slot.last_cycle >= cycle {
                report.skipped += 1;
                return true;
            }
            match slot.sender.try_send(Arc::clone(snapshot)) {
                Ok(()) => {
                    slot.last_cycle = cycle;
                    report.delivered += 1;
                    true
                },
                Err(TrySendError::Full(_)) => {
                    warn!(subscriber = %id, cycle, "Subscriber queue full, dropping update");
                    report.dropped += 1;
                    true
                },
                Err(TrySendError::Closed(_)) => {
                    debug!(subscriber = %id, "Subscriber gone, removing");
                    report.removed += 1;
                    false
                },
            }
        });
        drop(subscribers);

        debug!(
            cycle,
            delivered = report.delivered,
            skipped = report.skipped,
            dropped = report.dropped,
            removed = report.removed,
            "Broadcast complete"
        );
        report
    }

    /// Disconnect every subscriber and refuse new registrations
    ///
    /// Each subscription still receives what was already queued for it, then
    /// `recv` returns `None`. Returns the number of subscribers released.
    pub fn close_all(&self) -> usize {
        let mut subscribers = self.subscribers.lock();
        self.closed.store(true, Ordering::Release);
        let released = subscribers.len();
        subscribers.clear();
        drop(subscribers);

        info!(subscribers = released, "Publisher closed");
        released
    }

    /// Whether `close_all` has been called
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of registered subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    fn unsubscribe(&self, id: SubscriberId) {
        if self.subscribers.lock().remove(&id).is_some() {
            info!(subscriber = %id, "Subscriber disconnected");
        }
    }
}

/// A registered subscriber's end of the broadcast
///
/// Dropping the subscription disconnects it.
pub struct Subscription {
    id: SubscriberId,
    receiver: mpsc::Receiver<Arc<WeatherSnapshot>>,
    publisher: Arc<Publisher>,
    state: SubscriberState,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Subscription {
    /// Subscriber identifier
    #[must_use]
    pub const fn id(&self) -> SubscriberId {
        self.id
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> SubscriberState {
        self.state
    }

    /// Wait for the next snapshot; `None` once disconnected
    pub async fn recv(&mut self) -> Option<Arc<WeatherSnapshot>> {
        if self.state == SubscriberState::Disconnected {
            return None;
        }
        self.receiver.recv().await
    }

    /// Leave the broadcast set; further `recv` calls return `None`
    pub fn close(&mut self) {
        if self.state == SubscriberState::Disconnected {
            return;
        }
        self.state = SubscriberState::Disconnected;
        self.publisher.unsubscribe(self.id);
        self.receiver.close();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}

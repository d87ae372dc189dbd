//! # SubscriberSet: non-blocking fan-out over bounded per-subscriber channels.
//!
//! Each subscriber owns a bounded `mpsc` channel. Fan-out is a `try_send`
//! per subscriber: a full or closed channel drops that event **for that
//! subscriber only**, with a warning. The journal is written first, so a
//! drop here never loses history — a subscriber that fell behind can
//! resubscribe with a `from` timestamp and replay.
//!
//! ## What it guarantees
//! - `emit` never blocks the caller.
//! - Per-subscriber FIFO; the sequence a non-dropping subscriber sees is a
//!   prefix-preserving copy of the journal from its subscription point.
//! - Subscribe replays history and inserts the channel under one write
//!   lock, so no live event lands between the replayed backlog and the
//!   first live delivery.
//! - Unsubscribe is idempotent; after it returns, no further events reach
//!   that channel (the sender is dropped under the write lock).
//!
//! The lock is reader-writer because membership changes come from external
//! API calls, not the loop: fan-out takes read, subscribe/unsubscribe take
//! write.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, RwLock};
use tracing::warn;

use crate::events::{Event, Journal};

/// Receiving side of one subscription.
pub struct Subscription {
    id: u64,
    rx: mpsc::Receiver<Event>,
}

impl Subscription {
    /// Opaque id used by `unsubscribe`.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Next event, or `None` once unsubscribed and drained.
    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

/// Fan-out set of bounded subscriber channels.
pub struct SubscriberSet {
    subs: RwLock<HashMap<u64, mpsc::Sender<Event>>>,
    next_id: AtomicU64,
    capacity: usize,
}

impl SubscriberSet {
    /// Creates an empty set; every subscriber channel gets `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            subs: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            capacity: capacity.max(1),
        }
    }

    /// Registers a new subscriber.
    ///
    /// With `from = Some(t)`, every journalled event with timestamp
    /// strictly after `t` is replayed into the channel before it goes
    /// live; `None` skips replay. Replay happens under the write lock:
    /// concurrent emits queue behind it and are delivered in order
    /// afterwards. Replayed events are subject to the same drop-on-full
    /// policy as live fan-out.
    pub async fn subscribe(
        &self,
        journal: &Journal,
        from: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Subscription {
        let mut subs = self.subs.write().await;
        let (tx, rx) = mpsc::channel(self.capacity);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        if from.is_some() {
            for event in journal.events_after(from).await {
                if tx.try_send(event).is_err() {
                    warn!(subscriber = id, "replay event not sent to subscriber");
                }
            }
        }

        subs.insert(id, tx);
        Subscription { id, rx }
    }

    /// Removes a subscriber and closes its channel. Returns `false` when
    /// the id was already gone.
    pub async fn unsubscribe(&self, id: u64) -> bool {
        self.subs.write().await.remove(&id).is_some()
    }

    /// Delivers one event to every subscriber, non-blocking.
    pub async fn emit(&self, event: &Event) {
        let subs = self.subs.read().await;
        for (id, tx) in subs.iter() {
            match tx.try_send(event.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(subscriber = id, event = %event.kind, "event not sent to subscriber");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    warn!(subscriber = id, event = %event.kind, "subscriber channel closed");
                }
            }
        }
    }

    /// Number of live subscribers.
    pub async fn len(&self) -> usize {
        self.subs.read().await.len()
    }

    /// True when no one is subscribed.
    pub async fn is_empty(&self) -> bool {
        self.subs.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{journal::EVENTS_LOG, EventKind};

    async fn empty_journal(dir: &tempfile::TempDir) -> Journal {
        Journal::open(dir.path().join(EVENTS_LOG)).await.unwrap()
    }

    #[tokio::test]
    async fn emit_reaches_every_subscriber() {
        let dir = tempfile::tempdir().unwrap();
        let journal = empty_journal(&dir).await;
        let set = SubscriberSet::new(8);

        let mut a = set.subscribe(&journal, None).await;
        let mut b = set.subscribe(&journal, None).await;

        set.emit(&Event::new(EventKind::Oom, "c1")).await;

        assert_eq!(a.recv().await.unwrap().id, "c1");
        assert_eq!(b.recv().await.unwrap().id, "c1");
    }

    #[tokio::test]
    async fn full_subscriber_drops_without_blocking() {
        let dir = tempfile::tempdir().unwrap();
        let journal = empty_journal(&dir).await;
        let set = SubscriberSet::new(2);

        let mut sub = set.subscribe(&journal, None).await;
        for i in 0..5 {
            set.emit(&Event::new(EventKind::Oom, format!("c{i}"))).await;
        }

        // Capacity 2: first two buffered, the rest dropped for this subscriber.
        assert_eq!(sub.try_recv().unwrap().id, "c0");
        assert_eq!(sub.try_recv().unwrap().id, "c1");
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn unsubscribe_is_idempotent_and_closes() {
        let dir = tempfile::tempdir().unwrap();
        let journal = empty_journal(&dir).await;
        let set = SubscriberSet::new(4);

        let mut sub = set.subscribe(&journal, None).await;
        let id = sub.id();
        assert!(set.unsubscribe(id).await);
        assert!(!set.unsubscribe(id).await);

        set.emit(&Event::new(EventKind::Oom, "c1")).await;
        assert!(sub.recv().await.is_none());
    }

    #[tokio::test]
    async fn replay_delivers_journal_tail_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let journal = empty_journal(&dir).await;
        let set = SubscriberSet::new(8);

        let first = Event::new(EventKind::Oom, "c1");
        journal.append(&first).await;
        journal.append(&Event::new(EventKind::Oom, "c2")).await;
        journal.append(&Event::new(EventKind::Oom, "c3")).await;

        let mut sub = set.subscribe(&journal, Some(first.timestamp)).await;
        assert_eq!(sub.recv().await.unwrap().id, "c2");
        assert_eq!(sub.recv().await.unwrap().id, "c3");
        assert!(sub.try_recv().is_none());
    }
}

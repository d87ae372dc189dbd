//! # Supervisor metrics: counters and a latency timer.
//!
//! Lock-free instrumentation updated from the event loop, the intake, and
//! deferred workers. The counter set mirrors what the supervisor tracks
//! operationally: tasks dispatched, containers in the table, events
//! emitted, live subscribers, and the latency of stats collection.
//!
//! Readers take a [`MetricsSnapshot`]; there is no external backend, an
//! embedding daemon exports the snapshot however it likes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Monotonic (or inc/dec gauge-style) counter.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    /// Adds one.
    pub fn incr(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Subtracts one. Callers pair every `decr` with an earlier `incr`.
    pub fn decr(&self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }

    /// Current value.
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Accumulating latency timer: sample count plus total elapsed time.
#[derive(Debug, Default)]
pub struct LatencyTimer {
    count: AtomicU64,
    total_ns: AtomicU64,
}

impl LatencyTimer {
    /// Records one sample.
    pub fn record(&self, elapsed: Duration) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total_ns
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Number of recorded samples.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Mean sample duration, or `None` before the first sample.
    pub fn average(&self) -> Option<Duration> {
        let count = self.count();
        if count == 0 {
            return None;
        }
        let total = self.total_ns.load(Ordering::Relaxed);
        Some(Duration::from_nanos(total / count))
    }
}

/// All supervisor instrumentation, shared via `Arc`.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Tasks dispatched by the event loop (external, restored, synthetic).
    pub tasks: Counter,
    /// Containers currently in the table.
    pub containers: Counter,
    /// Events emitted through the journal/fan-out path.
    pub events: Counter,
    /// Live event subscribers.
    pub subscribers: Counter,
    /// Latency of deferred stats collection.
    pub stats_latency: LatencyTimer,
}

impl Metrics {
    /// Creates zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point-in-time copy of every counter.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            tasks: self.tasks.get(),
            containers: self.containers.get(),
            events: self.events.get(),
            subscribers: self.subscribers.get(),
            stats_samples: self.stats_latency.count(),
        }
    }
}

/// Point-in-time view of [`Metrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Tasks dispatched.
    pub tasks: u64,
    /// Containers currently tracked.
    pub containers: u64,
    /// Events emitted.
    pub events: u64,
    /// Live subscribers.
    pub subscribers: u64,
    /// Stats latency samples recorded.
    pub stats_samples: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_inc_dec() {
        let c = Counter::default();
        c.incr();
        c.incr();
        c.decr();
        assert_eq!(c.get(), 1);
    }

    #[test]
    fn timer_average() {
        let t = LatencyTimer::default();
        assert_eq!(t.average(), None);
        t.record(Duration::from_millis(10));
        t.record(Duration::from_millis(20));
        assert_eq!(t.count(), 2);
        assert_eq!(t.average(), Some(Duration::from_millis(15)));
    }

    #[test]
    fn snapshot_reflects_counters() {
        let m = Metrics::new();
        m.tasks.incr();
        m.containers.incr();
        m.events.incr();
        m.events.incr();
        let snap = m.snapshot();
        assert_eq!(snap.tasks, 1);
        assert_eq!(snap.events, 2);
        assert_eq!(snap.subscribers, 0);
    }
}

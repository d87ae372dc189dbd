//! Polling exit monitor.
//!
//! Watches registered processes by asking each for its recorded exit
//! status on an interval. Works anywhere `Process::exit_status` works,
//! which makes it the portable fallback among monitor backends.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::{mpsc, RwLock};
use tokio::time::{interval, MissedTickBehavior};

use crate::error::SupervisorError;
use crate::monitor::ProcessMonitor;
use crate::runtime::ProcessRef;

/// Buffered exits awaiting the supervisor's bridge.
const EXIT_BUFFER: usize = 1024;

/// (container id, process id) — one watch per process.
type WatchKey = (String, String);

/// Interval-polling [`ProcessMonitor`] backend.
///
/// A process is removed from the watch table before its handle is sent,
/// so each registration produces exactly one delivery. Re-registering an
/// already-exited process produces another, which the exit handler
/// tolerates.
pub struct PollMonitor {
    watched: DashMap<WatchKey, ProcessRef>,
    exits_tx: mpsc::Sender<ProcessRef>,
    exits_rx: RwLock<Option<mpsc::Receiver<ProcessRef>>>,
}

impl PollMonitor {
    /// Creates the monitor and spawns its poll task. The task stops once
    /// the last `Arc` to the monitor is dropped.
    pub fn new(poll_interval: Duration) -> Arc<Self> {
        let (tx, rx) = mpsc::channel(EXIT_BUFFER);
        let monitor = Arc::new(Self {
            watched: DashMap::new(),
            exits_tx: tx,
            exits_rx: RwLock::new(Some(rx)),
        });

        let weak = Arc::downgrade(&monitor);
        tokio::spawn(async move {
            let mut tick = interval(poll_interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tick.tick().await;
                let Some(monitor) = weak.upgrade() else { break };
                monitor.poll_once().await;
            }
        });

        monitor
    }

    async fn poll_once(&self) {
        // Snapshot first: exit_status may suspend, and map shards must not
        // stay locked across it.
        let watched: Vec<(WatchKey, ProcessRef)> = self
            .watched
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        for (key, process) in watched {
            if process.exit_status().await.is_ok() && self.watched.remove(&key).is_some() {
                // Blocking send: exits back up the poll task, never get lost.
                let _ = self.exits_tx.send(process).await;
            }
        }
    }

    /// Number of processes currently watched.
    pub fn watched_len(&self) -> usize {
        self.watched.len()
    }
}

#[async_trait]
impl ProcessMonitor for PollMonitor {
    fn monitor(&self, process: ProcessRef) -> Result<(), SupervisorError> {
        let key = (
            process.container_id().to_string(),
            process.id().to_string(),
        );
        self.watched.insert(key, process);
        Ok(())
    }

    async fn take_exits(&self) -> Option<mpsc::Receiver<ProcessRef>> {
        self.exits_rx.write().await.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    struct TestProcess {
        id: String,
        container: String,
        exit: StdMutex<Option<i32>>,
    }

    impl TestProcess {
        fn alive(container: &str, id: &str) -> Arc<Self> {
            Arc::new(Self {
                id: id.into(),
                container: container.into(),
                exit: StdMutex::new(None),
            })
        }

        fn set_exited(&self, status: i32) {
            *self.exit.lock().unwrap() = Some(status);
        }
    }

    #[async_trait]
    impl crate::runtime::Process for TestProcess {
        fn id(&self) -> &str {
            &self.id
        }

        fn container_id(&self) -> &str {
            &self.container
        }

        async fn exit_status(&self) -> Result<i32, SupervisorError> {
            self.exit
                .lock()
                .unwrap()
                .ok_or(SupervisorError::ProcessNotExited { id: self.id.clone() })
        }
    }

    #[tokio::test]
    async fn delivers_exit_once() {
        let monitor = PollMonitor::new(Duration::from_millis(5));
        let mut exits = monitor.take_exits().await.unwrap();
        assert!(monitor.take_exits().await.is_none());

        let proc = TestProcess::alive("c1", "init");
        monitor.monitor(proc.clone()).unwrap();
        assert_eq!(monitor.watched_len(), 1);

        proc.set_exited(0);
        let exited = exits.recv().await.unwrap();
        assert_eq!(exited.id(), "init");
        assert_eq!(exited.container_id(), "c1");
        assert_eq!(monitor.watched_len(), 0);

        // No further delivery for the same registration.
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert!(exits.try_recv().is_err());
    }

    #[tokio::test]
    async fn live_process_stays_watched() {
        let monitor = PollMonitor::new(Duration::from_millis(5));
        let mut exits = monitor.take_exits().await.unwrap();

        let proc = TestProcess::alive("c1", "logger");
        monitor.monitor(proc).unwrap();

        tokio::time::sleep(Duration::from_millis(25)).await;
        assert_eq!(monitor.watched_len(), 1);
        assert!(exits.try_recv().is_err());
    }
}

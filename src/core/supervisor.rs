//! # Supervisor: the single-writer event loop and its handle.
//!
//! [`Supervisor`] owns the authoritative container table and is consumed
//! by [`start`](Supervisor::start), which spawns the loop task. The loop
//! is the only code that reads or writes the table, so handlers treat it
//! as single-threaded state. Everything outside the loop (external
//! callers, the process monitor, the OOM notifier) reaches the table
//! exclusively by enqueueing [`Task`]s through a clonable
//! [`SupervisorHandle`].
//!
//! ## Rules
//! - The intake queue is bounded; `submit` blocking on a full queue is the
//!   backpressure signal. No task is dropped silently.
//! - Tasks dispatch in enqueue order; a handler error fails only its own
//!   task and the loop continues.
//! - `stop()` closes the intake: no new tasks, in-flight tasks drain,
//!   deferred workers finish on their own.
//! - `notify` journals every event before fanning it out.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::SupervisorError;
use crate::events::{journal::EVENTS_LOG, Event, Journal, SubscriberSet, Subscription};
use crate::metrics::Metrics;
use crate::monitor::ProcessMonitor;
use crate::runtime::{ContainerRef, Runtime};
use crate::tasks::{Task, TaskKind};

/// Run state of one table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryStatus {
    /// Init is alive; runtime-touching tasks are admitted.
    Running,
    /// Init has exited; only Delete and queries remain valid.
    Exited,
}

/// One container table entry. Holds the sole runtime handle for its id.
pub(crate) struct ContainerEntry {
    pub(crate) container: ContainerRef,
    pub(crate) status: EntryStatus,
}

impl ContainerEntry {
    pub(crate) fn running(container: ContainerRef) -> Self {
        Self {
            container,
            status: EntryStatus::Running,
        }
    }
}

/// The supervisor core: container table, journal, fan-out, intake.
pub struct Supervisor {
    pub(crate) cfg: Config,
    pub(crate) runtime: Arc<dyn Runtime>,
    pub(crate) monitor: Arc<dyn ProcessMonitor>,
    pub(crate) containers: HashMap<String, ContainerEntry>,
    pub(crate) journal: Arc<Journal>,
    pub(crate) subs: Arc<SubscriberSet>,
    pub(crate) metrics: Arc<Metrics>,
    tasks_tx: mpsc::Sender<Task>,
    tasks_rx: mpsc::Receiver<Task>,
    oom: Option<mpsc::Receiver<String>>,
    token: CancellationToken,
}

impl Supervisor {
    /// Builds a supervisor rooted at `cfg.state_dir`: creates the state
    /// directory, opens the journal (reading back past events), and runs
    /// restore. Restore failures are fatal here; the operator must
    /// intervene before the daemon can run.
    ///
    /// The loop does not run until [`start`](Self::start); tasks restore
    /// enqueued are dispatched first once it does.
    pub async fn new(
        cfg: Config,
        runtime: Arc<dyn Runtime>,
        monitor: Arc<dyn ProcessMonitor>,
    ) -> Result<Self, SupervisorError> {
        tokio::fs::create_dir_all(&cfg.state_dir).await?;
        let journal = Arc::new(Journal::open(cfg.state_dir.join(EVENTS_LOG)).await?);
        let subs = Arc::new(SubscriberSet::new(cfg.subscriber_capacity));
        let (tasks_tx, tasks_rx) = mpsc::channel(cfg.task_queue_capacity);

        let mut supervisor = Self {
            cfg,
            runtime,
            monitor,
            containers: HashMap::new(),
            journal,
            subs,
            metrics: Arc::new(Metrics::new()),
            tasks_tx,
            tasks_rx,
            oom: None,
            token: CancellationToken::new(),
        };
        supervisor.restore().await?;
        Ok(supervisor)
    }

    /// Attaches an OOM notification stream: each received container id
    /// becomes one `Oom` task.
    pub fn with_oom_notifier(mut self, notifications: mpsc::Receiver<String>) -> Self {
        self.oom = Some(notifications);
        self
    }

    /// Returns a handle for submitting tasks, subscribing to events, and
    /// stopping the supervisor. Valid before and after `start`.
    pub fn handle(&self) -> SupervisorHandle {
        SupervisorHandle {
            tx: self.tasks_tx.clone(),
            subs: Arc::clone(&self.subs),
            journal: Arc::clone(&self.journal),
            metrics: Arc::clone(&self.metrics),
            token: self.token.clone(),
        }
    }

    /// Spawns the monitor/OOM bridges and the event loop, consuming the
    /// supervisor. The returned handle joins when the loop has drained
    /// after [`SupervisorHandle::stop`].
    pub async fn start(mut self) -> JoinHandle<()> {
        if let Some(mut exits) = self.monitor.take_exits().await {
            let tx = self.tasks_tx.clone();
            tokio::spawn(async move {
                while let Some(process) = exits.recv().await {
                    let id = process.container_id().to_string();
                    let (task, _handle) = Task::new(id, TaskKind::Exit { process });
                    if tx.send(task).await.is_err() {
                        break;
                    }
                }
            });
        }

        if let Some(mut oom) = self.oom.take() {
            let tx = self.tasks_tx.clone();
            tokio::spawn(async move {
                while let Some(id) = oom.recv().await {
                    let (task, _handle) = Task::new(id, TaskKind::Oom);
                    if tx.send(task).await.is_err() {
                        break;
                    }
                }
            });
        }

        tokio::spawn(async move { self.run().await })
    }

    /// The event loop: one task at a time, sole mutator of the table.
    async fn run(mut self) {
        debug!(state_dir = %self.cfg.state_dir.display(), "supervisor running");
        let mut draining = false;
        loop {
            tokio::select! {
                biased;
                _ = self.token.cancelled(), if !draining => {
                    // Close the intake: senders fail from here on, queued
                    // tasks still drain below.
                    self.tasks_rx.close();
                    draining = true;
                }
                task = self.tasks_rx.recv() => match task {
                    Some(task) => self.dispatch(task).await,
                    None => break,
                },
            }
        }
        self.journal.sync().await;
        debug!("supervisor stopped");
    }

    /// Journals `event`, then fans it out to subscribers. Fan-out never
    /// blocks; per-subscriber overflow drops are logged by the set.
    pub(crate) async fn notify(&self, event: Event) {
        self.metrics.events.incr();
        self.journal.append(&event).await;
        self.subs.emit(&event).await;
    }
}

/// Clonable front door to a running (or starting) supervisor.
#[derive(Clone)]
pub struct SupervisorHandle {
    tx: mpsc::Sender<Task>,
    subs: Arc<SubscriberSet>,
    journal: Arc<Journal>,
    metrics: Arc<Metrics>,
    token: CancellationToken,
}

impl SupervisorHandle {
    /// Enqueues a task. Blocks while the queue is full (backpressure);
    /// fails with `IntakeClosed` once [`stop`](Self::stop) has been called.
    pub async fn submit(&self, task: Task) -> Result<(), SupervisorError> {
        self.tx
            .send(task)
            .await
            .map_err(|_| SupervisorError::IntakeClosed)
    }

    /// Subscribes to the event stream.
    ///
    /// With `from = Some(t)` the journal is replayed first: every event
    /// with timestamp strictly after `t`, in journal order, then live
    /// events. `None` skips replay.
    pub async fn events(&self, from: Option<chrono::DateTime<chrono::Utc>>) -> Subscription {
        self.metrics.subscribers.incr();
        self.subs.subscribe(&self.journal, from).await
    }

    /// Removes a subscriber and closes its channel. After this returns no
    /// further events reach the subscription; draining what was already
    /// buffered yields `None` at the end. Idempotent.
    pub async fn unsubscribe(&self, subscription: &Subscription) {
        if self.subs.unsubscribe(subscription.id()).await {
            self.metrics.subscribers.decr();
        } else {
            warn!(subscriber = subscription.id(), "unsubscribe of unknown subscriber");
        }
    }

    /// Closes the task intake. Queued tasks drain, deferred workers run to
    /// completion, then the loop's join handle resolves.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Supervisor instrumentation.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// The event journal (replay log + `events.log`).
    pub fn journal(&self) -> &Journal {
        &self.journal
    }
}

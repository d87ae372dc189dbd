//! # boxvisor
//!
//! **Boxvisor** is the supervisor core of a container runtime daemon: the
//! authoritative in-memory model of every container and process on one
//! host, mutated by a single event loop, observable through a durable,
//! replayable event journal.
//!
//! ## Features
//!
//! | Area              | Description                                                          | Key types / traits                          |
//! |-------------------|----------------------------------------------------------------------|---------------------------------------------|
//! | **Event loop**    | Bounded task queue; the loop is the sole mutator of container state. | [`Supervisor`], [`SupervisorHandle`]        |
//! | **Tasks**         | State transitions with one-shot completion channels.                 | [`Task`], [`TaskKind`], [`TaskHandle`]      |
//! | **Events**        | Journalled, fanned out to bounded subscriber channels, replayable.   | [`Event`], [`Journal`], [`Subscription`]    |
//! | **Monitor**       | Kernel exit notifications bridged into Exit tasks.                   | [`ProcessMonitor`], [`PollMonitor`]         |
//! | **Runtime seam**  | The OS-facing container interface the core drives.                   | [`Runtime`], [`Container`], [`Process`]     |
//! | **Errors**        | Typed errors for every handler and the runtime seam.                 | [`SupervisorError`]                         |
//! | **Configuration** | State directory and queue capacities.                                | [`Config`]                                  |
//!
//! ## Shape
//!
//! ```text
//! callers ──► SupervisorHandle::submit ──► bounded intake ──► event loop
//! monitor ──► Exit tasks ─────────────────────┘                  │
//! restore ──► Exit tasks (init last) ─────────┘                  ▼
//!                                               handlers mutate the table
//!                                                      and notify()
//!                                                           │
//!                                          journal (events.log) + fan-out
//! ```
//!
//! The loop owns the container table outright; subscribers and the
//! journal are the only shared objects, and they sit behind their own
//! synchronization. `events(from)` replays journal history strictly after
//! `from`, then streams live — a subscriber that joins late misses
//! nothing.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use boxvisor::{Config, PollMonitor, Supervisor, Task, TaskKind};
//! # use std::path::Path;
//! # use async_trait::async_trait;
//! # use boxvisor::{ContainerRef, Runtime, SupervisorError};
//! # struct MyRuntime;
//! # #[async_trait]
//! # impl Runtime for MyRuntime {
//! #     async fn create(&self, _: &str, _: &Path, _: &Path) -> Result<ContainerRef, SupervisorError> {
//! #         unimplemented!()
//! #     }
//! #     async fn load(&self, _: &Path, _: &str) -> Result<ContainerRef, SupervisorError> {
//! #         unimplemented!()
//! #     }
//! # }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runtime = Arc::new(MyRuntime);
//!     let monitor = PollMonitor::new(Duration::from_millis(100));
//!
//!     let supervisor =
//!         Supervisor::new(Config::new("/run/boxvisor"), runtime, monitor).await?;
//!     let handle = supervisor.handle();
//!     let _loop = supervisor.start().await;
//!
//!     // Follow everything that happens from here on.
//!     let mut events = handle.events(None).await;
//!
//!     let (task, done) = Task::new("c1", TaskKind::Start { bundle: "/var/bundles/c1".into() });
//!     handle.submit(task).await?;
//!     done.wait().await?;
//!
//!     while let Some(event) = events.recv().await {
//!         println!("{} {}", event.kind, event.id);
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod metrics;
mod monitor;
mod runtime;
mod tasks;

// ---- Public re-exports ----

pub use config::{Config, DEFAULT_BUFFER_SIZE};
pub use core::{Supervisor, SupervisorHandle};
pub use error::SupervisorError;
pub use events::{Event, EventKind, Journal, SubscriberSet, Subscription, EVENTS_LOG};
pub use metrics::{Counter, LatencyTimer, Metrics, MetricsSnapshot};
pub use monitor::{PollMonitor, ProcessMonitor};
pub use runtime::{
    Checkpoint, Container, ContainerRef, ContainerSummary, Process, ProcessRef, ProcessSpec,
    ProcessUpdate, Runtime, Stat, State, INIT_PROCESS_ID,
};
pub use tasks::{Reply, Task, TaskHandle, TaskKind};

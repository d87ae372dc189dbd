//! # Process monitor: kernel exit notifications as a channel.
//!
//! [`ProcessMonitor`] abstracts whatever facility the platform offers for
//! learning that a process died — pidfd/epoll, kqueue, or polling a
//! runtime-maintained exit file. The supervisor only needs two things:
//!
//! - `monitor(process)` — begin watching one process.
//! - `take_exits()` — the receive end of an infinite sequence of exited
//!   process handles, delivered at least once per registered process.
//!
//! ## Contract
//! - Delivery is at-least-once; the exit handler tolerates duplicates
//!   (re-emitting an identical exit event is harmless, the journal is
//!   append-only). Duplicate suppression is explicitly not promised.
//! - The monitor never mutates container state — it only feeds process
//!   handles to the supervisor's exit bridge, which turns them into Exit
//!   tasks.
//! - `take_exits` yields the receiver once; the supervisor claims it when
//!   it starts.
//!
//! [`PollMonitor`] is the portable backend shipped with the crate.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::SupervisorError;
use crate::runtime::ProcessRef;

mod poll;

pub use poll::PollMonitor;

/// Platform-neutral process-exit notification facility.
#[async_trait]
pub trait ProcessMonitor: Send + Sync + 'static {
    /// Begins watching `process`. Fails if the backend cannot register it.
    fn monitor(&self, process: ProcessRef) -> Result<(), SupervisorError>;

    /// Claims the exit stream. Yields `Some` exactly once; later calls
    /// return `None`.
    async fn take_exits(&self) -> Option<mpsc::Receiver<ProcessRef>>;
}

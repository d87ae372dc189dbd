//! # Handlers: the state-machine transitions behind each task kind.
//!
//! One file per handler family, each an `impl Supervisor` block, matching
//! the per-container lifecycle:
//!
//! ```text
//! absent ──Start──► running ──Exit(init)──► exited ──Delete──► absent
//!                     │  ▲
//!     AddProcess, Signal, Update*, Checkpoint*, Stats, ExecExit
//! ```
//!
//! Handlers run on the event loop and may mutate the container table
//! freely — the loop serializes them. A handler that would block
//! (stats collection) defers: it moves the task's completion channels
//! into a worker and returns [`Dispatch::Pending`]; everything else
//! returns [`Dispatch::Done`] and the loop writes the channels.

use tracing::debug;

use crate::core::supervisor::{EntryStatus, Supervisor};
use crate::error::SupervisorError;
use crate::runtime::ContainerRef;
use crate::tasks::{Dispatch, Reply, Task, TaskKind};

mod checkpoint;
mod delete;
mod exit;
mod oom;
mod process;
mod query;
mod signal;
mod start;
mod stats;
mod update;

/// What a synchronous handler resolves to.
pub(crate) type HandlerResult = Result<Option<Reply>, SupervisorError>;

impl Supervisor {
    /// Looks up a handler by task kind and runs it, then completes the
    /// task unless the handler deferred.
    pub(crate) async fn dispatch(&mut self, task: Task) {
        self.metrics.tasks.incr();
        let Task {
            id,
            kind,
            completion,
        } = task;
        let mut completion = Some(completion);

        let outcome = match kind {
            TaskKind::Start { bundle } => {
                Dispatch::Done(self.start_container(&id, &bundle).await)
            }
            TaskKind::Exit { process } => Dispatch::Done(self.process_exited(process).await),
            TaskKind::ExecExit { process } => Dispatch::Done(self.exec_exited(process).await),
            TaskKind::Delete => Dispatch::Done(self.delete_container(&id).await),
            TaskKind::GetContainers => Dispatch::Done(self.get_containers()),
            TaskKind::Signal { pid, signal } => {
                Dispatch::Done(self.signal_process(&id, &pid, signal).await)
            }
            TaskKind::AddProcess { spec } => Dispatch::Done(self.add_process(&id, spec).await),
            TaskKind::UpdateContainer { state } => {
                Dispatch::Done(self.update_container(&id, state).await)
            }
            TaskKind::UpdateProcess { pid, update } => {
                Dispatch::Done(self.update_process(&id, &pid, update).await)
            }
            TaskKind::CreateCheckpoint { checkpoint } => {
                Dispatch::Done(self.create_checkpoint(&id, checkpoint).await)
            }
            TaskKind::DeleteCheckpoint { name } => {
                Dispatch::Done(self.delete_checkpoint(&id, &name).await)
            }
            TaskKind::Stats => self.container_stats(&id, &mut completion),
            TaskKind::Oom => Dispatch::Done(self.oom(&id).await),
        };

        match outcome {
            Dispatch::Pending => debug!(id = %id, "task deferred to worker"),
            Dispatch::Done(result) => {
                if let Err(e) = &result {
                    debug!(id = %id, error = %e, label = e.as_label(), "task failed");
                }
                if let Some(completion) = completion.take() {
                    completion.finish(result);
                }
            }
        }
    }

    /// The container's runtime handle, gated on liveness: `ContainerNotFound`
    /// for unknown ids, `ContainerExited` once init is gone.
    pub(crate) fn live_container(&self, id: &str) -> Result<ContainerRef, SupervisorError> {
        match self.containers.get(id) {
            None => Err(SupervisorError::ContainerNotFound { id: id.into() }),
            Some(entry) if entry.status == EntryStatus::Exited => {
                Err(SupervisorError::ContainerExited { id: id.into() })
            }
            Some(entry) => Ok(entry.container.clone()),
        }
    }
}

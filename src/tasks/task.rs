//! # Tasks: requested state transitions with their completion channels.
//!
//! A [`Task`] is the only way any caller, inside the crate or out, asks
//! the supervisor to change state. Each task carries two one-shot
//! completion slots:
//!
//! - an **error slot**, written exactly once per task;
//! - an optional **reply slot**, written at most once, only after a nil
//!   error, and only for the task kinds that return data
//!   (`Stats`, `GetContainers`).
//!
//! The caller keeps the [`TaskHandle`] (receive ends); the handler owns
//! the send ends. A task is single-use.
//!
//! ## Deferral
//! Handlers return [`Dispatch`]: `Done(result)` means the loop completes
//! the channels; `Pending` means the handler moved the [`Completion`] into
//! a worker that will complete them off the loop. `Pending` is the only
//! way to release the loop before a task's channels are written.

use std::path::PathBuf;

use tokio::sync::oneshot;

use crate::error::SupervisorError;
use crate::runtime::{
    Checkpoint, ContainerSummary, ProcessRef, ProcessSpec, ProcessUpdate, Stat, State,
};

/// The closed set of state transitions the supervisor dispatches.
pub enum TaskKind {
    /// Create a container from a bundle and start tracking it.
    Start {
        /// Bundle directory on disk.
        bundle: PathBuf,
    },
    /// A watched process exited. Synthesized by the monitor bridge and by
    /// restore; init exits retire the container, others route to ExecExit.
    Exit {
        /// The exited process handle.
        process: ProcessRef,
    },
    /// A non-init process exited.
    ExecExit {
        /// The exited process handle.
        process: ProcessRef,
    },
    /// Remove an exited container from the table and release its resources.
    Delete,
    /// Reply with a summary of every tracked container.
    GetContainers,
    /// Deliver a signal to one process.
    Signal {
        /// Target process id inside the container.
        pid: String,
        /// Signal number.
        signal: i32,
    },
    /// Exec an additional process inside a running container.
    AddProcess {
        /// Spec of the process to start.
        spec: ProcessSpec,
    },
    /// Pause or resume the container.
    UpdateContainer {
        /// Desired run state.
        state: State,
    },
    /// Apply a tty/stdin update to one process.
    UpdateProcess {
        /// Target process id inside the container.
        pid: String,
        /// The update to apply.
        update: ProcessUpdate,
    },
    /// Take a checkpoint.
    CreateCheckpoint {
        /// Checkpoint descriptor.
        checkpoint: Checkpoint,
    },
    /// Remove a checkpoint by name.
    DeleteCheckpoint {
        /// Checkpoint name.
        name: String,
    },
    /// Collect a stats sample (deferred to a worker).
    Stats,
    /// The container hit its memory limit. Synthesized by the OOM bridge.
    Oom,
}

impl TaskKind {
    /// True for task kinds that write the reply slot on success.
    fn returns_data(&self) -> bool {
        matches!(self, TaskKind::Stats | TaskKind::GetContainers)
    }
}

/// Data returned through a task's reply slot.
#[derive(Debug)]
pub enum Reply {
    /// Response to `Stats`.
    Stat(Stat),
    /// Response to `GetContainers`.
    Containers(Vec<ContainerSummary>),
}

/// Send ends of a task's completion channels.
pub(crate) struct Completion {
    done: oneshot::Sender<Result<(), SupervisorError>>,
    reply: Option<oneshot::Sender<Reply>>,
}

impl Completion {
    /// Writes the channels: the error slot always, the reply slot only on
    /// `Ok(Some(_))`. Dropped receive ends are ignored — synthetic tasks
    /// (monitor, restore, OOM) drop their handles up front.
    pub(crate) fn finish(self, result: Result<Option<Reply>, SupervisorError>) {
        match result {
            Err(e) => {
                let _ = self.done.send(Err(e));
            }
            Ok(reply) => {
                let _ = self.done.send(Ok(()));
                if let (Some(reply), Some(tx)) = (reply, self.reply) {
                    let _ = tx.send(reply);
                }
            }
        }
    }
}

/// What a handler did with a task.
pub(crate) enum Dispatch {
    /// The handler finished; the loop writes the completion channels.
    Done(Result<Option<Reply>, SupervisorError>),
    /// The handler moved the [`Completion`] into a worker task that will
    /// write the channels itself.
    Pending,
}

/// One requested state transition.
pub struct Task {
    /// Container id the task addresses. Empty only for `GetContainers`.
    pub id: String,
    /// The transition.
    pub kind: TaskKind,
    pub(crate) completion: Completion,
}

impl Task {
    /// Creates a task and the handle its submitter keeps.
    pub fn new(id: impl Into<String>, kind: TaskKind) -> (Task, TaskHandle) {
        let (done_tx, done_rx) = oneshot::channel();
        let (reply_tx, reply_rx) = if kind.returns_data() {
            let (tx, rx) = oneshot::channel();
            (Some(tx), Some(rx))
        } else {
            (None, None)
        };
        (
            Task {
                id: id.into(),
                kind,
                completion: Completion {
                    done: done_tx,
                    reply: reply_tx,
                },
            },
            TaskHandle {
                done: done_rx,
                reply: reply_rx,
            },
        )
    }
}

/// Receive ends of a task's completion channels.
pub struct TaskHandle {
    done: oneshot::Receiver<Result<(), SupervisorError>>,
    reply: Option<oneshot::Receiver<Reply>>,
}

impl TaskHandle {
    /// Waits for the task to complete.
    ///
    /// Returns the handler's error, or `Ok(Some(reply))` for the task
    /// kinds that return data and `Ok(None)` for the rest. Callers that
    /// need a timeout impose it on this future; there is no per-task
    /// cancellation.
    pub async fn wait(self) -> Result<Option<Reply>, SupervisorError> {
        self.done
            .await
            .map_err(|_| SupervisorError::TaskAborted)??;
        match self.reply {
            None => Ok(None),
            Some(rx) => Ok(Some(rx.await.map_err(|_| SupervisorError::TaskAborted)?)),
        }
    }
}

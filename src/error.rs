//! # Error types used by the supervisor core and the runtime seam.
//!
//! One enum covers both sides: errors the supervisor raises itself
//! (lookup failures, intake shutdown) and errors a runtime implementation
//! reports through the [`Runtime`](crate::runtime::Runtime) /
//! [`Container`](crate::runtime::Container) traits.
//!
//! Journal write failures never surface here — events are best-effort
//! durable and a full journal disk must not stop containers from running.
//! Restore-time I/O failures do surface, and are fatal to construction.

use thiserror::Error;

/// Errors produced by the supervisor and the runtime seam.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SupervisorError {
    /// No container with this id in the supervisor's table.
    #[error("container {id} not found")]
    ContainerNotFound {
        /// The missing container id.
        id: String,
    },
    /// A container with this id already exists; ids are unique per host.
    #[error("container {id} already exists")]
    ContainerExists {
        /// The duplicate container id.
        id: String,
    },
    /// The container's init process has exited; only Delete may follow.
    #[error("container {id} has exited")]
    ContainerExited {
        /// The exited container id.
        id: String,
    },
    /// The process has already exited.
    #[error("process {id} has exited")]
    ProcessExited {
        /// The process id inside its container.
        id: String,
    },
    /// The process has not exited; no exit status is recorded yet.
    #[error("process {id} has not exited")]
    ProcessNotExited {
        /// The process id inside its container.
        id: String,
    },
    /// No such process inside the container.
    #[error("process {id} not found in container {container}")]
    ProcessNotFound {
        /// The process id that was looked up.
        id: String,
        /// The container that was searched.
        container: String,
    },
    /// A checkpoint with this name already exists.
    #[error("checkpoint {name} already exists")]
    CheckpointExists {
        /// The duplicate checkpoint name.
        name: String,
    },
    /// No checkpoint with this name exists for the container.
    #[error("checkpoint {name} does not exist")]
    CheckpointNotExists {
        /// The missing checkpoint name.
        name: String,
    },
    /// The runtime backend does not support terminals.
    #[error("terminals are not supported by the runtime")]
    TerminalsNotSupported,
    /// The process does not belong to the container.
    #[error("not a child process of the container")]
    NotChildProcess,
    /// The on-disk state does not describe a container this runtime can load.
    #[error("invalid container type for the runtime")]
    InvalidContainerType,
    /// Registration with the process monitor failed.
    #[error("monitor registration failed: {reason}")]
    Monitor {
        /// Backend-specific failure description.
        reason: String,
    },
    /// Opaque failure inside a runtime implementation.
    #[error("runtime error: {reason}")]
    Runtime {
        /// Backend-specific failure description.
        reason: String,
    },
    /// The task intake is closed; the supervisor is stopping or stopped.
    #[error("task intake is closed")]
    IntakeClosed,
    /// The supervisor dropped the task's completion channels without
    /// writing them. Seen by callers only if the loop dies mid-task.
    #[error("task abandoned before completion")]
    TaskAborted,
    /// Filesystem error during construction or restore.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SupervisorError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SupervisorError::ContainerNotFound { .. } => "container_not_found",
            SupervisorError::ContainerExists { .. } => "container_exists",
            SupervisorError::ContainerExited { .. } => "container_exited",
            SupervisorError::ProcessExited { .. } => "process_exited",
            SupervisorError::ProcessNotExited { .. } => "process_not_exited",
            SupervisorError::ProcessNotFound { .. } => "process_not_found",
            SupervisorError::CheckpointExists { .. } => "checkpoint_exists",
            SupervisorError::CheckpointNotExists { .. } => "checkpoint_not_exists",
            SupervisorError::TerminalsNotSupported => "terminals_not_supported",
            SupervisorError::NotChildProcess => "not_child_process",
            SupervisorError::InvalidContainerType => "invalid_container_type",
            SupervisorError::Monitor { .. } => "monitor",
            SupervisorError::Runtime { .. } => "runtime",
            SupervisorError::IntakeClosed => "intake_closed",
            SupervisorError::TaskAborted => "task_aborted",
            SupervisorError::Io(_) => "io",
        }
    }
}

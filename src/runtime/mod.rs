//! # Runtime abstraction: the seam between the supervisor and the OS.
//!
//! The supervisor never touches bundles, OCI invocations, or checkpoint
//! drivers itself — it drives them through three trait objects:
//!
//! - **[`Runtime`]** — creates containers from bundles and loads them back
//!   from a state directory during restore.
//! - **[`Container`]** — one isolated process group: enumerate processes,
//!   signal, pause/resume, exec, stats, checkpoints, delete.
//! - **[`Process`]** — one process inside a container: identity and a
//!   non-destructive exit-status read.
//!
//! ## Rules
//! - Handles are shared as `Arc<dyn ...>`; the supervisor owns exactly one
//!   container handle per live id.
//! - `Process::exit_status` must be non-destructive: restore and the exit
//!   handler both read it, and duplicate exit delivery re-reads it.
//! - Implementations report failures with [`SupervisorError`]; the variants
//!   mirror the conditions a backend can hit (checkpoint collisions,
//!   missing processes, unsupported terminals).

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SupervisorError;

mod types;

pub use types::{
    Checkpoint, ContainerSummary, ProcessSpec, ProcessUpdate, Stat, State, INIT_PROCESS_ID,
};

/// Shared handle to a runtime container.
pub type ContainerRef = Arc<dyn Container>;

/// Shared handle to a process inside a container.
pub type ProcessRef = Arc<dyn Process>;

/// Factory for containers: create new ones, load existing ones.
#[async_trait]
pub trait Runtime: Send + Sync + 'static {
    /// Creates a container from a bundle directory, rooted under
    /// `state_dir/<id>`. The container's init process exists (but is the
    /// backend's business to start) when this returns.
    async fn create(
        &self,
        id: &str,
        bundle: &Path,
        state_dir: &Path,
    ) -> Result<ContainerRef, SupervisorError>;

    /// Loads a container back from `state_dir/<id>`. Called only during
    /// restore; failure is fatal to supervisor construction.
    async fn load(&self, state_dir: &Path, id: &str) -> Result<ContainerRef, SupervisorError>;
}

/// One container: an isolated OS process group with a bundle on disk.
#[async_trait]
pub trait Container: Send + Sync + 'static {
    /// Container id, unique within the host.
    fn id(&self) -> &str;

    /// Current run state.
    fn state(&self) -> State;

    /// Every process currently part of the container, init included.
    async fn processes(&self) -> Result<Vec<ProcessRef>, SupervisorError>;

    /// Collects one stats sample. May be slow; the supervisor calls this
    /// off the event loop.
    async fn stats(&self) -> Result<Stat, SupervisorError>;

    /// Delivers `signal` to the process with id `process_id`.
    async fn signal(&self, process_id: &str, signal: i32) -> Result<(), SupervisorError>;

    /// Starts an additional process inside the container.
    async fn exec(&self, spec: ProcessSpec) -> Result<ProcessRef, SupervisorError>;

    /// Freezes all processes.
    async fn pause(&self) -> Result<(), SupervisorError>;

    /// Thaws all processes.
    async fn resume(&self) -> Result<(), SupervisorError>;

    /// Applies a tty/stdin update to one process.
    async fn update_process(
        &self,
        process_id: &str,
        update: ProcessUpdate,
    ) -> Result<(), SupervisorError>;

    /// Takes a checkpoint. Fails with `CheckpointExists` on a name
    /// collision.
    async fn checkpoint(&self, checkpoint: Checkpoint) -> Result<(), SupervisorError>;

    /// Removes a checkpoint by name. Fails with `CheckpointNotExists` if
    /// absent.
    async fn delete_checkpoint(&self, name: &str) -> Result<(), SupervisorError>;

    /// Releases every OS resource the container holds. After this returns
    /// the id may be reused.
    async fn delete(&self) -> Result<(), SupervisorError>;
}

/// One process inside a container.
#[async_trait]
pub trait Process: Send + Sync + 'static {
    /// Process id inside its container (`"init"` for the init process).
    fn id(&self) -> &str;

    /// Id of the container the process belongs to. Exit routing uses this
    /// to find the table entry.
    fn container_id(&self) -> &str;

    /// Reads the recorded exit status without consuming it. Returns
    /// `ProcessNotExited` while the process is alive.
    async fn exit_status(&self) -> Result<i32, SupervisorError>;
}

/// True if this is the container's init process.
pub(crate) fn is_init(process: &ProcessRef) -> bool {
    process.id() == INIT_PROCESS_ID
}

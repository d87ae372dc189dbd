//! Delete handler: `exited → absent`.

use tracing::error;

use crate::core::handlers::HandlerResult;
use crate::core::supervisor::Supervisor;
use crate::error::SupervisorError;
use crate::events::{Event, EventKind};

impl Supervisor {
    /// Removes the table entry, releases the runtime container, and emits
    /// a container-level `exit` marker (no pid, no status).
    ///
    /// A runtime release failure is logged, not surfaced: the entry is
    /// gone either way and the id is free for reuse. An unknown id fails
    /// with `ContainerNotFound` and emits nothing.
    pub(crate) async fn delete_container(&mut self, id: &str) -> HandlerResult {
        let entry = self
            .containers
            .remove(id)
            .ok_or(SupervisorError::ContainerNotFound { id: id.into() })?;

        if let Err(e) = entry.container.delete().await {
            error!(id, error = %e, "delete container");
        }
        self.metrics.containers.decr();

        self.notify(Event::new(EventKind::Exit, id)).await;
        Ok(None)
    }
}

//! Checkpoint handlers: create and delete checkpoints on a live container.

use crate::core::handlers::HandlerResult;
use crate::core::supervisor::Supervisor;
use crate::events::{Event, EventKind};
use crate::runtime::Checkpoint;

impl Supervisor {
    /// Takes a checkpoint and emits a `checkpoint` event. Name collisions
    /// surface as `CheckpointExists` from the runtime.
    pub(crate) async fn create_checkpoint(
        &mut self,
        id: &str,
        checkpoint: Checkpoint,
    ) -> HandlerResult {
        let container = self.live_container(id)?;
        container.checkpoint(checkpoint).await?;

        self.notify(Event::new(EventKind::Checkpoint, id)).await;
        Ok(None)
    }

    /// Removes a checkpoint by name. No event.
    pub(crate) async fn delete_checkpoint(&mut self, id: &str, name: &str) -> HandlerResult {
        let container = self.live_container(id)?;
        container.delete_checkpoint(name).await?;
        Ok(None)
    }
}

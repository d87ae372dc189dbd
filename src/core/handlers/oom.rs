//! OOM handler: observability only.

use crate::core::handlers::HandlerResult;
use crate::core::supervisor::Supervisor;
use crate::events::{Event, EventKind};

impl Supervisor {
    /// `* → *`: emits an `oom` event for the container. No table lookup —
    /// the notifier may race a delete, and the kill already happened.
    pub(crate) async fn oom(&mut self, id: &str) -> HandlerResult {
        self.notify(Event::new(EventKind::Oom, id)).await;
        Ok(None)
    }
}

//! Process handlers: exec into a running container, update a live process.

use crate::core::handlers::HandlerResult;
use crate::core::supervisor::Supervisor;
use crate::events::{Event, EventKind};
use crate::runtime::{ProcessSpec, ProcessUpdate};

impl Supervisor {
    /// `running → running`: exec an additional process, attach it to the
    /// monitor, emit `start-process`.
    pub(crate) async fn add_process(&mut self, id: &str, spec: ProcessSpec) -> HandlerResult {
        let container = self.live_container(id)?;
        let process = container.exec(spec).await?;
        self.monitor.monitor(process.clone())?;

        self.notify(Event::new(EventKind::StartProcess, id).with_pid(process.id()))
            .await;
        Ok(None)
    }

    /// Applies a tty resize / stdin close to one process. No event.
    pub(crate) async fn update_process(
        &mut self,
        id: &str,
        pid: &str,
        update: ProcessUpdate,
    ) -> HandlerResult {
        let container = self.live_container(id)?;
        container.update_process(pid, update).await?;
        Ok(None)
    }
}

//! Start handler: `absent → running`.

use std::path::Path;

use tracing::debug;

use crate::core::handlers::HandlerResult;
use crate::core::supervisor::{ContainerEntry, Supervisor};
use crate::error::SupervisorError;
use crate::events::{Event, EventKind};

impl Supervisor {
    /// Creates a runtime container from `bundle`, attaches its processes
    /// to the monitor, inserts the table entry, and emits
    /// `start-container` plus one `start-process` per process.
    ///
    /// Ids are unique per host: a duplicate fails with `ContainerExists`
    /// before the runtime is touched.
    pub(crate) async fn start_container(&mut self, id: &str, bundle: &Path) -> HandlerResult {
        if self.containers.contains_key(id) {
            return Err(SupervisorError::ContainerExists { id: id.into() });
        }

        let container = self
            .runtime
            .create(id, bundle, &self.cfg.state_dir)
            .await?;
        let processes = container.processes().await?;
        for process in &processes {
            self.monitor.monitor(process.clone())?;
        }

        self.containers
            .insert(id.to_string(), ContainerEntry::running(container));
        self.metrics.containers.incr();
        debug!(id, bundle = %bundle.display(), "container started");

        self.notify(Event::new(EventKind::StartContainer, id)).await;
        for process in &processes {
            self.notify(Event::new(EventKind::StartProcess, id).with_pid(process.id()))
                .await;
        }
        Ok(None)
    }
}

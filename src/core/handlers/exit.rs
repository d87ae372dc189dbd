//! Exit handlers: init exits retire the container, exec exits do not.
//!
//! Exit tasks come from the monitor bridge and from restore, at least
//! once per process. Duplicates re-read the recorded status and re-emit
//! an identical event; the journal is append-only so nothing corrupts.

use crate::core::handlers::HandlerResult;
use crate::core::supervisor::{EntryStatus, Supervisor};
use crate::error::SupervisorError;
use crate::events::{Event, EventKind};
use crate::runtime::{is_init, ProcessRef};

impl Supervisor {
    /// `running → exited` for init; routes every other process to the
    /// exec-exit path.
    pub(crate) async fn process_exited(&mut self, process: ProcessRef) -> HandlerResult {
        if !is_init(&process) {
            // Same transition the kernel reports for any non-init death;
            // the loop is serial so inlining keeps journal order intact.
            return self.exec_exited(process).await;
        }

        let status = process.exit_status().await?;
        let id = process.container_id().to_string();
        let entry = self
            .containers
            .get_mut(&id)
            .ok_or(SupervisorError::ContainerNotFound { id: id.clone() })?;
        entry.status = EntryStatus::Exited;

        self.notify(
            Event::new(EventKind::Exit, &id)
                .with_pid(process.id())
                .with_status(status),
        )
        .await;
        Ok(None)
    }

    /// `running → running`: a non-init process exited.
    pub(crate) async fn exec_exited(&mut self, process: ProcessRef) -> HandlerResult {
        let status = process.exit_status().await?;
        let id = process.container_id().to_string();
        if !self.containers.contains_key(&id) {
            return Err(SupervisorError::ContainerNotFound { id });
        }

        self.notify(
            Event::new(EventKind::Exit, &id)
                .with_pid(process.id())
                .with_status(status),
        )
        .await;
        Ok(None)
    }
}

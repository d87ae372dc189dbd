//! # Restore: rebuild supervisor state from the state directory.
//!
//! Runs once, inside `Supervisor::new`, before the loop starts. Each
//! subdirectory of the state dir is a container to rehydrate:
//!
//! 1. `Runtime::load` the container — failure is fatal, the operator must
//!    intervene.
//! 2. Enumerate its processes and read each exit status non-destructively.
//!    Live processes re-attach to the monitor; dead ones are collected.
//! 3. Insert the table entry.
//! 4. Sort the dead processes init-last and enqueue one Exit task per
//!    process.
//!
//! Init-last matches the kernel's convention that init's exit is reaped
//! after every other process in the group. The sort is stable: non-init
//! processes keep their enumeration order.

use tracing::debug;

use crate::core::supervisor::{ContainerEntry, Supervisor};
use crate::error::SupervisorError;
use crate::runtime::{is_init, ProcessRef};
use crate::tasks::{Task, TaskKind};

impl Supervisor {
    pub(crate) async fn restore(&mut self) -> Result<(), SupervisorError> {
        let mut entries = tokio::fs::read_dir(&self.cfg.state_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let id = entry.file_name().to_string_lossy().into_owned();
            let container = self.runtime.load(&self.cfg.state_dir, &id).await?;
            let processes = container.processes().await?;

            self.metrics.containers.incr();
            self.containers
                .insert(id.clone(), ContainerEntry::running(container));
            debug!(id = %id, "container restored");

            let mut exited = Vec::new();
            for process in processes {
                match process.exit_status().await {
                    Ok(_) => exited.push(process),
                    Err(_) => self.monitor.monitor(process)?,
                }
            }

            sort_init_last(&mut exited);
            for process in exited {
                let id = process.container_id().to_string();
                let (task, _handle) = Task::new(id, TaskKind::Exit { process });
                self.enqueue_restored(task).await?;
            }
        }
        Ok(())
    }

    async fn enqueue_restored(&self, task: Task) -> Result<(), SupervisorError> {
        // The loop is not running yet; the queue must absorb every
        // restored exit until start().
        self.handle().submit(task).await
    }
}

/// Stable init-last order: non-init processes keep their enumeration
/// order, init sorts after all of them.
pub(crate) fn sort_init_last(processes: &mut [ProcessRef]) {
    processes.sort_by_key(is_init);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    struct NamedProcess(&'static str);

    #[async_trait]
    impl crate::runtime::Process for NamedProcess {
        fn id(&self) -> &str {
            self.0
        }

        fn container_id(&self) -> &str {
            "c1"
        }

        async fn exit_status(&self) -> Result<i32, SupervisorError> {
            Ok(0)
        }
    }

    fn procs(ids: &[&'static str]) -> Vec<ProcessRef> {
        ids.iter()
            .map(|id| Arc::new(NamedProcess(id)) as ProcessRef)
            .collect()
    }

    #[test]
    fn init_sorts_last() {
        let mut ps = procs(&["init", "x1", "x2"]);
        sort_init_last(&mut ps);
        let order: Vec<_> = ps.iter().map(|p| p.id().to_owned()).collect();
        assert_eq!(order, ["x1", "x2", "init"]);
    }

    #[test]
    fn non_init_order_is_stable() {
        let mut ps = procs(&["b", "init", "a", "c"]);
        sort_init_last(&mut ps);
        let order: Vec<_> = ps.iter().map(|p| p.id().to_owned()).collect();
        assert_eq!(order, ["b", "a", "c", "init"]);
    }

    #[test]
    fn no_init_keeps_order() {
        let mut ps = procs(&["x2", "x1"]);
        sort_init_last(&mut ps);
        let order: Vec<_> = ps.iter().map(|p| p.id().to_owned()).collect();
        assert_eq!(order, ["x2", "x1"]);
    }
}

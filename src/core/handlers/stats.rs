//! Stats handler: the one deferred operation.
//!
//! Stats collection reads kernel state and can be slow; it must not stall
//! the loop. The handler resolves the container under the loop, then
//! moves the task's completion channels into a worker. The worker writes
//! the error slot, then the stat, and records the latency timer.

use std::sync::Arc;
use std::time::Instant;

use crate::core::supervisor::Supervisor;
use crate::error::SupervisorError;
use crate::tasks::{Completion, Dispatch, Reply};

impl Supervisor {
    /// Resolves the container, spawns the collection worker, and returns
    /// `Pending`. Lookup failures complete synchronously.
    pub(crate) fn container_stats(
        &mut self,
        id: &str,
        completion: &mut Option<Completion>,
    ) -> Dispatch {
        let start = Instant::now();
        let Some(entry) = self.containers.get(id) else {
            return Dispatch::Done(Err(SupervisorError::ContainerNotFound { id: id.into() }));
        };
        let container = entry.container.clone();
        let Some(completion) = completion.take() else {
            return Dispatch::Done(Ok(None));
        };
        let metrics = Arc::clone(&self.metrics);

        tokio::spawn(async move {
            match container.stats().await {
                Err(e) => completion.finish(Err(e)),
                Ok(stat) => {
                    completion.finish(Ok(Some(Reply::Stat(stat))));
                    metrics.stats_latency.record(start.elapsed());
                }
            }
        });
        Dispatch::Pending
    }
}

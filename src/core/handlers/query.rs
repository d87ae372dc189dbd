//! GetContainers handler: snapshot of the table for external callers.

use crate::core::handlers::HandlerResult;
use crate::core::supervisor::Supervisor;
use crate::runtime::ContainerSummary;
use crate::tasks::Reply;

impl Supervisor {
    /// Replies with one summary per table entry, sorted by id. Handles
    /// never leave the loop; callers get ids and states.
    pub(crate) fn get_containers(&self) -> HandlerResult {
        let mut summaries: Vec<ContainerSummary> = self
            .containers
            .values()
            .map(|entry| ContainerSummary {
                id: entry.container.id().to_string(),
                state: entry.container.state(),
            })
            .collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(Some(Reply::Containers(summaries)))
    }
}

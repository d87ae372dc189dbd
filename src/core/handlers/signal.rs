//! Signal handler: deliver a signal to one process in a live container.

use crate::core::handlers::HandlerResult;
use crate::core::supervisor::Supervisor;

impl Supervisor {
    /// `running → running`: idempotent side-effect on the runtime, no
    /// table change.
    pub(crate) async fn signal_process(
        &mut self,
        id: &str,
        pid: &str,
        signal: i32,
    ) -> HandlerResult {
        let container = self.live_container(id)?;
        container.signal(pid, signal).await?;
        Ok(None)
    }
}

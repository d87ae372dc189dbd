//! Container update handler: pause and resume.

use crate::core::handlers::HandlerResult;
use crate::core::supervisor::Supervisor;
use crate::runtime::State;

impl Supervisor {
    /// `running → running`: freeze or thaw the container's process group.
    /// The table does not track paused-ness; the runtime owns that state.
    pub(crate) async fn update_container(&mut self, id: &str, state: State) -> HandlerResult {
        let container = self.live_container(id)?;
        match state {
            State::Paused => container.pause().await?,
            State::Running => container.resume().await?,
        }
        Ok(None)
    }
}

//! Value types shared across the runtime seam.
//!
//! These are the records a runtime implementation and the supervisor
//! exchange: container state, stats samples, checkpoint descriptors, and
//! the specs for exec'd processes. All of them serialize with `serde`
//! because runtime backends persist them next to the bundle.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Process id of a container's init process. Its exit is the container's
/// exit, and the kernel reaps it after every other process in the group.
pub const INIT_PROCESS_ID: &str = "init";

/// Run state of a container as reported by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// Processes are scheduled normally.
    Running,
    /// All processes are frozen.
    Paused,
}

/// One statistics sample collected from a live container.
///
/// The payload is opaque to the supervisor; runtime backends report
/// whatever their cgroup/driver layer produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    /// When the sample was collected.
    pub timestamp: DateTime<Utc>,
    /// Raw backend-defined stats.
    pub data: serde_json::Value,
}

/// Checkpoint descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// When the checkpoint was taken.
    pub created: DateTime<Utc>,
    /// Checkpoint name, unique per container.
    pub name: String,
    /// Checkpoint open tcp connections.
    pub tcp: bool,
    /// Persist unix sockets in the checkpoint.
    #[serde(rename = "unixSockets")]
    pub unix_sockets: bool,
    /// Persist tty sessions in the checkpoint.
    pub shell: bool,
    /// Exit the container after the checkpoint finishes.
    pub exit: bool,
}

impl Checkpoint {
    /// Creates a checkpoint descriptor with all persistence flags off.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            created: Utc::now(),
            name: name.into(),
            tcp: false,
            unix_sockets: false,
            shell: false,
            exit: false,
        }
    }
}

/// Spec for a process exec'd into an existing container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    /// Argument vector; `args[0]` is the executable.
    pub args: Vec<String>,
    /// Environment in `KEY=value` form.
    pub env: Vec<String>,
    /// Working directory inside the container.
    pub cwd: Option<PathBuf>,
    /// Allocate a terminal for the process.
    pub terminal: bool,
}

/// Mutation applied to a live process: tty geometry and stdin lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessUpdate {
    /// New terminal width, if resizing.
    pub width: Option<u32>,
    /// New terminal height, if resizing.
    pub height: Option<u32>,
    /// Close the process's stdin.
    pub close_stdin: bool,
}

/// Loop-external view of one container table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSummary {
    /// Container id.
    pub id: String,
    /// Run state at the time of the query.
    pub state: State,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_json_field_names() {
        let cp = Checkpoint::named("pre-upgrade");
        let json = serde_json::to_value(&cp).unwrap();
        assert!(json.get("unixSockets").is_some());
        assert!(json.get("created").is_some());
        assert_eq!(json["name"], "pre-upgrade");
    }

    #[test]
    fn state_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&State::Paused).unwrap(), "\"paused\"");
    }
}

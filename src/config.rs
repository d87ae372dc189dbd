//! # Global supervisor configuration.
//!
//! [`Config`] defines the supervisor's behavior: where container state and
//! the event journal live, how deep the task intake queue is, and how much
//! buffering each event subscriber gets. `Config::default()` targets
//! `/run/boxvisor`; [`Config::new`] roots the supervisor elsewhere.
//!
//! # Example
//! ```
//! use boxvisor::Config;
//!
//! let mut cfg = Config::new("/var/lib/boxvisor");
//! cfg.task_queue_capacity = 512;
//!
//! assert_eq!(cfg.subscriber_capacity, 2048);
//! assert_eq!(Config::default().state_dir.to_str(), Some("/run/boxvisor"));
//! ```

use std::path::PathBuf;

/// Capacity of the task intake queue and of each subscriber channel.
pub const DEFAULT_BUFFER_SIZE: usize = 2048;

/// Global configuration for the supervisor.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding one subdirectory per container plus `events.log`.
    /// Created if absent; enumerated during restore.
    pub state_dir: PathBuf,
    /// Capacity of the task intake queue. Producers block when it is full;
    /// this is the backpressure signal.
    pub task_queue_capacity: usize,
    /// Capacity of each subscriber's event channel. A full subscriber
    /// drops events (for that subscriber only).
    pub subscriber_capacity: usize,
}

impl Config {
    /// Creates a configuration rooted at `state_dir` with default capacities:
    /// - `task_queue_capacity = 2048`
    /// - `subscriber_capacity = 2048`
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
            task_queue_capacity: DEFAULT_BUFFER_SIZE,
            subscriber_capacity: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl Default for Config {
    /// Provides a default configuration:
    /// - `state_dir = "/run/boxvisor"`
    /// - `task_queue_capacity = 2048`
    /// - `subscriber_capacity = 2048`
    fn default() -> Self {
        Self::new("/run/boxvisor")
    }
}

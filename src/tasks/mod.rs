//! Tasks and their completion plumbing.
//!
//! Everything that mutates supervisor state travels as a [`Task`] through
//! the single intake queue; [`TaskHandle`] is how submitters observe the
//! outcome. See [`task`] for the full contract.

mod task;

pub use task::{Reply, Task, TaskHandle, TaskKind};

pub(crate) use task::{Completion, Dispatch};

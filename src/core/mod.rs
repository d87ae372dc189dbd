//! Supervisor core: event loop, restore, and handlers.
//!
//! ## Files & responsibilities
//! - **supervisor.rs**: [`Supervisor`] (loop-owned container table, intake
//!   queue, notify path, monitor/OOM bridges) and the clonable
//!   [`SupervisorHandle`] (submit, events, unsubscribe, stop).
//! - **restore.rs**: state-directory rehydration, run before the loop
//!   starts; synthesizes init-last Exit tasks for processes that died
//!   while the supervisor was down.
//! - **handlers/**: one file per task family; see `handlers/mod.rs` for
//!   the lifecycle diagram.
//!
//! ## Wiring (module-level flow)
//! ```text
//! External callers ─ handle.submit(Task) ──┐
//! Monitor bridge ── Exit tasks ────────────┤
//! OOM bridge ────── Oom tasks ─────────────┼──► intake (bounded mpsc, 2048)
//! Restore ───────── Exit tasks ────────────┘         │
//!                                                    ▼
//!                                        Supervisor::run()  (sole mutator)
//!                                                    │ dispatch by TaskKind
//!                                                    ▼
//!                                    handler → container table + notify()
//!                                                    │
//!                         ┌──────────────────────────┴──────────┐
//!                         ▼                                     ▼
//!                journal (memory + events.log writer)   SubscriberSet
//!                                                        (try_send per sub,
//!                                                         drop-on-full)
//! ```
//!
//! Stats is the one deferred handler: it spawns a worker that owns the
//! task's completion channels, and the loop moves on.

mod handlers;
mod restore;
mod supervisor;

pub use supervisor::{Supervisor, SupervisorHandle};

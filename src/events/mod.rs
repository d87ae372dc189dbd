//! Observable events: data model, durable journal, and subscriber fan-out.
//!
//! ## Contents
//! - [`Event`], [`EventKind`] — the record handlers emit and the journal
//!   stores, with the exact on-disk field names.
//! - [`Journal`] — in-memory replay log plus the `events.log` writer task.
//! - [`SubscriberSet`], [`Subscription`] — bounded per-subscriber channels
//!   with non-blocking, drop-on-full fan-out.
//!
//! ## Emit path
//! The supervisor's `notify` appends to the journal first and fans out
//! second; a subscriber can therefore never observe an event the journal
//! does not hold (write-deferral on the file aside — disk persistence is
//! asynchronous and best-effort).

mod event;
pub(crate) mod journal;
mod subscribers;

pub use event::{Event, EventKind};
pub use journal::{Journal, EVENTS_LOG};
pub use subscribers::{SubscriberSet, Subscription};

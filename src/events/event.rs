//! # Observable events emitted by the supervisor.
//!
//! An [`Event`] is the externally visible record of something that has
//! already happened: a container started, a process exited, an OOM kill
//! fired. Events are journalled before they are fanned out, so the journal
//! is the ground truth and subscriber streams are views onto it.
//!
//! ## Wire format
//! One JSON object per journal line, exact field names:
//! ```text
//! {"id": "...", "type": "exit", "timestamp": "...", "pid": "init", "status": 0}
//! ```
//! `pid` and `status` are omitted when absent. `timestamp` is RFC3339 with
//! nanosecond precision; timestamps are monotonic within one supervisor
//! run but not across runs.
//!
//! ## Example
//! ```
//! use boxvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::Exit, "c1").with_pid("init").with_status(0);
//! assert_eq!(ev.kind, EventKind::Exit);
//! assert_eq!(ev.pid.as_deref(), Some("init"));
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of supervisor events.
///
/// The set is open on the consumer side: runtime backends may define their
/// own types, which decode as [`EventKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    /// A container entered the table.
    StartContainer,
    /// A process (init or exec) started inside a container.
    StartProcess,
    /// A process exited, or — with no pid — a container left the table.
    Exit,
    /// A container hit its memory limit.
    Oom,
    /// A checkpoint was taken.
    Checkpoint,
    /// Runtime-defined event type.
    Other(String),
}

impl EventKind {
    /// The wire string for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::StartContainer => "start-container",
            EventKind::StartProcess => "start-process",
            EventKind::Exit => "exit",
            EventKind::Oom => "oom",
            EventKind::Checkpoint => "checkpoint",
            EventKind::Other(s) => s,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for EventKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "start-container" => EventKind::StartContainer,
            "start-process" => EventKind::StartProcess,
            "exit" => EventKind::Exit,
            "oom" => EventKind::Oom,
            "checkpoint" => EventKind::Checkpoint,
            _ => EventKind::Other(s),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_str().to_owned()
    }
}

/// One journalled, fan-out-able event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Container id the event concerns.
    pub id: String,
    /// Event classification.
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Emission time; RFC3339 with nanoseconds on the wire.
    pub timestamp: DateTime<Utc>,
    /// Process id inside the container, where relevant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
    /// Exit status, where relevant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
}

impl Event {
    /// Creates an event stamped with the current time.
    pub fn new(kind: EventKind, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            timestamp: Utc::now(),
            pid: None,
            status: None,
        }
    }

    /// Attaches a process id.
    pub fn with_pid(mut self, pid: impl Into<String>) -> Self {
        self.pid = Some(pid.into());
        self
    }

    /// Attaches an exit status.
    pub fn with_status(mut self, status: i32) -> Self {
        self.status = Some(status);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_field_names() {
        let ev = Event::new(EventKind::Exit, "c1").with_pid("init").with_status(137);
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["id"], "c1");
        assert_eq!(json["type"], "exit");
        assert_eq!(json["pid"], "init");
        assert_eq!(json["status"], 137);
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn optional_fields_omitted() {
        let ev = Event::new(EventKind::StartContainer, "c1");
        let json = serde_json::to_value(&ev).unwrap();
        assert!(json.get("pid").is_none());
        assert!(json.get("status").is_none());
    }

    #[test]
    fn kind_round_trips_and_stays_open() {
        let known: EventKind = String::from("start-process").into();
        assert_eq!(known, EventKind::StartProcess);

        let custom: EventKind = String::from("live-migrate").into();
        assert_eq!(custom, EventKind::Other("live-migrate".into()));
        assert_eq!(custom.as_str(), "live-migrate");
    }

    #[test]
    fn decode_tolerates_missing_optionals() {
        let line = r#"{"id":"c1","type":"exit","timestamp":"2026-08-02T10:00:00.000000001Z"}"#;
        let ev: Event = serde_json::from_str(line).unwrap();
        assert_eq!(ev.kind, EventKind::Exit);
        assert_eq!(ev.pid, None);
        assert_eq!(ev.status, None);
    }
}

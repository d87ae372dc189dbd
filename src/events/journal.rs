//! # Event journal: in-memory replay log + append-only file.
//!
//! Every emitted event lands in two places: a `Vec` kept for subscriber
//! replay, and `events.log` in the state directory (one JSON record per
//! line). The file is written by a dedicated writer task so disk latency
//! never reaches the event loop.
//!
//! ## Rules
//! - Journal order equals emission order; the log is append-only.
//! - Persistence is best-effort: a failed file write is logged and the
//!   originating task still succeeds. Refusing to run containers because
//!   the journal disk is full would be the worse trade.
//! - At open, an existing `events.log` is read back so replay covers
//!   prior runs. A corrupt line is fatal — the operator must intervene.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, error};

use crate::error::SupervisorError;
use crate::events::Event;

/// Journal file name inside the state directory.
pub const EVENTS_LOG: &str = "events.log";

enum WriterMsg {
    Record(Event),
    Sync(oneshot::Sender<()>),
}

/// Append-only event journal.
#[derive(Debug)]
pub struct Journal {
    log: RwLock<Vec<Event>>,
    // Unbounded: persistence is never dropped, and the writer task is the
    // only thing a slow disk may stall.
    tx: mpsc::UnboundedSender<WriterMsg>,
    path: PathBuf,
}

impl Journal {
    /// Opens (creating if needed) the journal at `path`, reads back any
    /// prior events, and spawns the writer task.
    pub async fn open(path: PathBuf) -> Result<Self, SupervisorError> {
        let log = read_log(&path).await?;
        debug!(count = log.len(), "read past events");

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(file, rx));

        Ok(Self {
            log: RwLock::new(log),
            tx,
            path,
        })
    }

    /// Appends one event: to the replay log synchronously, to the file via
    /// the writer task.
    pub async fn append(&self, event: &Event) {
        self.log.write().await.push(event.clone());
        // Fails only if the writer died; the replay log stays authoritative.
        let _ = self.tx.send(WriterMsg::Record(event.clone()));
    }

    /// Every journalled event with timestamp strictly after `from`; the
    /// whole journal when `from` is `None`.
    pub async fn events_after(&self, from: Option<DateTime<Utc>>) -> Vec<Event> {
        let log = self.log.read().await;
        match from {
            None => log.clone(),
            Some(from) => log.iter().filter(|e| e.timestamp > from).cloned().collect(),
        }
    }

    /// Number of journalled events.
    pub async fn len(&self) -> usize {
        self.log.read().await.len()
    }

    /// True when nothing has been journalled.
    pub async fn is_empty(&self) -> bool {
        self.log.read().await.is_empty()
    }

    /// Waits until every append queued so far has reached the file and the
    /// file has been flushed.
    pub async fn sync(&self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(WriterMsg::Sync(ack)).is_ok() {
            let _ = done.await;
        }
    }

    /// Path of the journal file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn read_log(path: &Path) -> Result<Vec<Event>, SupervisorError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut log = Vec::new();
    for line in contents.lines() {
        if line.is_empty() {
            continue;
        }
        let event: Event = serde_json::from_str(line)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        log.push(event);
    }
    Ok(log)
}

async fn write_loop(mut file: tokio::fs::File, mut rx: mpsc::UnboundedReceiver<WriterMsg>) {
    while let Some(msg) = rx.recv().await {
        match msg {
            WriterMsg::Record(event) => {
                let mut line = match serde_json::to_vec(&event) {
                    Ok(line) => line,
                    Err(e) => {
                        error!(error = %e, "encode event for journal");
                        continue;
                    }
                };
                line.push(b'\n');
                if let Err(e) = file.write_all(&line).await {
                    error!(error = %e, "write event to journal");
                }
            }
            WriterMsg::Sync(ack) => {
                if let Err(e) = file.flush().await {
                    error!(error = %e, "flush journal");
                }
                let _ = ack.send(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn append_then_replay() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::open(dir.path().join(EVENTS_LOG)).await.unwrap();

        journal.append(&Event::new(EventKind::StartContainer, "c1")).await;
        journal.append(&Event::new(EventKind::Exit, "c1").with_pid("init")).await;

        assert_eq!(journal.len().await, 2);
        let all = journal.events_after(None).await;
        assert_eq!(all[0].kind, EventKind::StartContainer);
        assert_eq!(all[1].kind, EventKind::Exit);
    }

    #[tokio::test]
    async fn events_after_filters_strictly() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::open(dir.path().join(EVENTS_LOG)).await.unwrap();

        let first = Event::new(EventKind::Oom, "c1");
        journal.append(&first).await;
        let second = Event::new(EventKind::Oom, "c2");
        journal.append(&second).await;

        let tail = journal.events_after(Some(first.timestamp)).await;
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].id, "c2");
    }

    #[tokio::test]
    async fn reopen_reads_past_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EVENTS_LOG);

        {
            let journal = Journal::open(path.clone()).await.unwrap();
            journal.append(&Event::new(EventKind::StartContainer, "c1")).await;
            journal.append(&Event::new(EventKind::StartProcess, "c1").with_pid("init")).await;
            journal.sync().await;
        }

        let reopened = Journal::open(path).await.unwrap();
        assert_eq!(reopened.len().await, 2);
        let all = reopened.events_after(None).await;
        assert_eq!(all[1].pid.as_deref(), Some("init"));
    }

    #[tokio::test]
    async fn corrupt_line_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EVENTS_LOG);
        tokio::fs::write(&path, b"{not json}\n").await.unwrap();

        let err = Journal::open(path).await.unwrap_err();
        assert_eq!(err.as_label(), "io");
    }
}

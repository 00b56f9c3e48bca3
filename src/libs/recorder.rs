//! Fire-and-forget persistence of monitoring events.
//!
//! [`Recorder`] is a [`Subscriber`] that never touches the network on the
//! caller's thread. It only queues an [`EventRecord`] on a channel; a
//! background task drains the queue in order and posts each record. Failures
//! are logged and discarded, nothing is retried and nothing flows back into
//! the tracker.
//!
//! Where a record goes depends on the [`Destination`]. A study session id
//! posts to `session-monitoring/`, a monitoring session opened with
//! [`MonitoringApi::start_session`] posts to `monitoring/{id}/track_event/`.

use super::emitter::Subscriber;
use super::event::MonitorEvent;
use crate::api::{ApiError, EventRecord, MonitoringApi};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Server-side session the recorded events belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Caller supplied study session id.
    StudySession(String),
    /// Id returned by `start_session`. Ended when the recorder closes.
    MonitoringSession(String),
}

impl Destination {
    pub fn id(&self) -> &str {
        match self {
            Destination::StudySession(id) | Destination::MonitoringSession(id) => id,
        }
    }

    async fn deliver(&self, api: &MonitoringApi, record: &EventRecord) -> Result<reqwest::StatusCode, ApiError> {
        match self {
            Destination::StudySession(_) => api.record_event(record).await,
            Destination::MonitoringSession(id) => api.track_event(id, &record.event_type, &record.event_data).await,
        }
    }
}

impl From<String> for Destination {
    fn from(id: String) -> Self {
        Destination::StudySession(id)
    }
}

impl From<&str> for Destination {
    fn from(id: &str) -> Self {
        Destination::StudySession(id.to_string())
    }
}

/// Outcome counters of a recorder run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecorderSummary {
    pub sent: usize,
    pub failed: usize,
}

/// Subscriber side of the recorder.
pub struct Recorder {
    session_id: String,
    sender: mpsc::UnboundedSender<EventRecord>,
    record_heartbeats: bool,
}

/// Background side of the recorder. Resolves once every [`Recorder`] is dropped.
pub struct RecorderHandle {
    task: JoinHandle<RecorderSummary>,
    api: MonitoringApi,
    destination: Destination,
}

impl Recorder {
    /// Starts the delivery task on the current runtime.
    pub fn spawn(api: MonitoringApi, destination: impl Into<Destination>) -> (Recorder, RecorderHandle) {
        let destination = destination.into();
        let (sender, mut receiver) = mpsc::unbounded_channel::<EventRecord>();

        let task = {
            let api = api.clone();
            let destination = destination.clone();
            tokio::spawn(async move {
                let mut summary = RecorderSummary::default();
                while let Some(record) = receiver.recv().await {
                    match destination.deliver(&api, &record).await {
                        Ok(status) => {
                            debug!(event_type = %record.event_type, %status, "event recorded");
                            summary.sent += 1;
                        }
                        Err(e) => {
                            debug!(event_type = %record.event_type, error = %e, "event not recorded");
                            summary.failed += 1;
                        }
                    }
                }
                summary
            })
        };

        let recorder = Recorder {
            session_id: destination.id().to_string(),
            sender,
            record_heartbeats: false,
        };
        (recorder, RecorderHandle { task, api, destination })
    }

    /// Also persist `time_update` heartbeats. Off by default.
    pub fn with_heartbeats(mut self, enabled: bool) -> Self {
        self.record_heartbeats = enabled;
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl Subscriber for Recorder {
    fn on_event(&mut self, event: &MonitorEvent) {
        if !event.kind.is_violation() && !self.record_heartbeats {
            return;
        }
        // The task is gone only if the runtime shut down; nothing to do then
        let _ = self.sender.send(EventRecord::from_event(&self.session_id, event));
    }
}

impl RecorderHandle {
    /// Waits for the queue to drain.
    pub async fn finish(self) -> RecorderSummary {
        self.task.await.unwrap_or_default()
    }

    /// Waits for the queue to drain, then ends the monitoring session if
    /// there is one. No event is posted after `end_session`.
    pub async fn close(self) -> (RecorderSummary, Result<(), ApiError>) {
        let summary = self.task.await.unwrap_or_default();
        let ended = match &self.destination {
            Destination::MonitoringSession(id) => self.api.end_session(id).await,
            Destination::StudySession(_) => Ok(()),
        };
        (summary, ended)
    }
}

//! Event delivery.
//!
//! There are two disjoint paths and they share no state:
//!
//! - [`Emitter`] forwards classified [`MonitorEvent`]s to the single registered
//!   [`Subscriber`]. It is crate-private; only the tracker's observer and
//!   accumulator can reach it.
//! - [`EventLog`] records [`CustomEvent`]s from anywhere in the application.
//!   It holds no reference to the subscriber, so calling it from inside a
//!   subscriber cannot feed back into the emitter.

use super::event::{CustomEvent, CustomEventKind, MonitorEvent};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

/// Receiver of classified monitoring events.
///
/// Implementations update UI state or hand the event to a recorder. They must
/// not block; anything slow belongs on a channel drained elsewhere.
pub trait Subscriber: Send {
    fn on_event(&mut self, event: &MonitorEvent);
}

impl<F> Subscriber for F
where
    F: FnMut(&MonitorEvent) + Send,
{
    fn on_event(&mut self, event: &MonitorEvent) {
        self(event)
    }
}

/// Dispatch point for classified events.
#[derive(Default)]
pub(crate) struct Emitter {
    subscriber: Option<Box<dyn Subscriber>>,
}

impl Emitter {
    pub(crate) fn register(&mut self, subscriber: Box<dyn Subscriber>) {
        self.subscriber = Some(subscriber);
    }

    /// Drops the subscriber. Nothing is delivered until the next `register`.
    pub(crate) fn clear(&mut self) {
        self.subscriber = None;
    }

    #[cfg(test)]
    pub(crate) fn is_registered(&self) -> bool {
        self.subscriber.is_some()
    }

    /// Delivers `event` to the subscriber at most once.
    ///
    /// A panicking subscriber is logged and otherwise ignored.
    pub(crate) fn emit(&mut self, event: MonitorEvent) {
        let Some(subscriber) = self.subscriber.as_mut() else {
            return;
        };
        debug!(event_type = event.kind.name(), "emit");
        if catch_unwind(AssertUnwindSafe(|| subscriber.on_event(&event))).is_err() {
            warn!(event_type = event.kind.name(), "subscriber panicked, event dropped");
        }
    }
}

/// Default number of custom events kept in memory.
pub const EVENT_LOG_CAPACITY: usize = 256;

/// Local log of custom product events.
///
/// Cloning is cheap and every clone shares the same history.
#[derive(Clone, Debug)]
pub struct EventLog {
    entries: Arc<Mutex<VecDeque<CustomEvent>>>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(EVENT_LOG_CAPACITY)
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity.min(EVENT_LOG_CAPACITY)))),
            capacity: capacity.max(1),
        }
    }

    /// Records a custom event. Oldest entries are evicted past capacity.
    pub fn track(&self, event_type: impl Into<CustomEventKind>, data: serde_json::Value) {
        self.push(CustomEvent::new(event_type, data));
    }

    pub fn push(&self, event: CustomEvent) {
        debug!(event_type = %event.event_type, data = %event.data, "custom event");
        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(event);
    }

    pub fn entries(&self) -> Vec<CustomEvent> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::event::EventKind;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn emit_without_subscriber_is_noop() {
        let mut emitter = Emitter::default();
        emitter.emit(MonitorEvent::new(EventKind::FocusLost, Utc::now()));
        assert!(!emitter.is_registered());
    }

    #[test]
    fn emit_reaches_subscriber_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut emitter = Emitter::default();
        emitter.register(Box::new(move |_: &MonitorEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        emitter.emit(MonitorEvent::new(EventKind::FocusGained, Utc::now()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        emitter.clear();
        emitter.emit(MonitorEvent::new(EventKind::FocusGained, Utc::now()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_subscriber_is_contained() {
        let mut emitter = Emitter::default();
        emitter.register(Box::new(|_: &MonitorEvent| panic!("ui exploded")));
        emitter.emit(MonitorEvent::new(EventKind::FocusLost, Utc::now()));
        assert!(emitter.is_registered());
    }

    #[test]
    fn event_log_evicts_oldest() {
        let log = EventLog::with_capacity(2);
        log.track("chat_query", serde_json::json!({ "query": "a" }));
        log.track("break_started", serde_json::Value::Null);
        log.track("break_ended", serde_json::Value::Null);

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event_type, CustomEventKind::BreakStarted);
        assert_eq!(entries[1].event_type, CustomEventKind::BreakEnded);
    }
}

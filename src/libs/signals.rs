//! Platform signal sources.
//!
//! A [`SignalBus`] is the injected event source a tracker attaches to. Hosts
//! publish visibility, focus and input signals onto it from any thread; the
//! tracker drains it in order on its own task. Publishing is always queued,
//! never a direct call into the tracker.
//!
//! [`InputListener`] is the native producer: keyboard, mouse and wheel
//! activity captured with `rdev`. [`parse_signal_line`] decodes the JSON line
//! form used when signals are piped in by another process.

use super::observer::{InputKind, Signal};
use rdev::{listen, Event, EventType};
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Default queue depth of a signal bus.
pub const SIGNAL_BUS_CAPACITY: usize = 1024;
/// Pointer moves closer together than this are collapsed into one signal.
pub const POINTER_MOVE_THROTTLE: Duration = Duration::from_millis(250);
/// Back-off before the input listener is restarted after a failure.
pub const LISTENER_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Broadcast channel of platform signals.
#[derive(Clone, Debug)]
pub struct SignalBus {
    sender: broadcast::Sender<Signal>,
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new(SIGNAL_BUS_CAPACITY)
    }
}

impl SignalBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Queues `signal` for every attached tracker.
    ///
    /// Returns `false` when nothing is attached; the signal is then dropped.
    pub fn publish(&self, signal: Signal) -> bool {
        self.sender.send(signal).is_ok()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.sender.subscribe()
    }

    /// Number of attached receivers.
    pub fn listeners(&self) -> usize {
        self.sender.receiver_count()
    }
}

fn input_kind(event_type: &EventType) -> Option<InputKind> {
    match event_type {
        EventType::KeyPress(_) => Some(InputKind::KeyPress),
        EventType::ButtonPress(_) => Some(InputKind::Click),
        EventType::MouseMove { .. } => Some(InputKind::PointerMove),
        EventType::Wheel { .. } => Some(InputKind::Scroll),
        _ => None,
    }
}

/// Native input activity source.
pub struct InputListener;

impl InputListener {
    /// Starts listening on a dedicated thread and publishes `Signal::Input`.
    ///
    /// `rdev::listen` blocks for the lifetime of the process; when it fails
    /// (no display, missing permissions) it is retried after a short delay.
    pub fn spawn(bus: SignalBus) -> std::io::Result<std::thread::JoinHandle<()>> {
        std::thread::Builder::new().name("studyguard-input".into()).spawn(move || loop {
            let bus = bus.clone();
            let mut last_move: Option<Instant> = None;
            debug!("Listening for input events");
            let result = listen(move |event: Event| {
                let Some(kind) = input_kind(&event.event_type) else {
                    return;
                };
                if kind == InputKind::PointerMove {
                    let now = Instant::now();
                    if last_move.is_some_and(|at| now.duration_since(at) < POINTER_MOVE_THROTTLE) {
                        return;
                    }
                    last_move = Some(now);
                }
                bus.publish(Signal::Input(kind));
            });
            match result {
                Ok(()) => break,
                Err(e) => {
                    warn!("Failed to listen for input events: {:?}. Retrying in {:?}", e, LISTENER_RETRY_DELAY);
                    std::thread::sleep(LISTENER_RETRY_DELAY);
                }
            }
        })
    }
}

/// Parses one JSON line into a signal. Blank lines yield `None`.
pub fn parse_signal_line(line: &str) -> Option<Result<Signal, serde_json::Error>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(serde_json::from_str(line))
}

//! Session lifecycle controller.
//!
//! A [`Tracker`] ties the observer, the accumulator and the emitter to one
//! session id at a time:
//!
//! ```text
//!            start(id, subscriber)
//!   Stopped ───────────────────────▶ Running ──┐ signal / tick
//!      ▲                                │ ▲────┘
//!      └────────────── stop() ──────────┘
//! ```
//!
//! The tracker is an owned value, not a global, and it is not `Clone`. A
//! subscriber can never hold a handle back into it, so an event callback
//! cannot emit re-entrantly. Signals from other threads arrive
//! through an attached [`SignalBus`] and are processed in order on a pump
//! task. Elapsed time advances on a ticker task. Both tasks check the running
//! state under the same lock the controller uses, so once [`Tracker::stop`]
//! returns the subscriber is never called again.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use studyguard::libs::event::MonitorEvent;
//! use studyguard::libs::observer::Signal;
//! use studyguard::libs::tracker::Tracker;
//!
//! # async fn run() {
//! let mut tracker = Tracker::create(Default::default());
//! tracker.start("sess-1", |event: &MonitorEvent| println!("{}", event.kind));
//! tracker.handle_signal(Signal::VisibilityHidden);
//! tracker.stop();
//! println!("{:?}", tracker.stats());
//! tracker.dispose();
//! # }
//! ```

use super::accumulator::{self, AccumulatorConfig, TICK_INTERVAL};
use super::config::MonitorConfig;
use super::emitter::{Emitter, EventLog, Subscriber};
use super::event::MonitorEvent;
use super::observer::{self, Signal};
use super::session::{MonitorStats, MonitoringSession};
use super::signals::SignalBus;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Timing configuration of a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    pub tick_interval: Duration,
    pub accumulator: AccumulatorConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            tick_interval: TICK_INTERVAL,
            accumulator: AccumulatorConfig::default(),
        }
    }
}

impl From<&MonitorConfig> for TrackerConfig {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            tick_interval: Duration::from_millis(config.tick_interval_ms.max(1)),
            accumulator: AccumulatorConfig {
                recency_window: Duration::from_secs(config.recency_window_secs),
                heartbeat_every_secs: config.heartbeat_every_secs.max(1),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Stopped,
    Running,
}

struct Shared {
    session: MonitoringSession,
    emitter: Emitter,
    state: TrackerState,
    /// Bumped on every start so tasks of a previous run can tell they are stale.
    generation: u64,
}

impl Shared {
    fn is_current(&self, generation: u64) -> bool {
        self.state == TrackerState::Running && self.generation == generation
    }

    fn signal(&mut self, signal: Signal) {
        if self.state != TrackerState::Running {
            return;
        }
        let now = Utc::now();
        if let Some(kind) = observer::observe(&mut self.session, signal, now) {
            self.emitter.emit(MonitorEvent::new(kind, now));
        }
    }

    fn update_time(&mut self, config: &AccumulatorConfig) {
        let now = Utc::now();
        if let Some(kind) = accumulator::tick(&mut self.session, now, config) {
            self.emitter.emit(MonitorEvent::new(kind, now));
        }
    }
}

/// Attention tracker for one session at a time.
pub struct Tracker {
    shared: Arc<Mutex<Shared>>,
    config: TrackerConfig,
    event_log: EventLog,
    bus: Option<SignalBus>,
    ticker: Option<JoinHandle<()>>,
    pump: Option<JoinHandle<()>>,
}

impl Tracker {
    /// Creates a stopped tracker.
    pub fn create(config: TrackerConfig) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                session: MonitoringSession::new(),
                emitter: Emitter::default(),
                state: TrackerState::Stopped,
                generation: 0,
            })),
            config,
            event_log: EventLog::new(),
            bus: None,
            ticker: None,
            pump: None,
        }
    }

    /// Stops the tracker if needed and releases its tasks.
    pub fn dispose(mut self) {
        self.stop();
    }

    /// Uses `bus` as the platform signal source from the next `start` on.
    ///
    /// Without a bus, only [`Tracker::handle_signal`] feeds the observer and the
    /// user is considered active for the whole session.
    pub fn attach(&mut self, bus: SignalBus) {
        self.bus = Some(bus);
    }

    pub fn detach(&mut self) -> Option<SignalBus> {
        self.abort_pump();
        self.bus.take()
    }

    /// Starts a session, replacing any running one.
    ///
    /// Counters are reset, `subscriber` is registered, the signal pump is
    /// attached and the ticker is started. Calling this while running first
    /// tears the previous listeners down, so a signal is never counted twice.
    pub fn start(&mut self, session_id: impl Into<String>, subscriber: impl Subscriber + 'static) -> &Self {
        let session_id = session_id.into();
        if self.state() == TrackerState::Running {
            debug!(%session_id, "restarting running tracker");
            self.teardown();
        }

        let generation = {
            let mut shared = self.shared.lock();
            shared.session.begin(session_id.clone(), Utc::now());
            shared.emitter.register(Box::new(subscriber));
            shared.state = TrackerState::Running;
            shared.generation += 1;
            shared.generation
        };

        match Handle::try_current() {
            Ok(handle) => {
                self.ticker = Some(handle.spawn(run_ticker(self.shared.clone(), self.config, generation)));
                if let Some(bus) = &self.bus {
                    // Subscribe before returning so signals published right after start are seen
                    self.pump = Some(handle.spawn(run_pump(self.shared.clone(), bus.subscribe(), generation)));
                }
            }
            Err(_) => warn!("No async runtime available, elapsed time and bus signals are disabled"),
        }

        info!(%session_id, "Monitoring started");
        self
    }

    /// Stops the running session.
    ///
    /// Cancels the ticker, detaches the signal pump, runs one final time update
    /// and drops the subscriber. Counters stay readable until the next start.
    /// Calling it again, or before any start, does nothing.
    pub fn stop(&mut self) {
        if self.state() == TrackerState::Stopped {
            return;
        }
        self.teardown();

        let stats = self.stats();
        info!(
            session_id = stats.session_id.as_deref().unwrap_or_default(),
            total_time = stats.total_time,
            active_time = stats.active_time,
            tab_switches = stats.tab_switches,
            focus_lost = stats.focus_lost_count,
            "Monitoring stopped"
        );
    }

    /// Stops and zeroes every counter, forgetting the session id.
    pub fn reset(&mut self) {
        self.stop();
        self.shared.lock().session = MonitoringSession::new();
    }

    fn teardown(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        self.abort_pump();

        let mut shared = self.shared.lock();
        if shared.state == TrackerState::Running {
            shared.update_time(&self.config.accumulator);
        }
        shared.state = TrackerState::Stopped;
        shared.emitter.clear();
    }

    fn abort_pump(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }

    /// Feeds one platform signal to the observer synchronously.
    ///
    /// Ignored while stopped.
    pub fn handle_signal(&self, signal: Signal) {
        self.shared.lock().signal(signal);
    }

    /// Runs one accumulator step now, outside the ticker's cadence.
    pub fn update_time(&self) {
        let mut shared = self.shared.lock();
        if shared.state == TrackerState::Running {
            shared.update_time(&self.config.accumulator);
        }
    }

    pub fn state(&self) -> TrackerState {
        self.shared.lock().state
    }

    pub fn is_running(&self) -> bool {
        self.state() == TrackerState::Running
    }

    /// Current counters. Valid in every state and free of side effects.
    pub fn stats(&self) -> MonitorStats {
        self.shared.lock().session.stats()
    }

    /// Handle to the custom event log.
    ///
    /// The log never reaches the subscriber, so it is safe to use from inside one.
    pub fn event_log(&self) -> EventLog {
        self.event_log.clone()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        self.abort_pump();
    }
}

async fn run_ticker(shared: Arc<Mutex<Shared>>, config: TrackerConfig, generation: u64) {
    let mut interval = time::interval_at(time::Instant::now() + config.tick_interval, config.tick_interval);
    // A throttled host delivers late ticks one by one rather than in a burst
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        let mut guard = shared.lock();
        if !guard.is_current(generation) {
            break;
        }
        guard.update_time(&config.accumulator);
    }
}

async fn run_pump(shared: Arc<Mutex<Shared>>, mut receiver: broadcast::Receiver<Signal>, generation: u64) {
    loop {
        match receiver.recv().await {
            Ok(signal) => {
                let mut guard = shared.lock();
                if !guard.is_current(generation) {
                    break;
                }
                guard.signal(signal);
            }
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "Signal pump lagged, signals dropped"),
            Err(RecvError::Closed) => break,
        }
    }
}

//! Elapsed and active time accounting.
//!
//! Total time is recomputed from the wall clock on every tick, so it never
//! drifts. Active time grows by exactly one second per qualifying tick. When
//! the host delays ticks the two diverge and active time under-counts; the
//! scoring downstream expects this counting method.

use super::event::EventKind;
use super::session::MonitoringSession;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Period of the accumulator tick.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
/// Activity older than this no longer makes a tick count as active.
pub const RECENCY_WINDOW: Duration = Duration::from_secs(5);
/// A heartbeat is emitted whenever total seconds is a multiple of this.
pub const HEARTBEAT_EVERY_SECS: u64 = 10;

/// Tunables of the accumulator, defaulting to the constants above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccumulatorConfig {
    pub recency_window: Duration,
    pub heartbeat_every_secs: u64,
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        Self {
            recency_window: RECENCY_WINDOW,
            heartbeat_every_secs: HEARTBEAT_EVERY_SECS,
        }
    }
}

/// Advances the session counters to `now`.
///
/// Returns a `time_update` heartbeat when the recomputed total lands on the
/// heartbeat cadence. A session that never started is left untouched.
pub fn tick(session: &mut MonitoringSession, now: DateTime<Utc>, config: &AccumulatorConfig) -> Option<EventKind> {
    let started_at = session.started_at?;

    let elapsed_ms = (now - started_at).num_milliseconds().max(0) as u64;
    session.total_elapsed_seconds = session.total_elapsed_seconds.max(elapsed_ms / 1000);

    if session.is_active {
        if let Some(last_active_at) = session.last_active_at {
            let since_activity_ms = (now - last_active_at).num_milliseconds().max(0) as u64;
            if since_activity_ms < config.recency_window.as_millis() as u64 {
                session.active_elapsed_seconds += 1;
            }
        }
    }
    // Active time can never exceed the wall clock
    session.active_elapsed_seconds = session.active_elapsed_seconds.min(session.total_elapsed_seconds);

    let every = config.heartbeat_every_secs.max(1);
    if session.total_elapsed_seconds % every == 0 {
        Some(EventKind::TimeUpdate {
            total_time: session.total_elapsed_seconds,
            active_time: session.active_elapsed_seconds,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::observer::{observe, Signal};
    use chrono::Duration as ChronoDuration;

    fn started() -> (MonitoringSession, DateTime<Utc>) {
        let now = Utc::now();
        let mut session = MonitoringSession::new();
        session.begin("sess-1".to_string(), now);
        (session, now)
    }

    #[test]
    fn idle_session_is_ignored() {
        let mut session = MonitoringSession::new();
        assert_eq!(tick(&mut session, Utc::now(), &AccumulatorConfig::default()), None);
        assert_eq!(session.total_elapsed_seconds, 0);
    }

    #[test]
    fn active_time_stops_after_recency_window() {
        let (mut session, start) = started();
        let config = AccumulatorConfig::default();

        for second in 1..=8 {
            tick(&mut session, start + ChronoDuration::seconds(second), &config);
        }

        assert_eq!(session.total_elapsed_seconds, 8);
        // Ticks at 1..=4 are inside the 5s window, 5.. are not
        assert_eq!(session.active_elapsed_seconds, 4);
    }

    #[test]
    fn inactive_user_accrues_nothing() {
        let (mut session, start) = started();
        let config = AccumulatorConfig::default();
        observe(&mut session, Signal::WindowBlur, start);

        for second in 1..=3 {
            tick(&mut session, start + ChronoDuration::seconds(second), &config);
        }
        assert_eq!(session.total_elapsed_seconds, 3);
        assert_eq!(session.active_elapsed_seconds, 0);
    }

    #[test]
    fn heartbeat_on_tenth_second() {
        let (mut session, start) = started();
        let config = AccumulatorConfig::default();

        let mut beats = Vec::new();
        for second in 1..=20 {
            if let Some(event) = tick(&mut session, start + ChronoDuration::seconds(second), &config) {
                beats.push((second, event));
            }
        }
        assert_eq!(beats.len(), 2);
        assert_eq!(beats[0].0, 10);
        assert!(matches!(beats[1].1, EventKind::TimeUpdate { total_time: 20, .. }));
    }

    #[test]
    fn delayed_ticks_under_count_active_time() {
        let (mut session, start) = started();
        let config = AccumulatorConfig::default();

        // Background throttling: one tick every 3 seconds with fresh activity
        for step in 1..=4 {
            let now = start + ChronoDuration::seconds(step * 3);
            session.last_active_at = Some(now - ChronoDuration::seconds(1));
            tick(&mut session, now, &config);
        }
        assert_eq!(session.total_elapsed_seconds, 12);
        assert_eq!(session.active_elapsed_seconds, 4);
    }

    #[test]
    fn active_never_exceeds_total() {
        let (mut session, start) = started();
        let config = AccumulatorConfig::default();
        // Many ticks inside the same wall-clock second
        for millis in [100, 200, 300, 400, 1_100, 1_200] {
            tick(&mut session, start + ChronoDuration::milliseconds(millis), &config);
            assert!(session.active_elapsed_seconds <= session.total_elapsed_seconds);
        }
        assert_eq!(session.total_elapsed_seconds, 1);
        assert_eq!(session.active_elapsed_seconds, 1);
    }
}

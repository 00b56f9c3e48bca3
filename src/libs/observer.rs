//! Activity classification from platform signals.
//!
//! The observer turns raw platform signals (visibility, window focus and
//! generic input) into attention state changes on a [`MonitoringSession`].
//! Violations are returned as an [`EventKind`] for the emitter; plain input
//! only reclassifies the user and produces nothing.

use super::event::EventKind;
use super::session::MonitoringSession;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Generic user input that proves presence without being a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    PointerMove,
    KeyPress,
    Click,
    Scroll,
}

/// Signals delivered by the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", content = "input", rename_all = "snake_case")]
pub enum Signal {
    VisibilityHidden,
    VisibilityShown,
    WindowBlur,
    WindowFocus,
    Input(InputKind),
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Signal::VisibilityHidden => write!(f, "visibility:hidden"),
            Signal::VisibilityShown => write!(f, "visibility:shown"),
            Signal::WindowBlur => write!(f, "window:blur"),
            Signal::WindowFocus => write!(f, "window:focus"),
            Signal::Input(kind) => write!(f, "input:{:?}", kind),
        }
    }
}

/// Applies `signal` to `session` and returns the event to emit, if any.
pub fn observe(session: &mut MonitoringSession, signal: Signal, now: DateTime<Utc>) -> Option<EventKind> {
    match signal {
        Signal::VisibilityHidden => {
            session.is_active = false;
            session.tab_switch_count = session.tab_switch_count.saturating_add(1);
            Some(EventKind::TabSwitch { hidden: true })
        }
        Signal::VisibilityShown => {
            session.mark_active(now);
            Some(EventKind::TabSwitch { hidden: false })
        }
        Signal::WindowBlur => {
            session.is_active = false;
            session.focus_lost_count = session.focus_lost_count.saturating_add(1);
            Some(EventKind::FocusLost)
        }
        Signal::WindowFocus => {
            session.mark_active(now);
            Some(EventKind::FocusGained)
        }
        Signal::Input(_) => {
            if !session.is_active {
                session.mark_active(now);
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn running_session() -> (MonitoringSession, DateTime<Utc>) {
        let now = Utc::now();
        let mut session = MonitoringSession::new();
        session.begin("sess-1".to_string(), now);
        (session, now)
    }

    #[test]
    fn hidden_tab_counts_switch() {
        let (mut session, now) = running_session();
        let event = observe(&mut session, Signal::VisibilityHidden, now);
        assert_eq!(event, Some(EventKind::TabSwitch { hidden: true }));
        assert_eq!(session.tab_switch_count, 1);
        assert!(!session.is_active);
    }

    #[test]
    fn shown_tab_reactivates_without_counting() {
        let (mut session, now) = running_session();
        observe(&mut session, Signal::VisibilityHidden, now);
        let later = now + Duration::seconds(3);
        let event = observe(&mut session, Signal::VisibilityShown, later);
        assert_eq!(event, Some(EventKind::TabSwitch { hidden: false }));
        assert_eq!(session.tab_switch_count, 1);
        assert!(session.is_active);
        assert_eq!(session.last_active_at, Some(later));
    }

    #[test]
    fn blur_and_focus() {
        let (mut session, now) = running_session();
        assert_eq!(observe(&mut session, Signal::WindowBlur, now), Some(EventKind::FocusLost));
        assert_eq!(session.focus_lost_count, 1);
        assert!(!session.is_active);

        let later = now + Duration::seconds(1);
        assert_eq!(observe(&mut session, Signal::WindowFocus, later), Some(EventKind::FocusGained));
        assert_eq!(session.focus_lost_count, 1);
        assert_eq!(session.last_active_at, Some(later));
    }

    #[test]
    fn input_only_reclassifies_inactive_user() {
        let (mut session, now) = running_session();

        // Already active: last activity stays where it was
        let later = now + Duration::seconds(2);
        assert_eq!(observe(&mut session, Signal::Input(InputKind::PointerMove), later), None);
        assert_eq!(session.last_active_at, Some(now));

        observe(&mut session, Signal::WindowBlur, later);
        let latest = later + Duration::seconds(2);
        assert_eq!(observe(&mut session, Signal::Input(InputKind::KeyPress), latest), None);
        assert!(session.is_active);
        assert_eq!(session.last_active_at, Some(latest));
        assert_eq!(session.focus_lost_count, 1);
    }
}

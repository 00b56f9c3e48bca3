//! Event taxonomy for the monitoring core.
//!
//! Two families of events exist and they never mix:
//!
//! - [`MonitorEvent`]: classified occurrences produced by the tracker itself
//!   (tab switches, focus changes, time heartbeats). These are the only events
//!   ever delivered to the registered subscriber.
//! - [`CustomEvent`]: product events raised by arbitrary call sites (camera
//!   toggles, chat queries, breaks). These go to the [`EventLog`] only.
//!
//! [`EventLog`]: crate::libs::emitter::EventLog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind and payload of a classified monitoring event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum EventKind {
    /// Page visibility changed. `hidden == true` is the violation.
    TabSwitch { hidden: bool },
    FocusLost,
    FocusGained,
    /// Periodic heartbeat with the accumulated counters, in seconds.
    TimeUpdate { total_time: u64, active_time: u64 },
}

impl EventKind {
    /// Wire name of the event, as expected by the recording endpoint.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::TabSwitch { .. } => "tab_switch",
            EventKind::FocusLost => "focus_lost",
            EventKind::FocusGained => "focus_gained",
            EventKind::TimeUpdate { .. } => "time_update",
        }
    }

    /// Whether the event is a discrete attention violation worth persisting.
    pub fn is_violation(&self) -> bool {
        !matches!(self, EventKind::TimeUpdate { .. })
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A classified event together with the moment it was observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorEvent {
    #[serde(flatten)]
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
}

impl MonitorEvent {
    pub fn new(kind: EventKind, timestamp: DateTime<Utc>) -> Self {
        Self { kind, timestamp }
    }

    /// Payload without the type tag, used as `event_data` when recording.
    pub fn data(&self) -> serde_json::Value {
        let mut data = match self.kind {
            EventKind::TabSwitch { hidden } => serde_json::json!({ "hidden": hidden }),
            EventKind::TimeUpdate { total_time, active_time } => serde_json::json!({
                "total_time": total_time,
                "active_time": active_time,
            }),
            EventKind::FocusLost | EventKind::FocusGained => serde_json::json!({}),
        };
        data["timestamp"] = serde_json::Value::from(self.timestamp.timestamp_millis());
        data
    }
}

/// Product-specific events that pass through without special handling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CustomEventKind {
    CameraToggle,
    ChatQuery,
    BreakStarted,
    BreakEnded,
    CopyAttempt,
    PasteAttempt,
    ScreenshotAttempt,
    Other(String),
}

impl CustomEventKind {
    pub fn as_str(&self) -> &str {
        match self {
            CustomEventKind::CameraToggle => "camera_toggle",
            CustomEventKind::ChatQuery => "chat_query",
            CustomEventKind::BreakStarted => "break_started",
            CustomEventKind::BreakEnded => "break_ended",
            CustomEventKind::CopyAttempt => "copy_attempt",
            CustomEventKind::PasteAttempt => "paste_attempt",
            CustomEventKind::ScreenshotAttempt => "screenshot_attempt",
            CustomEventKind::Other(name) => name,
        }
    }
}

impl From<&str> for CustomEventKind {
    fn from(value: &str) -> Self {
        match value {
            "camera_toggle" => CustomEventKind::CameraToggle,
            "chat_query" => CustomEventKind::ChatQuery,
            "break_started" => CustomEventKind::BreakStarted,
            "break_ended" => CustomEventKind::BreakEnded,
            "copy_attempt" => CustomEventKind::CopyAttempt,
            "paste_attempt" => CustomEventKind::PasteAttempt,
            "screenshot_attempt" => CustomEventKind::ScreenshotAttempt,
            other => CustomEventKind::Other(other.to_string()),
        }
    }
}

impl From<String> for CustomEventKind {
    fn from(value: String) -> Self {
        CustomEventKind::from(value.as_str())
    }
}

impl From<CustomEventKind> for String {
    fn from(value: CustomEventKind) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for CustomEventKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A product event raised outside the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomEvent {
    pub event_type: CustomEventKind,
    #[serde(default)]
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl CustomEvent {
    pub fn new(event_type: impl Into<CustomEventKind>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn tab_switch_serializes_with_flat_tag() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let event = MonitorEvent::new(EventKind::TabSwitch { hidden: true }, ts);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "tab_switch");
        assert_eq!(json["hidden"], true);
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn time_update_data_carries_counters() {
        let event = MonitorEvent::new(EventKind::TimeUpdate { total_time: 20, active_time: 12 }, Utc::now());
        let data = event.data();
        assert_eq!(data["total_time"], 20);
        assert_eq!(data["active_time"], 12);
        assert!(data.get("event_type").is_none());
    }

    #[test]
    fn custom_kind_keeps_unknown_names() {
        assert_eq!(CustomEventKind::from("chat_query"), CustomEventKind::ChatQuery);
        let other = CustomEventKind::from("whiteboard_snapshot");
        assert_eq!(other.as_str(), "whiteboard_snapshot");
        let json = serde_json::to_string(&other).unwrap();
        assert_eq!(json, "\"whiteboard_snapshot\"");
    }

    #[test]
    fn heartbeat_is_not_a_violation() {
        assert!(!EventKind::TimeUpdate { total_time: 0, active_time: 0 }.is_violation());
        assert!(EventKind::FocusLost.is_violation());
    }
}

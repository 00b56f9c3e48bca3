//! Monitoring session state and the stats snapshot derived from it.

use super::data_storage::DataStorage;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Stats of the most recent `watch` run, kept next to the config file.
pub const LAST_SESSION_FILE_NAME: &str = "last_session.json";

/// One observed span of user attention.
///
/// Counters only move forward while the session runs. They are zeroed by
/// [`MonitoringSession::begin`] and stay readable after the session stops.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitoringSession {
    pub session_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub total_elapsed_seconds: u64,
    pub active_elapsed_seconds: u64,
    pub tab_switch_count: u32,
    pub focus_lost_count: u32,
    pub is_active: bool,
    pub last_active_at: Option<DateTime<Utc>>,
}

impl Default for MonitoringSession {
    fn default() -> Self {
        Self {
            session_id: None,
            started_at: None,
            total_elapsed_seconds: 0,
            active_elapsed_seconds: 0,
            tab_switch_count: 0,
            focus_lost_count: 0,
            is_active: true,
            last_active_at: None,
        }
    }
}

impl MonitoringSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets every counter and anchors the session at `now`.
    pub fn begin(&mut self, session_id: String, now: DateTime<Utc>) {
        *self = Self {
            session_id: Some(session_id),
            started_at: Some(now),
            last_active_at: Some(now),
            ..Self::default()
        };
    }

    /// Marks the user as attentive as of `now`.
    pub(crate) fn mark_active(&mut self, now: DateTime<Utc>) {
        self.is_active = true;
        self.last_active_at = Some(now);
    }

    pub fn stats(&self) -> MonitorStats {
        MonitorStats {
            session_id: self.session_id.clone(),
            total_time: self.total_elapsed_seconds,
            active_time: self.active_elapsed_seconds,
            tab_switches: self.tab_switch_count,
            focus_lost_count: self.focus_lost_count,
            engagement_rate: engagement_rate(self.active_elapsed_seconds, self.total_elapsed_seconds),
        }
    }
}

/// Read-only snapshot returned by `Tracker::stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStats {
    pub session_id: Option<String>,
    pub total_time: u64,
    pub active_time: u64,
    pub tab_switches: u32,
    pub focus_lost_count: u32,
    pub engagement_rate: f64,
}

impl Default for MonitorStats {
    fn default() -> Self {
        MonitoringSession::default().stats()
    }
}

impl MonitorStats {
    /// Overwrites the last-session file and returns its path.
    pub fn save_last(&self) -> Result<PathBuf> {
        let path = DataStorage::new().get_path(LAST_SESSION_FILE_NAME)?;
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }

    /// `None` until a session has been saved.
    pub fn read_last() -> Result<Option<Self>> {
        let path = DataStorage::new().get_path(LAST_SESSION_FILE_NAME)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&fs::read_to_string(path)?)?))
    }
}

/// Share of elapsed time classified as active, in percent. Zero when no time elapsed.
pub fn engagement_rate(active_time: u64, total_time: u64) -> f64 {
    if total_time == 0 {
        return 0.0;
    }
    active_time as f64 / total_time as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_resets_counters() {
        let mut session = MonitoringSession::new();
        session.tab_switch_count = 4;
        session.focus_lost_count = 2;
        session.active_elapsed_seconds = 30;
        session.total_elapsed_seconds = 40;
        session.is_active = false;

        let now = Utc::now();
        session.begin("sess-2".to_string(), now);

        assert_eq!(session.session_id.as_deref(), Some("sess-2"));
        assert_eq!(session.tab_switch_count, 0);
        assert_eq!(session.focus_lost_count, 0);
        assert_eq!(session.total_elapsed_seconds, 0);
        assert_eq!(session.active_elapsed_seconds, 0);
        assert!(session.is_active);
        assert_eq!(session.started_at, Some(now));
        assert_eq!(session.last_active_at, Some(now));
    }

    #[test]
    fn engagement_rate_without_elapsed_time_is_zero() {
        assert_eq!(engagement_rate(0, 0), 0.0);
        assert_eq!(engagement_rate(30, 60), 50.0);
    }

    #[test]
    fn stats_serialize_camel_case() {
        let json = serde_json::to_value(MonitorStats::default()).unwrap();
        assert!(json.get("focusLostCount").is_some());
        assert!(json.get("engagementRate").is_some());
    }
}

//! Extension (background) attention monitor.
//!
//! The browser extension only sees tab activations, so it scores attention
//! from the number of switches and how long the current tab has held focus
//! (see [`attention_score`]). Every switch produces an [`ExtensionStats`]
//! snapshot for the registered sinks, and a [`FocusNudge`] when attention
//! drops below the configured threshold after enough switches.
//!
//! Requests mirror the extension's message protocol:
//!
//! ```text
//! {"action":"tabActivated","data":{"tabId":12}}
//! {"action":"resetSession"}
//! {"action":"getStats"}
//! {"action":"updateSettings","data":{"studyMode":"exam","blockedSites":["reddit.com"]}}
//! ```

use super::config::ExtensionConfig;
use super::score::attention_score;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

pub const DEFAULT_BLOCKED_SITES: &[&str] = &["facebook.com", "twitter.com", "instagram.com", "youtube.com"];
pub const NUDGE_SCORE_THRESHOLD: f64 = 70.0;
pub const NUDGE_MIN_SWITCHES: u32 = 5;

pub type TabId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    #[default]
    Basic,
    Exam,
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StudyMode::Basic => write!(f, "basic"),
            StudyMode::Exam => write!(f, "exam"),
        }
    }
}

/// Snapshot pushed to the study app after each switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionStats {
    pub tab_switches: u32,
    pub attention_score: f64,
    /// Whole minutes since the session started.
    pub session_time: i64,
    pub study_mode: StudyMode,
    pub is_extension_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusNudge {
    pub title: String,
    pub message: String,
}

impl Default for FocusNudge {
    fn default() -> Self {
        Self {
            title: "Stay Focused!".to_string(),
            message: "You've been switching tabs frequently. Stay focused for 5 more minutes!".to_string(),
        }
    }
}

/// Outgoing notification for the UI side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ExtensionUpdate {
    #[serde(rename = "EXTENSION_STATS")]
    Stats(ExtensionStats),
    #[serde(rename = "FOCUS_NUDGE")]
    Nudge(FocusNudge),
}

/// Receiver of extension updates. Delivery is best effort.
pub trait StatsSink: Send {
    fn deliver(&mut self, update: &ExtensionUpdate);
}

impl<F> StatsSink for F
where
    F: FnMut(&ExtensionUpdate) + Send,
{
    fn deliver(&mut self, update: &ExtensionUpdate) {
        self(update)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_mode: Option<StudyMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_sites: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabActivation {
    pub tab_id: TabId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "camelCase")]
pub enum ExtensionRequest {
    TabActivated(TabActivation),
    ResetSession,
    GetStats,
    UpdateSettings(SettingsUpdate),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtensionResponse {
    Stats(ExtensionStats),
    Ack { success: bool },
}

/// Tab switch tracker of the extension context.
pub struct ExtensionMonitor {
    settings: ExtensionConfig,
    tab_switch_count: u32,
    current_tab: Option<TabId>,
    session_started_at: DateTime<Utc>,
    focus_started_at: DateTime<Utc>,
    attention_score: f64,
    sinks: Vec<Box<dyn StatsSink>>,
}

impl ExtensionMonitor {
    pub fn new(settings: ExtensionConfig) -> Self {
        Self::new_at(settings, Utc::now())
    }

    pub fn new_at(settings: ExtensionConfig, now: DateTime<Utc>) -> Self {
        Self {
            settings,
            tab_switch_count: 0,
            current_tab: None,
            session_started_at: now,
            focus_started_at: now,
            attention_score: 100.0,
            sinks: Vec::new(),
        }
    }

    pub fn add_sink(&mut self, sink: impl StatsSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn settings(&self) -> &ExtensionConfig {
        &self.settings
    }

    pub fn tab_switch_count(&self) -> u32 {
        self.tab_switch_count
    }

    /// Last attention score computed on a switch.
    pub fn attention_score(&self) -> f64 {
        self.attention_score
    }

    pub fn on_tab_activated(&mut self, tab_id: TabId) -> Option<ExtensionStats> {
        self.on_tab_activated_at(tab_id, Utc::now())
    }

    /// Records the activation of `tab_id`.
    ///
    /// Moving away from a different tab counts a switch, rescores attention,
    /// notifies the sinks and returns the new snapshot. Re-activating the
    /// current tab, or the very first activation, only restarts the focus clock.
    pub fn on_tab_activated_at(&mut self, tab_id: TabId, now: DateTime<Utc>) -> Option<ExtensionStats> {
        let switched = matches!(self.current_tab, Some(current) if current != tab_id);
        let mut snapshot = None;

        if switched {
            self.tab_switch_count = self.tab_switch_count.saturating_add(1);
            let since_focus_ms = (now - self.focus_started_at).num_milliseconds().max(0) as u64;
            self.attention_score = attention_score(self.tab_switch_count, since_focus_ms);
            debug!(tab_id, switches = self.tab_switch_count, score = self.attention_score, "tab switch");

            let stats = self.snapshot(self.attention_score, now);
            self.broadcast(&ExtensionUpdate::Stats(stats.clone()));

            if self.attention_score < self.settings.nudge_score_threshold && self.tab_switch_count > self.settings.nudge_min_switches {
                info!(score = self.attention_score, "attention dropping, nudging");
                self.broadcast(&ExtensionUpdate::Nudge(FocusNudge::default()));
            }
            snapshot = Some(stats);
        }

        self.current_tab = Some(tab_id);
        self.focus_started_at = now;
        snapshot
    }

    /// Live stats; the score is recomputed against the current focus time.
    pub fn stats_at(&self, now: DateTime<Utc>) -> ExtensionStats {
        let since_focus_ms = (now - self.focus_started_at).num_milliseconds().max(0) as u64;
        self.snapshot(attention_score(self.tab_switch_count, since_focus_ms), now)
    }

    pub fn reset_at(&mut self, now: DateTime<Utc>) {
        self.tab_switch_count = 0;
        self.session_started_at = now;
        self.focus_started_at = now;
        self.attention_score = 100.0;
    }

    pub fn update_settings(&mut self, update: SettingsUpdate) {
        if let Some(mode) = update.study_mode {
            self.settings.study_mode = mode;
        }
        if let Some(sites) = update.blocked_sites {
            self.settings.blocked_sites = sites;
        }
    }

    pub fn handle(&mut self, request: ExtensionRequest) -> ExtensionResponse {
        self.handle_at(request, Utc::now())
    }

    pub fn handle_at(&mut self, request: ExtensionRequest, now: DateTime<Utc>) -> ExtensionResponse {
        match request {
            ExtensionRequest::TabActivated(TabActivation { tab_id }) => match self.on_tab_activated_at(tab_id, now) {
                Some(stats) => ExtensionResponse::Stats(stats),
                None => ExtensionResponse::Ack { success: true },
            },
            ExtensionRequest::ResetSession => {
                self.reset_at(now);
                ExtensionResponse::Ack { success: true }
            }
            ExtensionRequest::GetStats => ExtensionResponse::Stats(self.stats_at(now)),
            ExtensionRequest::UpdateSettings(update) => {
                self.update_settings(update);
                ExtensionResponse::Ack { success: true }
            }
        }
    }

    fn snapshot(&self, score: f64, now: DateTime<Utc>) -> ExtensionStats {
        ExtensionStats {
            tab_switches: self.tab_switch_count,
            attention_score: score,
            session_time: (now - self.session_started_at).num_minutes().max(0),
            study_mode: self.settings.study_mode,
            is_extension_active: true,
        }
    }

    fn broadcast(&mut self, update: &ExtensionUpdate) {
        for sink in self.sinks.iter_mut() {
            sink.deliver(update);
        }
    }
}

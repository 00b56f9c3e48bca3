//! Display text for [`Message`].
//!
//! All user-facing wording lives here so commands only pick a variant.

use super::types::Message;
use crate::libs::formatter::format_percent;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === CONFIG MESSAGES ===
            Message::ConfigModuleMonitor => "Page tracker".to_string(),
            Message::ConfigModuleServer => "Recording server".to_string(),
            Message::ConfigModuleExtension => "Browser extension".to_string(),
            Message::ConfigSaved => "Configuration saved".to_string(),
            Message::ConfigDeleted => "Configuration deleted".to_string(),
            Message::ConfigNotFound => "No configuration file, nothing to delete".to_string(),

            // === WATCH MESSAGES ===
            Message::MonitorStarted(session_id) => format!("Monitoring session {}. Press Ctrl+C to stop.", session_id),
            Message::MonitorStopped => "Monitoring stopped".to_string(),
            Message::WatcherReceivedCtrlC => "Received Ctrl+C, stopping".to_string(),
            Message::WatcherReceivedSigterm => "Received SIGTERM, stopping".to_string(),
            Message::WatcherReadingStdin => "Reading signals from stdin as JSON lines".to_string(),
            Message::InvalidSignal(error) => format!("Ignoring malformed signal: {}", error),
            Message::TabHidden => "Tab switched away".to_string(),
            Message::TabVisible => "Tab visible again".to_string(),
            Message::FocusLostNotice => "Window lost focus".to_string(),
            Message::FocusRegained => "Window focused".to_string(),
            Message::ElapsedTime(total, active) => format!("Elapsed {} (active {})", total, active),
            Message::InputListenerFailed(error) => format!("Input listener unavailable: {}", error),
            Message::EngagementScore(score) => format!("Engagement score: {}", format_percent(*score)),
            Message::SessionSaved(path) => format!("Session saved to {}", path),
            Message::SessionSaveFailed(error) => format!("Failed to save session: {}", error),

            // === RECORDING MESSAGES ===
            Message::ApiClientFailed(error) => format!("Recording disabled: {}", error),
            Message::ApiSessionStarted(id) => format!("Server session {} opened", id),
            Message::ApiSessionFailed(error) => format!("Failed to open server session: {}", error),
            Message::ApiSessionEndFailed(error) => format!("Failed to close server session: {}", error),
            Message::RecordingSummary(sent, failed) => format!("Recorded {} event(s), {} failed", sent, failed),

            // === STATS MESSAGES ===
            Message::NoSavedSession => "No saved session yet. Run `studyguard watch` first.".to_string(),
            Message::LastSessionHeader(session_id) => format!("Last session {}", session_id),

            // === SCORE MESSAGES ===
            Message::AttentionScore(score) => format!("Attention score: {}", format_percent(*score)),
            Message::EngagementScoreHeader => "Engagement score breakdown".to_string(),

            // === EXTENSION HOST MESSAGES ===
            Message::HostStarted => "Extension host ready, reading requests from stdin".to_string(),
            Message::HostInvalidRequest(error) => format!("Ignoring malformed request: {}", error),
            Message::FocusNudge(body) => format!("Focus nudge: {}", body),

            // === PROMPTS ===
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptTickInterval => "Tick interval (ms)".to_string(),
            Message::PromptRecencyWindow => "Activity recency window (seconds)".to_string(),
            Message::PromptHeartbeatEvery => "Heartbeat every (seconds)".to_string(),
            Message::PromptInputListener => "Capture keyboard and mouse activity?".to_string(),
            Message::PromptServerApiUrl => "Recording API URL".to_string(),
            Message::PromptServerAuthToken => "Auth token (empty for none)".to_string(),
            Message::PromptStudyMode => "Study mode".to_string(),
            Message::PromptBlockedSites => "Blocked sites (comma separated)".to_string(),
        };

        write!(f, "{}", text)
    }
}

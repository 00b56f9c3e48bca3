//! Human readable formatting of tracked time and scores.
//!
//! Session counters are plain seconds. For display they are rendered in the
//! compact form used by the study app:
//!
//! - 3725 seconds → "1h 2m 5s"
//! - 125 seconds → "2m 5s"
//! - 42 seconds → "42s"
//!
//! ## Examples
//!
//! ```rust
//! use studyguard::libs::formatter::{format_percent, format_time};
//!
//! assert_eq!(format_time(3725), "1h 2m 5s");
//! assert_eq!(format_percent(66.666), "67%");
//! ```

use super::session::MonitorStats;
use serde::{Deserialize, Serialize};

/// Formats a number of seconds as `"Hh Mm Ss"`, dropping leading zero units.
///
/// Minutes are kept once hours are shown, so 3600 becomes "1h 0m 0s".
pub fn format_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Rounds a percentage or score for display.
pub fn format_percent(value: f64) -> String {
    format!("{}%", value.round() as i64)
}

/// Pre-formatted stats row for tables and exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedStats {
    pub session_id: String,
    pub total_time: String,
    pub active_time: String,
    pub tab_switches: u32,
    pub focus_lost: u32,
    pub engagement_rate: String,
}

impl From<&MonitorStats> for FormattedStats {
    fn from(stats: &MonitorStats) -> Self {
        Self {
            session_id: stats.session_id.clone().unwrap_or_else(|| "-".to_string()),
            total_time: format_time(stats.total_time),
            active_time: format_time(stats.active_time),
            tab_switches: stats.tab_switches,
            focus_lost: stats.focus_lost_count,
            engagement_rate: format_percent(stats.engagement_rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_magnitude() {
        assert_eq!(format_time(0), "0s");
        assert_eq!(format_time(59), "59s");
        assert_eq!(format_time(60), "1m 0s");
        assert_eq!(format_time(3600), "1h 0m 0s");
        assert_eq!(format_time(90_061), "25h 1m 1s");
    }

    #[test]
    fn stats_row_uses_placeholder_for_missing_session() {
        let row = FormattedStats::from(&MonitorStats::default());
        assert_eq!(row.session_id, "-");
        assert_eq!(row.engagement_rate, "0%");
    }
}

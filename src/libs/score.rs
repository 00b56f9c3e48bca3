//! Attention and engagement scoring.
//!
//! Two independent formulas are used in two contexts and both are kept:
//!
//! ```text
//! attention  = clamp(100 - switches * 2 + min(since_focus / 5min, 1) * 10)
//! engagement = clamp(round(active/total * 100 - min(20, switches * 2) - min(10, focus_lost)))
//! ```
//!
//! The attention score belongs to the extension context, where only tab
//! activations are visible. The engagement score belongs to the page tracker,
//! which also knows active and total time. Both results lie in `0.0..=100.0`.

use super::session::MonitorStats;

pub const MAX_SCORE: f64 = 100.0;
pub const MIN_SCORE: f64 = 0.0;

/// Points lost per tab switch, in both formulas.
pub const TAB_SWITCH_PENALTY: f64 = 2.0;
/// Sustained focus needed to earn the whole focus bonus.
pub const FOCUS_BONUS_WINDOW_MS: u64 = 5 * 60 * 1000;
pub const FOCUS_BONUS_MAX: f64 = 10.0;

pub const TAB_SWITCH_PENALTY_CAP: f64 = 20.0;
pub const FOCUS_LOST_PENALTY: f64 = 1.0;
pub const FOCUS_LOST_PENALTY_CAP: f64 = 10.0;

fn clamp_score(score: f64) -> f64 {
    score.max(MIN_SCORE).min(MAX_SCORE)
}

/// Attention score from the number of tab switches and the time since the
/// current tab gained focus.
///
/// # Examples
///
/// ```rust
/// use studyguard::libs::score::attention_score;
///
/// assert_eq!(attention_score(0, 0), 100.0);
/// assert_eq!(attention_score(5, 0), 90.0);
/// ```
pub fn attention_score(switches: u32, time_since_focus_ms: u64) -> f64 {
    let switch_penalty = switches as f64 * TAB_SWITCH_PENALTY;
    let time_factor = (time_since_focus_ms as f64 / FOCUS_BONUS_WINDOW_MS as f64).min(1.0);
    clamp_score(MAX_SCORE - switch_penalty + time_factor * FOCUS_BONUS_MAX)
}

/// Engagement score from raw page tracker counters.
///
/// Returns 0 when no time has elapsed. The result is rounded to a whole number
/// before clamping.
pub fn engagement_score(total_time: u64, active_time: u64, tab_switches: u32, focus_lost_count: u32) -> f64 {
    if total_time == 0 {
        return MIN_SCORE;
    }

    let active_ratio = active_time as f64 / total_time as f64;
    let mut score = active_ratio * 100.0;

    score -= (tab_switches as f64 * TAB_SWITCH_PENALTY).min(TAB_SWITCH_PENALTY_CAP);
    score -= (focus_lost_count as f64 * FOCUS_LOST_PENALTY).min(FOCUS_LOST_PENALTY_CAP);

    clamp_score(score.round())
}

/// Convenience wrapper over [`engagement_score`] for a stats snapshot.
pub fn engagement_score_for(stats: &MonitorStats) -> f64 {
    engagement_score(stats.total_time, stats.active_time, stats.tab_switches, stats.focus_lost_count)
}

/// Traffic-light bucket used when presenting a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreGrade {
    Good,
    Warning,
    Danger,
}

impl ScoreGrade {
    pub fn of(score: f64) -> Self {
        if score >= 80.0 {
            ScoreGrade::Good
        } else if score >= 60.0 {
            ScoreGrade::Warning
        } else {
            ScoreGrade::Danger
        }
    }
}

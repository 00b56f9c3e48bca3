use super::formatter::{format_percent, FormattedStats};
use super::score::{engagement_score_for, ScoreGrade};
use super::session::MonitorStats;
use prettytable::{row, Table};

pub struct View {}

impl View {
    /// Table of a page tracker session with its engagement score.
    pub fn stats(stats: &MonitorStats) -> Table {
        let row_data = FormattedStats::from(stats);
        let score = engagement_score_for(stats);

        let mut table = Table::new();
        table.add_row(row!["SESSION", "TOTAL", "ACTIVE", "TAB SWITCHES", "FOCUS LOST", "ENGAGEMENT", "SCORE"]);
        table.add_row(row![
            row_data.session_id,
            row_data.total_time,
            row_data.active_time,
            row_data.tab_switches,
            row_data.focus_lost,
            row_data.engagement_rate,
            format!("{} ({})", format_percent(score), grade_label(score)),
        ]);
        table
    }
}

fn grade_label(score: f64) -> &'static str {
    match ScoreGrade::of(score) {
        ScoreGrade::Good => "good",
        ScoreGrade::Warning => "warning",
        ScoreGrade::Danger => "danger",
    }
}

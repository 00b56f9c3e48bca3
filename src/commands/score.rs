use crate::{
    libs::{
        messages::Message,
        score::{attention_score, engagement_score},
        session::{engagement_rate, MonitorStats},
        view::View,
    },
    msg_print,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ScoreArgs {
    #[command(subcommand)]
    kind: ScoreKind,
}

#[derive(Debug, Subcommand)]
enum ScoreKind {
    /// Extension attention score from tab switches and time on the current tab
    Attention {
        #[arg(short, long, default_value_t = 0)]
        switches: u32,
        /// Milliseconds since the current tab gained focus
        #[arg(long, default_value_t = 0)]
        since_focus_ms: u64,
    },
    /// Page engagement score from session counters
    Engagement {
        /// Total elapsed seconds
        #[arg(short, long)]
        total: u64,
        /// Active elapsed seconds
        #[arg(short, long)]
        active: u64,
        #[arg(short, long, default_value_t = 0)]
        switches: u32,
        #[arg(short, long, default_value_t = 0)]
        focus_lost: u32,
    },
}

pub fn cmd(args: ScoreArgs) -> Result<()> {
    match args.kind {
        ScoreKind::Attention { switches, since_focus_ms } => {
            msg_print!(Message::AttentionScore(attention_score(switches, since_focus_ms)));
        }
        ScoreKind::Engagement {
            total,
            active,
            switches,
            focus_lost,
        } => {
            let active = active.min(total);
            let stats = MonitorStats {
                session_id: None,
                total_time: total,
                active_time: active,
                tab_switches: switches,
                focus_lost_count: focus_lost,
                engagement_rate: engagement_rate(active, total),
            };
            msg_print!(Message::EngagementScoreHeader, true);
            View::stats(&stats).printstd();
            msg_print!(Message::EngagementScore(engagement_score(total, active, switches, focus_lost)));
        }
    }
    Ok(())
}

use crate::{
    libs::{messages::Message, session::MonitorStats, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Print the raw stats as JSON
    #[arg(long)]
    json: bool,
}

pub fn cmd(args: StatsArgs) -> Result<()> {
    let Some(stats) = MonitorStats::read_last()? else {
        msg_info!(Message::NoSavedSession);
        return Ok(());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    msg_print!(Message::LastSessionHeader(stats.session_id.clone().unwrap_or_default()), true);
    View::stats(&stats).printstd();
    Ok(())
}

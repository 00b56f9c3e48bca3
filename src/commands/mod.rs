//! Command-line interface.
//!
//! Each subcommand lives in its own module exposing an `Args` struct and a
//! `cmd` function. [`Cli::menu`] parses the process arguments and dispatches.

pub mod host;
pub mod init;
pub mod score;
pub mod stats;
pub mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Monitor a study session until interrupted")]
    Watch(watch::WatchArgs),
    #[command(about = "Compute attention or engagement scores", arg_required_else_help = true)]
    Score(score::ScoreArgs),
    #[command(about = "Show the last monitored session")]
    Stats(stats::StatsArgs),
    #[command(about = "Serve the browser extension tab monitor over stdin/stdout")]
    Host,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Watch(args) => watch::cmd(args).await,
            Commands::Score(args) => score::cmd(args),
            Commands::Stats(args) => stats::cmd(args),
            Commands::Host => host::cmd().await,
        }
    }
}

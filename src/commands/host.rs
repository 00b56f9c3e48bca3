//! Line protocol host for the browser extension's tab monitor.
//!
//! Requests arrive on stdin as one JSON object per line, for example
//! `{"action":"tabActivated","data":{"tabId":3}}`. Each request gets one JSON
//! response line on stdout. Pushed updates (`EXTENSION_STATS`, `FOCUS_NUDGE`)
//! are written to stdout as they happen, ahead of the response that caused them.
//! Diagnostics only ever go to the log on stderr.

use crate::libs::{
    config::Config,
    extension::{ExtensionMonitor, ExtensionRequest, ExtensionUpdate},
    messages::Message,
};
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

pub async fn cmd() -> Result<()> {
    let settings = Config::read()?.extension.unwrap_or_default();
    let mut monitor = ExtensionMonitor::new(settings);
    monitor.add_sink(|update: &ExtensionUpdate| {
        if let ExtensionUpdate::Nudge(nudge) = update {
            info!("{}", Message::FocusNudge(nudge.message.clone()));
        }
        if let Err(e) = write_line(update) {
            debug!(error = %e, "update not delivered");
        }
    });
    info!("{}", Message::HostStarted);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ExtensionRequest>(&line) {
            Ok(request) => write_line(&monitor.handle(request))?,
            Err(e) => warn!("{}", Message::HostInvalidRequest(e.to_string())),
        }
    }
    Ok(())
}

fn write_line<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

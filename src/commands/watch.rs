use crate::{
    api::MonitoringApi,
    libs::{
        config::Config,
        emitter::Subscriber,
        event::{EventKind, MonitorEvent},
        formatter::format_time,
        messages::Message,
        recorder::{Destination, Recorder},
        score::engagement_score_for,
        signals::{parse_signal_line, InputListener, SignalBus},
        tracker::{Tracker, TrackerConfig},
        view::View,
    },
    msg_error, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Session id to report under. A random one is generated when omitted
    #[arg(long)]
    session_id: Option<String>,

    /// Open a server-side session for this content and use its id
    #[arg(long)]
    content_id: Option<String>,

    /// Read JSON signals from stdin instead of capturing native input
    #[arg(long)]
    stdin: bool,

    /// Do not send events to the recording server
    #[arg(long)]
    offline: bool,

    /// Also record periodic time updates
    #[arg(long)]
    heartbeats: bool,

    /// Only print the final summary
    #[arg(short, long)]
    quiet: bool,
}

pub async fn cmd(args: WatchArgs) -> Result<()> {
    let config = Config::read()?;
    let monitor_config = config.monitor.unwrap_or_default();
    let server_config = config.server.unwrap_or_default();

    let api = if args.offline {
        None
    } else {
        match MonitoringApi::new(&server_config) {
            Ok(api) => Some(api),
            Err(e) => {
                msg_warning!(Message::ApiClientFailed(e.to_string()));
                None
            }
        }
    };

    let mut destination = Destination::StudySession(args.session_id.unwrap_or_else(|| Uuid::new_v4().to_string()));
    if let (Some(api), Some(content_id)) = (&api, &args.content_id) {
        match api.start_session(content_id).await {
            Ok(id) => {
                msg_info!(Message::ApiSessionStarted(id.clone()));
                destination = Destination::MonitoringSession(id);
            }
            Err(e) => msg_warning!(Message::ApiSessionFailed(e.to_string())),
        }
    }
    let session_id = destination.id().to_string();

    let (mut recorder, recorder_handle) = match &api {
        Some(api) => {
            let (recorder, handle) = Recorder::spawn(api.clone(), destination);
            (Some(recorder.with_heartbeats(args.heartbeats)), Some(handle))
        }
        None => (None, None),
    };

    let bus = SignalBus::default();
    let mut tracker = Tracker::create(TrackerConfig::from(&monitor_config));
    tracker.attach(bus.clone());

    if monitor_config.input_listener && !args.stdin {
        if let Err(e) = InputListener::spawn(bus.clone()) {
            msg_warning!(Message::InputListenerFailed(e.to_string()));
        }
    }

    let quiet = args.quiet;
    tracker.start(session_id.clone(), move |event: &MonitorEvent| {
        if let Some(recorder) = recorder.as_mut() {
            recorder.on_event(event);
        }
        if !quiet {
            announce(event);
        }
    });
    msg_info!(Message::MonitorStarted(session_id.clone()));

    let result = run_until_shutdown(&tracker, args.stdin).await;

    tracker.stop();
    let stats = tracker.stats();
    tracker.dispose();
    msg_success!(Message::MonitorStopped, true);

    View::stats(&stats).printstd();
    msg_print!(Message::EngagementScore(engagement_score_for(&stats)));

    match stats.save_last() {
        Ok(path) => msg_info!(Message::SessionSaved(path.display().to_string())),
        Err(e) => msg_error!(Message::SessionSaveFailed(e.to_string())),
    }

    if let Some(handle) = recorder_handle {
        let (summary, ended) = handle.close().await;
        msg_info!(Message::RecordingSummary(summary.sent, summary.failed));
        if let Err(e) = ended {
            msg_warning!(Message::ApiSessionEndFailed(e.to_string()));
        }
    }

    result
}

/// Feeds stdin signals to the tracker until EOF, Ctrl+C or SIGTERM.
async fn run_until_shutdown(tracker: &Tracker, stdin: bool) -> Result<()> {
    let mut lines = stdin.then(|| {
        msg_info!(Message::WatcherReadingStdin);
        BufReader::new(tokio::io::stdin()).lines()
    });

    let shutdown = wait_for_shutdown();
    tokio::pin!(shutdown);

    loop {
        let next_line = async {
            match lines.as_mut() {
                Some(lines) => lines.next_line().await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            result = &mut shutdown => return result,
            line = next_line => match line? {
                Some(line) => match parse_signal_line(&line) {
                    Some(Ok(signal)) => tracker.handle_signal(signal),
                    Some(Err(e)) => msg_warning!(Message::InvalidSignal(e.to_string())),
                    None => {}
                },
                None => return Ok(()),
            },
        }
    }
}

#[cfg(unix)]
async fn wait_for_shutdown() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = sigterm.recv() => msg_info!(Message::WatcherReceivedSigterm),
        result = tokio::signal::ctrl_c() => {
            result?;
            msg_info!(Message::WatcherReceivedCtrlC);
        }
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    msg_info!(Message::WatcherReceivedCtrlC);
    Ok(())
}

fn announce(event: &MonitorEvent) {
    match &event.kind {
        EventKind::TabSwitch { hidden: true } => msg_warning!(Message::TabHidden),
        EventKind::TabSwitch { hidden: false } => msg_print!(Message::TabVisible),
        EventKind::FocusLost => msg_warning!(Message::FocusLostNotice),
        EventKind::FocusGained => msg_print!(Message::FocusRegained),
        EventKind::TimeUpdate { total_time, active_time } => {
            msg_print!(Message::ElapsedTime(format_time(*total_time), format_time(*active_time)))
        }
    }
}


//! Remote Console
//!
//! Drives a `RemoteSynchronizer` from text lines and logs every snapshot the
//! host sends back.

pub mod commands;

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

pub use commands::{parse_command, CommandParseError, RemoteInput};

use crate::application::{RemoteSynchronizer, RemoteUpdate};
use crate::config::Settings;
use crate::domain::SessionSnapshot;
use crate::infrastructure::transport::WebSocketTransport;

enum Step {
    Line(Option<String>),
    Update(Option<RemoteUpdate>),
}

/// Connect to the host at `remote.host_url` and read commands from stdin.
pub async fn run_remote(settings: &Settings, code: &str) -> anyhow::Result<()> {
    let transport = Arc::new(WebSocketTransport::new(settings.remote.host_url.clone()));
    let mut remote = RemoteSynchronizer::from_settings(settings, transport);

    remote.connect(code).await?;
    info!(host_url = %settings.remote.host_url, "Remote ready, type a command");

    run_console(&mut remote, BufReader::new(tokio::io::stdin())).await
}

/// Forward parsed lines to the host until input ends, `quit` is read, or the
/// link goes away.
pub async fn run_console<R>(remote: &mut RemoteSynchronizer, input: R) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    loop {
        let step = tokio::select! {
            line = lines.next_line() => Step::Line(line?),
            update = remote.next_update() => Step::Update(update),
        };

        match step {
            Step::Line(None) => break,
            Step::Line(Some(line)) => match parse_command(&line) {
                Ok(Some(RemoteInput::Send(message))) => {
                    let kind = message.kind();
                    if !remote.send_command(message) {
                        warn!(kind = %kind, "Command not sent");
                    }
                }
                Ok(Some(RemoteInput::Quit)) => break,
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Ignoring input"),
            },
            Step::Update(Some(RemoteUpdate::Snapshot(snapshot))) => log_snapshot(&snapshot),
            Step::Update(Some(RemoteUpdate::Disconnected)) | Step::Update(None) => {
                info!("Host went away");
                return Ok(());
            }
            Step::Update(Some(RemoteUpdate::Failed(e))) => return Err(e.into()),
        }
    }

    remote.disconnect();
    Ok(())
}

fn log_snapshot(snapshot: &SessionSnapshot) {
    let topic = snapshot
        .config
        .as_ref()
        .and_then(|c| c.topic.as_deref())
        .unwrap_or("");
    let segment = snapshot
        .active_segment()
        .map(|s| s.current.title)
        .unwrap_or_default();

    info!(
        status = %snapshot.status,
        clock = %snapshot.clock_display(),
        overtime = snapshot.is_overtime(),
        topic = topic,
        segment = %segment,
        "Host state"
    );
}

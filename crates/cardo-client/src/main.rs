//! Console client for a synchronized Cardo store.
//!
//! Starts a [`Session`] against the configured server with the seed state,
//! then reads commands from stdin until `quit` or end of input.
//!
//! # Architecture
//!
//! ```text
//! stdin --> commands::parse --> Session::dispatch --> store + outbound sync
//!                                                        ^
//!                                   GET /sse stream -----/
//! ```

mod commands;
mod error;

use cardo_store::{Action, State};
use cardo_sync::{Session, SyncConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::commands::{Command, USAGE};
use crate::error::ClientError;

/// Application entry point.
///
/// Initializes logging, loads configuration from environment variables,
/// starts the session, and runs the command loop.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the session cannot start,
/// or stdin cannot be read.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they do not interleave with command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("cardo-client starting");

    let config = SyncConfig::from_env()?;
    info!(
        server_url = config.server_url,
        request_timeout_ms = config.request_timeout.as_millis(),
        max_retries = config.retry.max_retries,
        "configuration loaded"
    );

    let session = Session::start(&config, State::seeded())?;
    println!("{USAGE}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match commands::parse(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => {
                if let Err(e) = run(&session, command).await {
                    eprintln!("error: {e}");
                }
            }
            Ok(None) => {}
            Err(e) => eprintln!("error: {e}"),
        }
    }

    info!("shutting down");
    session.shutdown().await;
    Ok(())
}

/// Execute one parsed command against the session.
async fn run(session: &Session, command: Command) -> Result<(), ClientError> {
    match command {
        Command::Dispatch(action) => session.dispatch(action).await?,
        Command::Named { name, payload } => session.dispatch_named(&name, payload).await?,
        Command::Dismiss(index) => {
            let alert = session
                .read(|state| state.alerts_list().get(index).cloned())
                .await
                .ok_or(ClientError::NoSuchAlert(index))?;
            session.dispatch(Action::RemoveAlert(alert)).await?;
        }
        Command::Show(projection) => {
            let value = session.project(&projection).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::Help => println!("{USAGE}"),
        Command::Quit => {}
    }
    Ok(())
}

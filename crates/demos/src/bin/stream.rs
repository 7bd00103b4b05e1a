//! Durable stream example: provision a per-seat log and cursor, then run the
//! interactive poll-ack loop over it.
//!
//! Keyboard controls while the loop runs: `p` toggles pause, `q`, escape or
//! ctrl-c terminates.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::path::PathBuf;

use clap::Parser;
use fleetline_demos::Credentials;
use fleetline_messaging_nats::stream::{NatsStream, NatsStreamOptions};
use fleetline_poller::keys::{KeysError, TerminalKeys};
use fleetline_poller::poll_loop::{PollLoop, PollLoopOptions};
use fleetline_poller::provision::provision;
use fleetline_poller::sink::StdoutSink;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// The subject filter captured into the per-seat log.
const POSITION_SUBJECT: &str = "example.*.position";

#[derive(Debug, thiserror::Error)]
enum Error {
    /// Credentials error
    #[error(transparent)]
    Config(#[from] fleetline_demos::config::Error),

    /// Keyboard capture error
    #[error(transparent)]
    Keys(#[from] KeysError),

    /// Stream or cursor provisioning error
    #[error(transparent)]
    Provision(#[from] fleetline_messaging_nats::stream::Error),
}

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maximum records per fetch call
    #[arg(long, default_value_t = 1)]
    batch: usize,

    /// Env file to load credentials from
    #[arg(long, default_value = ".env", env = "FLEETLINE_ENV_FILE")]
    env_file: PathBuf,
}

async fn run(args: Args) -> Result<(), Error> {
    let credentials = Credentials::load(&args.env_file)?;
    let client = credentials.connect().await?;

    let consumer = provision::<NatsStream>(
        &credentials.user,
        POSITION_SUBJECT,
        NatsStreamOptions { client },
    )
    .await?;

    let keys = TerminalKeys::new()?;

    let token = CancellationToken::new();
    tokio::spawn(handle_signals(token.clone()));

    info!("press 'p' to pause, 'q' or ctrl-c to exit");

    let options = PollLoopOptions {
        batch: args.batch,
        ..Default::default()
    };

    let summary = PollLoop::new(consumer, keys, StdoutSink, options)
        .with_cancellation_token(token)
        .run()
        .await;

    info!(emitted = summary.emitted, "loop finished");

    Ok(())
}

#[cfg(unix)]
async fn handle_signals(token: CancellationToken) {
    let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
    {
        Ok(signal) => signal,
        Err(e) => {
            error!(error = %e, "failed to install SIGTERM handler");
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM"),
        _ = tokio::signal::ctrl_c() => info!("received SIGINT"),
    }

    token.cancel();
}

#[cfg(not(unix))]
async fn handle_signals(token: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for ctrl-c");
        return;
    }

    info!("received ctrl-c");
    token.cancel();
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run(Args::parse()).await {
        error!(error = %e, "error running");
        std::process::exit(1);
    }
}

//! Core pub/sub example: subscribe to position reports and print them.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::path::PathBuf;

use clap::Parser;
use fleetline_demos::Credentials;
use futures::StreamExt;
use tracing::{error, info};

/// The subject filter every vehicle publishes its position under.
const POSITION_SUBJECT: &str = "example.*.position";

#[derive(Debug, thiserror::Error)]
enum Error {
    /// Credentials error
    #[error(transparent)]
    Config(#[from] fleetline_demos::config::Error),

    /// Subscribe error
    #[error("Failed to subscribe to {POSITION_SUBJECT}: {0}")]
    Subscribe(#[from] async_nats::SubscribeError),
}

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Env file to load credentials from
    #[arg(long, default_value = ".env", env = "FLEETLINE_ENV_FILE")]
    env_file: PathBuf,
}

async fn run(args: Args) -> Result<(), Error> {
    let credentials = Credentials::load(&args.env_file)?;
    let client = credentials.connect().await?;

    info!("subscribing to {POSITION_SUBJECT}");
    let mut subscriber = client.subscribe(POSITION_SUBJECT).await?;

    while let Some(message) = subscriber.next().await {
        println!(
            "received message subject={} data={}",
            message.subject,
            String::from_utf8_lossy(&message.payload),
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run(Args::parse()).await {
        error!(error = %e, "error running");
        std::process::exit(1);
    }
}

//! Core pub/sub example: publish a random position report for this seat.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::path::PathBuf;

use clap::Parser;
use fleetline_demos::Credentials;
use rand::Rng;
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
enum Error {
    /// Credentials error
    #[error(transparent)]
    Config(#[from] fleetline_demos::config::Error),

    /// Flush error
    #[error("Failed to flush: {0}")]
    Flush(String),

    /// Publish error
    #[error("Failed to publish: {0}")]
    Publish(async_nats::client::PublishErrorKind),
}

impl From<async_nats::client::PublishError> for Error {
    fn from(error: async_nats::client::PublishError) -> Self {
        Self::Publish(error.kind())
    }
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

    let subject = format!("example.{}.position", credentials.user);
    let payload = random_position();

    info!("publishing to {subject}: {payload}");
    client.publish(subject, payload.into()).await?;
    client
        .flush()
        .await
        .map_err(|e| Error::Flush(e.to_string()))?;

    Ok(())
}

/// A plausible latitude/longitude pair, as the wire payload.
fn random_position() -> String {
    let mut rng = rand::thread_rng();
    let lat: f64 = rng.gen_range(-90.0..90.0);
    let lon: f64 = rng.gen_range(-180.0..180.0);

    format!("{lat:.5},{lon:.5}")
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run(Args::parse()).await {
        error!(error = %e, "error running");
        std::process::exit(1);
    }
}

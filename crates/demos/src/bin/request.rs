//! Request/reply example: ping the service and print whatever comes back.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::path::PathBuf;

use bytes::Bytes;
use clap::Parser;
use fleetline_demos::Credentials;
use tracing::{error, info};

/// The subject the ping service listens on.
const PING_SUBJECT: &str = "service.ping";

#[derive(Debug, thiserror::Error)]
enum Error {
    /// Credentials error
    #[error(transparent)]
    Config(#[from] fleetline_demos::config::Error),

    /// Request error
    #[error("Failed to request {PING_SUBJECT}: {0}")]
    Request(async_nats::RequestErrorKind),
}

impl From<async_nats::RequestError> for Error {
    fn from(error: async_nats::RequestError) -> Self {
        Self::Request(error.kind())
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

    info!("requesting {PING_SUBJECT}");
    let reply = client.request(PING_SUBJECT, Bytes::new()).await?;

    println!("received reply: {}", String::from_utf8_lossy(&reply.payload));

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

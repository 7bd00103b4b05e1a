//! Request/reply example: answer pings addressed to this seat with "pong".
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::path::PathBuf;

use clap::Parser;
use fleetline_demos::Credentials;
use futures::StreamExt;
use tracing::{error, info, warn};

#[derive(Debug, thiserror::Error)]
enum Error {
    /// Credentials error
    #[error(transparent)]
    Config(#[from] fleetline_demos::config::Error),

    /// Publish error
    #[error("Failed to publish reply: {0}")]
    Publish(async_nats::client::PublishErrorKind),

    /// Subscribe error
    #[error("Failed to subscribe: {0}")]
    Subscribe(#[from] async_nats::SubscribeError),
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

    let subject = format!("service.ping.{}", credentials.user);

    info!("answering pings on {subject}");
    let mut subscriber = client.subscribe(subject).await?;

    while let Some(message) = subscriber.next().await {
        let Some(reply) = message.reply else {
            warn!(subject = %message.subject, "ping carried no reply subject, dropping");
            continue;
        };

        println!("received ping, replying to {reply}");
        client.publish(reply, "pong".into()).await?;
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

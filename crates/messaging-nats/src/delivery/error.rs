use fleetline_messaging::delivery::DeliveryError;
use thiserror::Error;

/// Errors that can occur on a delivered JetStream message.
#[derive(Debug, Error)]
pub enum Error {
    /// Acknowledgment error.
    #[error("Failed to ack message: {0}")]
    Ack(String),

    /// Metadata parse error.
    #[error("Failed to read message metadata: {0}")]
    Metadata(String),
}

impl DeliveryError for Error {}

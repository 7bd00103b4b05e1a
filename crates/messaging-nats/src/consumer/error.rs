use fleetline_messaging::consumer::ConsumerError;
use thiserror::Error;

/// Errors that can occur on a NATS consumer.
#[derive(Debug, Error)]
pub enum Error {
    /// Batch request error.
    #[error("Failed to start fetch: {0}")]
    Batch(async_nats::jetstream::consumer::pull::BatchErrorKind),

    /// Consumer info error.
    #[error("Failed to get consumer info: {0}")]
    Info(async_nats::jetstream::context::RequestErrorKind),

    /// Consumer messages error.
    #[error("Failed to get consumer messages: {0}")]
    Messages(async_nats::Error),
}

impl ConsumerError for Error {}

use fleetline_messaging::stream::StreamError;
use thiserror::Error;

/// Errors that can occur on a NATS stream.
#[derive(Debug, Error)]
pub enum Error {
    /// Stream create error.
    #[error("Failed to create stream: {0}")]
    Create(async_nats::jetstream::context::CreateStreamErrorKind),

    /// Consumer create error.
    #[error("Failed to create consumer: {0}")]
    CreateConsumer(async_nats::jetstream::stream::ConsumerErrorKind),

    /// Publish error.
    #[error("Failed to publish: {0}")]
    Publish(async_nats::jetstream::context::PublishErrorKind),

    /// Stream info error.
    #[error("Failed to get stream info: {0}")]
    StreamInfo(async_nats::jetstream::context::RequestErrorKind),
}

impl StreamError for Error {}

use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;

/// Marker trait for delivery errors
pub trait DeliveryError: Error + Send + Sync + 'static {}

/// Sequence metadata attached to a delivered record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DeliveryInfo {
    /// Position of the record within the stream.
    pub stream_sequence: u64,

    /// Position of the delivery for this consumer.
    pub consumer_sequence: u64,
}

/// A single record delivered from a stream to a consumer.
#[async_trait]
pub trait Delivery
where
    Self: Debug + Send + Sync + 'static,
{
    /// The error type for metadata reads and acknowledgment.
    type Error: DeliveryError;

    /// The subject the record was published under.
    fn subject(&self) -> &str;

    /// The record payload.
    fn payload(&self) -> &Bytes;

    /// Sequence metadata for the record.
    fn info(&self) -> Result<DeliveryInfo, Self::Error>;

    /// Acknowledges the record, advancing the consumer's effective position.
    ///
    /// Acknowledgment is one-way; an unacknowledged record may be redelivered
    /// by the broker after its delivery deadline expires.
    async fn ack(&self) -> Result<(), Self::Error>;
}

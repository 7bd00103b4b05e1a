use crate::consumer::{Consumer, DeliverPolicy};

use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;

/// Marker trait for stream errors
pub trait StreamError: Error + Send + Sync + 'static {}

/// Marker trait for stream options
pub trait StreamOptions: Clone + Debug + Send + Sync + 'static {}

/// A trait representing a named durable log of records.
#[async_trait]
pub trait Stream
where
    Self: Clone + Debug + Send + Sync + 'static,
{
    /// The error type for the stream.
    type Error: StreamError;

    /// The options for the stream.
    type Options: StreamOptions;

    /// The consumer type attachable to the stream.
    type Consumer: Consumer;

    /// Creates the stream if absent, otherwise attaches to the existing one.
    ///
    /// Idempotent by name: attaching to an existing stream must not destroy
    /// or duplicate the records it already holds. The broker may reject a
    /// name collision with an incompatible subject filter.
    async fn ensure<N>(
        name: N,
        subjects: Vec<String>,
        options: Self::Options,
    ) -> Result<Self, Self::Error>
    where
        N: Clone + Into<String> + Send;

    /// Creates or updates a durable consumer attached to this stream.
    ///
    /// An existing consumer with the same durable name resumes from its last
    /// acknowledged position; `deliver_policy` only applies on first creation.
    async fn ensure_consumer<N>(
        &self,
        durable_name: N,
        deliver_policy: DeliverPolicy,
    ) -> Result<Self::Consumer, Self::Error>
    where
        N: Clone + Into<String> + Send;

    /// Appends a record to the stream, returning its sequence number.
    async fn publish(&self, subject: String, payload: Bytes) -> Result<u64, Self::Error>;

    /// The last sequence number in the stream.
    async fn last_seq(&self) -> Result<u64, Self::Error>;

    /// Returns the name of the stream.
    fn name(&self) -> String;
}

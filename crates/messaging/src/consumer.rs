use crate::delivery::Delivery;

use std::error::Error;
use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

/// Marker trait for consumer errors
pub trait ConsumerError: Error + Send + Sync + 'static {}

/// Where a newly created consumer begins reading in a stream's history.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DeliverPolicy {
    /// Deliver every record from the beginning of the stream.
    #[default]
    All,

    /// Deliver only records appended after the consumer was created.
    New,
}

/// A trait representing a durable cursor over a stream.
///
/// The cursor's position lives on the broker side and survives process
/// restarts; dropping a consumer handle never discards progress.
#[async_trait]
pub trait Consumer
where
    Self: Clone + Debug + Send + Sync + 'static,
{
    /// The error type for the consumer.
    type Error: ConsumerError;

    /// The delivery type handed out by fetches.
    type Delivery: Delivery;

    /// Pulls up to `max_records` undelivered records, waiting at most `wait`.
    ///
    /// Returns a finite batch (possibly empty) in stream order; never blocks
    /// past `wait`.
    async fn fetch(
        &self,
        max_records: usize,
        wait: Duration,
    ) -> Result<Vec<Self::Delivery>, Self::Error>;

    /// The highest stream sequence acknowledged on this consumer.
    async fn ack_floor(&self) -> Result<u64, Self::Error>;
}

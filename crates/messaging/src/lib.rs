//! Abstract interface for durable log-based messaging.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Consumers are durable cursors over streams.
pub mod consumer;

/// Deliveries are single records handed to a consumer.
pub mod delivery;

/// Streams are persistent, ordered, and append-only sequences of records.
pub mod stream;

pub use consumer::{Consumer, ConsumerError, DeliverPolicy};
pub use delivery::{Delivery, DeliveryError, DeliveryInfo};
pub use stream::{Stream, StreamError, StreamOptions};

//! In-process implementation of the messaging interfaces.
//!
//! Streams and consumers live behind an explicit [`MemoryBroker`] handle so
//! tests and offline runs can exercise the full provisioning and fetch-ack
//! flow without a running broker. Broker-side redelivery timers are not
//! modelled.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod broker;

/// Consumers are durable cursors over in-memory streams.
pub mod consumer;

/// Deliveries are single records handed to a consumer.
pub mod delivery;

/// Streams are in-memory durable logs.
pub mod stream;

pub use broker::MemoryBroker;
pub use consumer::MemoryConsumer;
pub use delivery::MemoryDelivery;
pub use stream::{MemoryStream, MemoryStreamOptions};

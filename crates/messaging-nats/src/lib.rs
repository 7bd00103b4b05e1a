//! NATS JetStream implementation of the messaging interfaces.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Consumers are durable JetStream pull consumers.
pub mod consumer;

/// Deliveries wrap JetStream messages.
pub mod delivery;

/// Streams are JetStream streams.
pub mod stream;

pub use consumer::NatsConsumer;
pub use delivery::NatsDelivery;
pub use stream::{NatsStream, NatsStreamOptions};

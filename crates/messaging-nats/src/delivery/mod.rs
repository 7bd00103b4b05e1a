mod error;

pub use error::Error;

use async_nats::jetstream::Message as NatsMessage;
use async_trait::async_trait;
use bytes::Bytes;
use fleetline_messaging::delivery::{Delivery, DeliveryInfo};

/// A record delivered from a JetStream stream.
#[derive(Debug)]
pub struct NatsDelivery {
    message: NatsMessage,
}

impl NatsDelivery {
    pub(crate) const fn new(message: NatsMessage) -> Self {
        Self { message }
    }
}

#[async_trait]
impl Delivery for NatsDelivery {
    type Error = Error;

    fn subject(&self) -> &str {
        self.message.subject.as_str()
    }

    fn payload(&self) -> &Bytes {
        &self.message.payload
    }

    fn info(&self) -> Result<DeliveryInfo, Self::Error> {
        let info = self
            .message
            .info()
            .map_err(|e| Error::Metadata(e.to_string()))?;

        Ok(DeliveryInfo {
            stream_sequence: info.stream_sequence,
            consumer_sequence: info.consumer_sequence,
        })
    }

    async fn ack(&self) -> Result<(), Self::Error> {
        self.message
            .ack()
            .await
            .map_err(|e| Error::Ack(e.to_string()))
    }
}

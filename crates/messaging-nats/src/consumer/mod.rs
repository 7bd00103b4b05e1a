mod error;

pub use error::Error;

use crate::delivery::NatsDelivery;

use std::time::Duration;

use async_nats::jetstream::consumer::pull::Config as NatsConsumerConfig;
use async_nats::jetstream::consumer::Consumer as NatsConsumerType;
use async_trait::async_trait;
use fleetline_messaging::consumer::Consumer;
use futures::StreamExt;

/// A NATS durable pull consumer.
#[derive(Clone, Debug)]
pub struct NatsConsumer {
    durable_name: String,
    nats_consumer: NatsConsumerType<NatsConsumerConfig>,
}

impl NatsConsumer {
    pub(crate) const fn new(
        durable_name: String,
        nats_consumer: NatsConsumerType<NatsConsumerConfig>,
    ) -> Self {
        Self {
            durable_name,
            nats_consumer,
        }
    }

    /// The durable name of the consumer.
    #[must_use]
    pub fn durable_name(&self) -> &str {
        &self.durable_name
    }
}

#[async_trait]
impl Consumer for NatsConsumer {
    type Error = Error;

    type Delivery = NatsDelivery;

    async fn fetch(
        &self,
        max_records: usize,
        wait: Duration,
    ) -> Result<Vec<Self::Delivery>, Self::Error> {
        let mut messages = self
            .nats_consumer
            .fetch()
            .max_messages(max_records)
            .expires(wait)
            .messages()
            .await
            .map_err(|e| Error::Batch(e.kind()))?;

        let mut batch = Vec::with_capacity(max_records);
        while let Some(message) = messages.next().await {
            let message = message.map_err(Error::Messages)?;
            batch.push(NatsDelivery::new(message));
        }

        Ok(batch)
    }

    async fn ack_floor(&self) -> Result<u64, Self::Error> {
        let seq = self
            .nats_consumer
            .clone()
            .info()
            .await
            .map_err(|e| Error::Info(e.kind()))?
            .ack_floor
            .stream_sequence;

        Ok(seq)
    }
}

mod error;

pub use error::Error;

use crate::consumer::NatsConsumer;

use async_nats::jetstream::consumer::DeliverPolicy as NatsDeliverPolicy;
use async_nats::jetstream::consumer::pull::Config as NatsConsumerConfig;
use async_nats::jetstream::stream::{Config as NatsStreamConfig, Stream as NatsStreamType};
use async_nats::jetstream::Context as JetStreamContext;
use async_nats::Client as AsyncNatsClient;
use async_trait::async_trait;
use bytes::Bytes;
use fleetline_messaging::consumer::DeliverPolicy;
use fleetline_messaging::stream::{Stream, StreamOptions};
use tracing::debug;

/// Options for the NATS stream.
#[derive(Clone, Debug)]
pub struct NatsStreamOptions {
    /// The NATS client.
    pub client: AsyncNatsClient,
}
impl StreamOptions for NatsStreamOptions {}

/// A NATS JetStream stream.
#[derive(Clone, Debug)]
pub struct NatsStream {
    jetstream_context: JetStreamContext,
    name: String,
    nats_stream: NatsStreamType,
}

const fn nats_deliver_policy(deliver_policy: DeliverPolicy) -> NatsDeliverPolicy {
    match deliver_policy {
        DeliverPolicy::All => NatsDeliverPolicy::All,
        DeliverPolicy::New => NatsDeliverPolicy::New,
    }
}

#[async_trait]
impl Stream for NatsStream {
    type Error = Error;

    type Options = NatsStreamOptions;

    type Consumer = NatsConsumer;

    async fn ensure<N>(
        name: N,
        subjects: Vec<String>,
        options: Self::Options,
    ) -> Result<Self, Self::Error>
    where
        N: Clone + Into<String> + Send,
    {
        let name = name.into();
        let jetstream_context = async_nats::jetstream::new(options.client);

        // get_or_create is idempotent by name; an existing stream keeps its
        // records and the server rejects an incompatible configuration.
        let nats_stream = jetstream_context
            .get_or_create_stream(NatsStreamConfig {
                name: name.clone(),
                subjects,
                ..Default::default()
            })
            .await
            .map_err(|e| Error::Create(e.kind()))?;

        debug!(stream = name, "stream ensured");

        Ok(Self {
            jetstream_context,
            name,
            nats_stream,
        })
    }

    async fn ensure_consumer<N>(
        &self,
        durable_name: N,
        deliver_policy: DeliverPolicy,
    ) -> Result<Self::Consumer, Self::Error>
    where
        N: Clone + Into<String> + Send,
    {
        let durable_name = durable_name.into();

        // An existing durable consumer is returned as-is; the deliver policy
        // only takes effect on first creation, so re-attaching never resets
        // the cursor position.
        let nats_consumer = self
            .nats_stream
            .get_or_create_consumer(
                durable_name.as_str(),
                NatsConsumerConfig {
                    durable_name: Some(durable_name.clone()),
                    deliver_policy: nats_deliver_policy(deliver_policy),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| Error::CreateConsumer(e.kind()))?;

        debug!(stream = self.name, durable_name, "consumer ensured");

        Ok(NatsConsumer::new(durable_name, nats_consumer))
    }

    async fn publish(&self, subject: String, payload: Bytes) -> Result<u64, Self::Error> {
        let seq = self
            .jetstream_context
            .publish(subject, payload)
            .await
            .map_err(|e| Error::Publish(e.kind()))?
            .await
            .map_err(|e| Error::Publish(e.kind()))?
            .sequence;

        Ok(seq)
    }

    async fn last_seq(&self) -> Result<u64, Self::Error> {
        Ok(self
            .nats_stream
            .clone()
            .info()
            .await
            .map_err(|e| Error::StreamInfo(e.kind()))?
            .state
            .last_sequence)
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

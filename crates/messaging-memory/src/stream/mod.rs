mod error;

pub use error::Error;

use crate::broker::{subject_matches, CursorState, MemoryBroker, StoredRecord, StreamState};
use crate::consumer::MemoryConsumer;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use fleetline_messaging::consumer::DeliverPolicy;
use fleetline_messaging::stream::{Stream, StreamOptions};
use tokio::sync::Mutex;
use tracing::debug;

/// Options for the in-memory stream.
#[derive(Clone, Debug)]
pub struct MemoryStreamOptions {
    /// The broker holding the stream state.
    pub broker: MemoryBroker,
}
impl StreamOptions for MemoryStreamOptions {}

/// An in-memory stream.
#[derive(Clone, Debug)]
pub struct MemoryStream {
    name: String,
    state: Arc<Mutex<StreamState>>,
}

#[async_trait]
impl Stream for MemoryStream {
    type Error = Error;

    type Options = MemoryStreamOptions;

    type Consumer = MemoryConsumer;

    async fn ensure<N>(
        name: N,
        subjects: Vec<String>,
        options: Self::Options,
    ) -> Result<Self, Self::Error>
    where
        N: Clone + Into<String> + Send,
    {
        let name = name.into();

        let state = options
            .broker
            .stream_state(&name, &subjects)
            .await
            .ok_or_else(|| Error::SubjectConflict(name.clone()))?;

        Ok(Self { name, state })
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
        let mut state = self.state.lock().await;

        let start = match deliver_policy {
            DeliverPolicy::All => 0,
            DeliverPolicy::New => state.records.len() as u64,
        };

        let cursor = state
            .consumers
            .entry(durable_name.clone())
            .or_insert_with(|| {
                debug!(durable_name, "creating consumer");
                Arc::new(Mutex::new(CursorState {
                    delivered: start,
                    delivered_count: 0,
                    acked: start,
                }))
            })
            .clone();

        Ok(MemoryConsumer::new(
            durable_name,
            self.state.clone(),
            cursor,
        ))
    }

    async fn publish(&self, subject: String, payload: Bytes) -> Result<u64, Self::Error> {
        let mut state = self.state.lock().await;

        if !state.subjects.iter().any(|f| subject_matches(f, &subject)) {
            return Err(Error::NoMatchingSubject {
                stream: self.name.clone(),
                subject,
            });
        }

        let sequence = state.records.len() as u64 + 1;
        state.records.push(StoredRecord {
            subject,
            payload,
            sequence,
        });

        Ok(sequence)
    }

    async fn last_seq(&self) -> Result<u64, Self::Error> {
        Ok(self.state.lock().await.records.len() as u64)
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

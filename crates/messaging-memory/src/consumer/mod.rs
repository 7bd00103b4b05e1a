mod error;

pub use error::Error;

use crate::broker::{CursorState, StreamState};
use crate::delivery::MemoryDelivery;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fleetline_messaging::consumer::Consumer;
use tokio::sync::Mutex;

/// An in-memory durable consumer.
#[derive(Clone, Debug)]
pub struct MemoryConsumer {
    durable_name: String,
    stream: Arc<Mutex<StreamState>>,
    cursor: Arc<Mutex<CursorState>>,
}

impl MemoryConsumer {
    pub(crate) const fn new(
        durable_name: String,
        stream: Arc<Mutex<StreamState>>,
        cursor: Arc<Mutex<CursorState>>,
    ) -> Self {
        Self {
            durable_name,
            stream,
            cursor,
        }
    }

    /// The durable name of the consumer.
    #[must_use]
    pub fn durable_name(&self) -> &str {
        &self.durable_name
    }

    async fn take_batch(&self, max_records: usize) -> Vec<MemoryDelivery> {
        let stream = self.stream.lock().await;
        let mut cursor = self.cursor.lock().await;

        let mut batch = Vec::new();
        for record in &stream.records {
            if batch.len() == max_records {
                break;
            }
            if record.sequence <= cursor.delivered {
                continue;
            }

            cursor.delivered = record.sequence;
            cursor.delivered_count += 1;

            batch.push(MemoryDelivery::new(
                record.clone(),
                cursor.delivered_count,
                self.cursor.clone(),
            ));
        }

        batch
    }
}

#[async_trait]
impl Consumer for MemoryConsumer {
    type Error = Error;

    type Delivery = MemoryDelivery;

    async fn fetch(
        &self,
        max_records: usize,
        wait: Duration,
    ) -> Result<Vec<Self::Delivery>, Self::Error> {
        let batch = self.take_batch(max_records).await;
        if !batch.is_empty() || wait.is_zero() {
            return Ok(batch);
        }

        // Nothing pending; honor the bounded wait once and look again.
        tokio::time::sleep(wait).await;
        Ok(self.take_batch(max_records).await)
    }

    async fn ack_floor(&self) -> Result<u64, Self::Error> {
        Ok(self.cursor.lock().await.acked)
    }
}

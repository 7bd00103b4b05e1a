mod error;

pub use error::Error;

use crate::broker::{CursorState, StoredRecord};

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use fleetline_messaging::delivery::{Delivery, DeliveryInfo};
use tokio::sync::Mutex;

/// A record delivered from an in-memory stream.
#[derive(Clone, Debug)]
pub struct MemoryDelivery {
    record: StoredRecord,
    consumer_sequence: u64,
    cursor: Arc<Mutex<CursorState>>,
}

impl MemoryDelivery {
    pub(crate) const fn new(
        record: StoredRecord,
        consumer_sequence: u64,
        cursor: Arc<Mutex<CursorState>>,
    ) -> Self {
        Self {
            record,
            consumer_sequence,
            cursor,
        }
    }
}

#[async_trait]
impl Delivery for MemoryDelivery {
    type Error = Error;

    fn subject(&self) -> &str {
        &self.record.subject
    }

    fn payload(&self) -> &Bytes {
        &self.record.payload
    }

    fn info(&self) -> Result<DeliveryInfo, Self::Error> {
        Ok(DeliveryInfo {
            stream_sequence: self.record.sequence,
            consumer_sequence: self.consumer_sequence,
        })
    }

    async fn ack(&self) -> Result<(), Self::Error> {
        let mut cursor = self.cursor.lock().await;
        cursor.acked = cursor.acked.max(self.record.sequence);

        Ok(())
    }
}

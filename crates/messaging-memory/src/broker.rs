use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Mutex;

/// A record held by an in-memory stream.
#[derive(Clone, Debug)]
pub(crate) struct StoredRecord {
    pub subject: String,
    pub payload: Bytes,
    pub sequence: u64,
}

/// Server-side position of a durable consumer.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CursorState {
    /// Last stream sequence handed out by a fetch.
    pub delivered: u64,

    /// Count of deliveries made on this consumer.
    pub delivered_count: u64,

    /// Highest acknowledged stream sequence.
    pub acked: u64,
}

#[derive(Debug)]
pub(crate) struct StreamState {
    pub subjects: Vec<String>,
    pub records: Vec<StoredRecord>,
    pub consumers: HashMap<String, Arc<Mutex<CursorState>>>,
}

/// A handle to a set of in-memory streams.
///
/// Cloning the handle shares the underlying state; passing it through stream
/// options replaces what a broker address would be for a real deployment.
#[derive(Clone, Debug, Default)]
pub struct MemoryBroker {
    streams: Arc<Mutex<HashMap<String, Arc<Mutex<StreamState>>>>>,
}

impl MemoryBroker {
    /// Creates an empty broker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn stream_state(
        &self,
        name: &str,
        subjects: &[String],
    ) -> Option<Arc<Mutex<StreamState>>> {
        let mut streams = self.streams.lock().await;

        if let Some(state) = streams.get(name) {
            let existing = state.lock().await.subjects.clone();
            if existing == subjects {
                return Some(state.clone());
            }
            return None;
        }

        let state = Arc::new(Mutex::new(StreamState {
            subjects: subjects.to_vec(),
            records: Vec::new(),
            consumers: HashMap::new(),
        }));
        streams.insert(name.to_string(), state.clone());

        Some(state)
    }
}

/// Matches a subject against a NATS-style filter pattern.
///
/// `*` matches exactly one token, `>` matches one or more trailing tokens.
pub(crate) fn subject_matches(filter: &str, subject: &str) -> bool {
    let mut filter_tokens = filter.split('.');
    let mut subject_tokens = subject.split('.');

    loop {
        match (filter_tokens.next(), subject_tokens.next()) {
            (Some(">"), Some(_)) => return true,
            (Some("*"), Some(_)) => {}
            (Some(f), Some(s)) if f == s => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}

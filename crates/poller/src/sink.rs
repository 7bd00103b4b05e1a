use std::error::Error;
use std::io::{self, Write};

use bytes::Bytes;

/// A record as emitted by the poll loop.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmittedRecord {
    /// The subject the record was published under.
    pub subject: String,

    /// Position of the record within the stream.
    pub stream_sequence: u64,

    /// The record payload.
    pub payload: Bytes,
}

/// An output sink for records emitted by the poll loop.
pub trait RecordSink: Send + 'static {
    /// The error type for the sink.
    type Error: Error + Send + Sync + 'static;

    /// Writes one record to the sink.
    fn emit(&mut self, record: &EmittedRecord) -> Result<(), Self::Error>;
}

/// Writes one line per record to standard output.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl RecordSink for StdoutSink {
    type Error = io::Error;

    fn emit(&mut self, record: &EmittedRecord) -> Result<(), Self::Error> {
        let mut stdout = io::stdout().lock();
        writeln!(
            stdout,
            "received record subject={} seq={} data={}",
            record.subject,
            record.stream_sequence,
            String::from_utf8_lossy(&record.payload),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stdout_sink_accepts_records() {
        let mut sink = StdoutSink;
        let record = EmittedRecord {
            subject: "example.v1.position".to_string(),
            stream_sequence: 1,
            payload: Bytes::from("47.37,8.54"),
        };

        sink.emit(&record).expect("Failed to emit");
    }
}

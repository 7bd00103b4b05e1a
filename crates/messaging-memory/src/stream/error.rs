use fleetline_messaging::stream::StreamError;
use thiserror::Error;

/// Error type for memory stream operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Stream already exists with a different subject filter.
    #[error("Stream {0} already exists with a different subject filter")]
    SubjectConflict(String),

    /// No configured subject filter matches the published subject.
    #[error("No subject filter on stream {stream} matches {subject}")]
    NoMatchingSubject {
        /// The stream name.
        stream: String,
        /// The rejected subject.
        subject: String,
    },
}

impl StreamError for Error {}

use fleetline_messaging::consumer::ConsumerError;
use thiserror::Error;

/// Error type for memory consumer operations (none can occur).
#[derive(Debug, Error)]
pub enum Error {}

impl ConsumerError for Error {}

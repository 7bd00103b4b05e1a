use fleetline_messaging::delivery::DeliveryError;
use thiserror::Error;

/// Error type for memory delivery operations (none can occur).
#[derive(Debug, Error)]
pub enum Error {}

impl DeliveryError for Error {}

//! Shared plumbing for the fleetline example binaries.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Broker credentials loaded from an env file.
pub mod config;

pub use config::Credentials;

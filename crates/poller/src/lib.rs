//! Interactive poll-ack loop over a durable stream consumer.
//!
//! [`provision`](provision::provision) sets up the durable stream and cursor
//! for a user; [`PollLoop`](poll_loop::PollLoop) then pulls records one
//! bounded batch at a time, acknowledging each, while watching a key-event
//! side channel for pause toggles and termination.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Key-event sources feeding loop commands.
pub mod keys;

/// The poll-ack loop itself.
pub mod poll_loop;

/// Idempotent stream and consumer provisioning.
pub mod provision;

/// Sinks receiving emitted records.
pub mod sink;

pub use keys::{KeySource, LoopCommand, TerminalKeys};
pub use poll_loop::{LoopSummary, PollLoop, PollLoopOptions};
pub use provision::{durable_name, provision, stream_name};
pub use sink::{EmittedRecord, RecordSink, StdoutSink};

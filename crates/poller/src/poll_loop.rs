use crate::keys::{KeySource, LoopCommand};
use crate::sink::{EmittedRecord, RecordSink};

use std::time::Duration;

use fleetline_messaging::consumer::Consumer;
use fleetline_messaging::delivery::Delivery;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Options for the poll loop.
#[derive(Clone, Copy, Debug)]
pub struct PollLoopOptions {
    /// Maximum records per fetch call.
    pub batch: usize,

    /// How long a fetch may wait on the broker for pending records.
    pub fetch_wait: Duration,

    /// Idle sleep when paused or when a fetch comes back empty.
    pub idle_wait: Duration,
}

impl Default for PollLoopOptions {
    fn default() -> Self {
        Self {
            batch: 1,
            fetch_wait: Duration::from_millis(100),
            idle_wait: Duration::from_millis(50),
        }
    }
}

/// What the loop did before exiting.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LoopSummary {
    /// Records emitted to the sink.
    pub emitted: u64,
}

/// The interactive poll-ack loop.
///
/// Each iteration drains the key source first, then either fetches a bounded
/// batch (running) or idles (paused). A pending pause toggle or termination
/// is therefore observed at most one iteration after the key press. Fetch,
/// ack, metadata and sink failures are isolated per iteration; only a
/// termination command or the cancellation token ends the loop.
#[derive(Debug)]
pub struct PollLoop<C, K, W>
where
    C: Consumer,
    K: KeySource,
    W: RecordSink,
{
    consumer: C,
    keys: K,
    sink: W,
    options: PollLoopOptions,
    cancellation_token: CancellationToken,
    paused: bool,
}

impl<C, K, W> PollLoop<C, K, W>
where
    C: Consumer,
    K: KeySource,
    W: RecordSink,
{
    /// Creates a loop over `consumer`, initially running (not paused).
    pub fn new(consumer: C, keys: K, sink: W, options: PollLoopOptions) -> Self {
        Self {
            consumer,
            keys,
            sink,
            options,
            cancellation_token: CancellationToken::new(),
            paused: false,
        }
    }

    /// Ties the loop to an externally cancellable token.
    #[must_use]
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    /// Runs until terminated by a key event or the cancellation token.
    pub async fn run(mut self) -> LoopSummary {
        let mut summary = LoopSummary::default();

        loop {
            match self.keys.poll() {
                Some(LoopCommand::Terminate) => {
                    info!("termination requested, exiting");
                    break;
                }
                Some(LoopCommand::TogglePause) => {
                    self.paused = !self.paused;
                    info!(paused = self.paused, "pause toggled");
                    continue;
                }
                None => {}
            }

            if self.cancellation_token.is_cancelled() {
                info!("cancelled, exiting");
                break;
            }

            if self.paused {
                sleep(self.options.idle_wait).await;
                continue;
            }

            let batch = match self
                .consumer
                .fetch(self.options.batch, self.options.fetch_wait)
                .await
            {
                Ok(batch) => batch,
                Err(e) => {
                    warn!(error = %e, "fetch failed");
                    continue;
                }
            };

            if batch.is_empty() {
                sleep(self.options.idle_wait).await;
                continue;
            }

            // Every record of this batch is acknowledged before the next
            // fetch call is issued.
            for delivery in batch {
                if let Err(e) = delivery.ack().await {
                    warn!(error = %e, "ack failed, record may be redelivered");
                }

                let delivery_info = match delivery.info() {
                    Ok(delivery_info) => delivery_info,
                    Err(e) => {
                        warn!(error = %e, "skipping record with unreadable metadata");
                        continue;
                    }
                };

                let record = EmittedRecord {
                    subject: delivery.subject().to_string(),
                    stream_sequence: delivery_info.stream_sequence,
                    payload: delivery.payload().clone(),
                };

                match self.sink.emit(&record) {
                    Ok(()) => summary.emitted += 1,
                    Err(e) => warn!(error = %e, "sink emit failed"),
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::EmittedRecord;

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use bytes::Bytes;
    use fleetline_messaging::consumer::DeliverPolicy;
    use fleetline_messaging::stream::Stream;
    use fleetline_messaging_memory::{
        MemoryBroker, MemoryConsumer, MemoryDelivery, MemoryStream, MemoryStreamOptions,
    };

    /// Key source driven by a script; terminates once the script runs out.
    struct ScriptedKeys {
        script: VecDeque<Option<LoopCommand>>,
    }

    impl ScriptedKeys {
        fn new(script: Vec<Option<LoopCommand>>) -> Self {
            Self {
                script: script.into(),
            }
        }
    }

    impl KeySource for ScriptedKeys {
        fn poll(&mut self) -> Option<LoopCommand> {
            self.script
                .pop_front()
                .unwrap_or(Some(LoopCommand::Terminate))
        }
    }

    /// Key source that never produces a command.
    struct SilentKeys;

    impl KeySource for SilentKeys {
        fn poll(&mut self) -> Option<LoopCommand> {
            None
        }
    }

    /// Sink collecting emitted records behind a shared handle.
    #[derive(Clone, Default)]
    struct VecSink {
        records: Arc<Mutex<Vec<EmittedRecord>>>,
    }

    impl RecordSink for VecSink {
        type Error = std::convert::Infallible;

        fn emit(&mut self, record: &EmittedRecord) -> Result<(), Self::Error> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    enum Op {
        Fetch,
        Ack(u64),
    }

    /// Consumer wrapper recording the interleaving of fetches and acks.
    #[derive(Clone, Debug)]
    struct RecordingConsumer {
        inner: MemoryConsumer,
        ops: Arc<Mutex<Vec<Op>>>,
    }

    #[derive(Debug)]
    struct RecordingDelivery {
        inner: MemoryDelivery,
        ops: Arc<Mutex<Vec<Op>>>,
    }

    #[async_trait]
    impl Consumer for RecordingConsumer {
        type Error = fleetline_messaging_memory::consumer::Error;
        type Delivery = RecordingDelivery;

        async fn fetch(
            &self,
            max_records: usize,
            wait: Duration,
        ) -> Result<Vec<Self::Delivery>, Self::Error> {
            self.ops.lock().unwrap().push(Op::Fetch);
            let batch = self.inner.fetch(max_records, wait).await?;

            Ok(batch
                .into_iter()
                .map(|inner| RecordingDelivery {
                    inner,
                    ops: self.ops.clone(),
                })
                .collect())
        }

        async fn ack_floor(&self) -> Result<u64, Self::Error> {
            self.inner.ack_floor().await
        }
    }

    #[async_trait]
    impl Delivery for RecordingDelivery {
        type Error = fleetline_messaging_memory::delivery::Error;

        fn subject(&self) -> &str {
            self.inner.subject()
        }

        fn payload(&self) -> &Bytes {
            self.inner.payload()
        }

        fn info(&self) -> Result<fleetline_messaging::delivery::DeliveryInfo, Self::Error> {
            self.inner.info()
        }

        async fn ack(&self) -> Result<(), Self::Error> {
            let seq = self.inner.info().unwrap().stream_sequence;
            self.inner.ack().await?;
            self.ops.lock().unwrap().push(Op::Ack(seq));

            Ok(())
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("injected failure")]
    struct InjectedError;

    impl fleetline_messaging::consumer::ConsumerError for InjectedError {}
    impl fleetline_messaging::delivery::DeliveryError for InjectedError {}

    /// Consumer whose first fetch fails, then delegates.
    #[derive(Clone, Debug)]
    struct FlakyFetchConsumer {
        inner: MemoryConsumer,
        failed: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Consumer for FlakyFetchConsumer {
        type Error = InjectedError;
        type Delivery = MemoryDelivery;

        async fn fetch(
            &self,
            max_records: usize,
            wait: Duration,
        ) -> Result<Vec<Self::Delivery>, Self::Error> {
            if !self.failed.swap(true, Ordering::SeqCst) {
                return Err(InjectedError);
            }

            Ok(self.inner.fetch(max_records, wait).await.unwrap())
        }

        async fn ack_floor(&self) -> Result<u64, Self::Error> {
            Ok(self.inner.ack_floor().await.unwrap())
        }
    }

    /// Delivery whose metadata read fails for one stream sequence.
    #[derive(Debug)]
    struct BrokenMetaDelivery {
        inner: MemoryDelivery,
        broken_seq: u64,
    }

    #[async_trait]
    impl Delivery for BrokenMetaDelivery {
        type Error = InjectedError;

        fn subject(&self) -> &str {
            self.inner.subject()
        }

        fn payload(&self) -> &Bytes {
            self.inner.payload()
        }

        fn info(&self) -> Result<fleetline_messaging::delivery::DeliveryInfo, Self::Error> {
            let info = self.inner.info().unwrap();
            if info.stream_sequence == self.broken_seq {
                return Err(InjectedError);
            }

            Ok(info)
        }

        async fn ack(&self) -> Result<(), Self::Error> {
            self.inner.ack().await.unwrap();

            Ok(())
        }
    }

    #[derive(Clone, Debug)]
    struct BrokenMetaConsumer {
        inner: MemoryConsumer,
        broken_seq: u64,
    }

    #[async_trait]
    impl Consumer for BrokenMetaConsumer {
        type Error = fleetline_messaging_memory::consumer::Error;
        type Delivery = BrokenMetaDelivery;

        async fn fetch(
            &self,
            max_records: usize,
            wait: Duration,
        ) -> Result<Vec<Self::Delivery>, Self::Error> {
            Ok(self
                .inner
                .fetch(max_records, wait)
                .await?
                .into_iter()
                .map(|inner| BrokenMetaDelivery {
                    inner,
                    broken_seq: self.broken_seq,
                })
                .collect())
        }

        async fn ack_floor(&self) -> Result<u64, Self::Error> {
            self.inner.ack_floor().await
        }
    }

    /// Sink that rejects one stream sequence and collects the rest.
    struct FailingSink {
        records: Arc<Mutex<Vec<EmittedRecord>>>,
        broken_seq: u64,
    }

    impl RecordSink for FailingSink {
        type Error = InjectedError;

        fn emit(&mut self, record: &EmittedRecord) -> Result<(), Self::Error> {
            if record.stream_sequence == self.broken_seq {
                return Err(InjectedError);
            }
            self.records.lock().unwrap().push(record.clone());

            Ok(())
        }
    }

    fn fast_options() -> PollLoopOptions {
        PollLoopOptions {
            batch: 1,
            fetch_wait: Duration::ZERO,
            idle_wait: Duration::from_millis(1),
        }
    }

    async fn seeded_consumer(records: usize) -> (MemoryStream, MemoryConsumer) {
        let stream = MemoryStream::ensure(
            "LOG_alice",
            vec!["example.*.position".to_string()],
            MemoryStreamOptions {
                broker: MemoryBroker::new(),
            },
        )
        .await
        .unwrap();

        for i in 1..=records {
            stream
                .publish(
                    "example.v1.position".to_string(),
                    Bytes::from(format!("report {i}")),
                )
                .await
                .unwrap();
        }

        let consumer = stream
            .ensure_consumer("cursor-alice", DeliverPolicy::All)
            .await
            .unwrap();

        (stream, consumer)
    }

    #[tokio::test]
    async fn emits_seeded_records_in_order_then_terminates() {
        let (_stream, consumer) = seeded_consumer(3).await;
        let sink = VecSink::default();
        let records = sink.records.clone();

        let keys = ScriptedKeys::new(vec![None, None, None]);
        let summary = PollLoop::new(consumer.clone(), keys, sink, fast_options())
            .run()
            .await;

        assert_eq!(summary.emitted, 3);
        let sequences: Vec<u64> = records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.stream_sequence)
            .collect();
        assert_eq!(sequences, vec![1, 2, 3]);

        // Every record was acknowledged.
        assert_eq!(consumer.ack_floor().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn acks_record_before_next_fetch() {
        let (_stream, consumer) = seeded_consumer(3).await;
        let ops = Arc::new(Mutex::new(Vec::new()));
        let recording = RecordingConsumer {
            inner: consumer,
            ops: ops.clone(),
        };

        let keys = ScriptedKeys::new(vec![None, None, None]);
        PollLoop::new(recording, keys, VecSink::default(), fast_options())
            .run()
            .await;

        let ops = ops.lock().unwrap();
        assert_eq!(
            &ops[..6],
            &[
                Op::Fetch,
                Op::Ack(1),
                Op::Fetch,
                Op::Ack(2),
                Op::Fetch,
                Op::Ack(3),
            ],
        );
    }

    #[tokio::test]
    async fn pause_gates_fetching_until_second_toggle() {
        let (_stream, consumer) = seeded_consumer(3).await;
        let ops = Arc::new(Mutex::new(Vec::new()));
        let recording = RecordingConsumer {
            inner: consumer,
            ops: ops.clone(),
        };
        let sink = VecSink::default();
        let records = sink.records.clone();

        // Record 1, pause, two idle ticks, resume, records 2 and 3.
        let keys = ScriptedKeys::new(vec![
            None,
            Some(LoopCommand::TogglePause),
            None,
            None,
            Some(LoopCommand::TogglePause),
            None,
            None,
        ]);
        let summary = PollLoop::new(recording, keys, sink, fast_options())
            .run()
            .await;

        assert_eq!(summary.emitted, 3);
        let sequences: Vec<u64> = records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.stream_sequence)
            .collect();
        assert_eq!(sequences, vec![1, 2, 3]);

        // No fetch was issued while paused: exactly one fetch per record.
        assert_eq!(
            ops.lock().unwrap().as_slice(),
            &[
                Op::Fetch,
                Op::Ack(1),
                Op::Fetch,
                Op::Ack(2),
                Op::Fetch,
                Op::Ack(3),
            ],
        );
    }

    #[tokio::test]
    async fn termination_before_any_fetch_emits_nothing() {
        let (_stream, consumer) = seeded_consumer(3).await;
        let ops = Arc::new(Mutex::new(Vec::new()));
        let recording = RecordingConsumer {
            inner: consumer,
            ops: ops.clone(),
        };
        let sink = VecSink::default();
        let records = sink.records.clone();

        let keys = ScriptedKeys::new(vec![]);
        let summary = PollLoop::new(recording, keys, sink, fast_options())
            .run()
            .await;

        assert_eq!(summary.emitted, 0);
        assert!(records.lock().unwrap().is_empty());
        assert!(ops.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn odd_toggle_count_leaves_loop_paused() {
        let (_stream, consumer) = seeded_consumer(1).await;
        let ops = Arc::new(Mutex::new(Vec::new()));
        let recording = RecordingConsumer {
            inner: consumer,
            ops: ops.clone(),
        };

        let keys = ScriptedKeys::new(vec![
            Some(LoopCommand::TogglePause),
            None,
            None,
            None,
        ]);
        let summary = PollLoop::new(recording, keys, VecSink::default(), fast_options())
            .run()
            .await;

        assert_eq!(summary.emitted, 0);
        assert!(ops.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn even_toggle_count_restores_running() {
        let (_stream, consumer) = seeded_consumer(1).await;

        let keys = ScriptedKeys::new(vec![
            Some(LoopCommand::TogglePause),
            Some(LoopCommand::TogglePause),
            None,
        ]);
        let summary = PollLoop::new(consumer, keys, VecSink::default(), fast_options())
            .run()
            .await;

        assert_eq!(summary.emitted, 1);
    }

    #[tokio::test]
    async fn never_exits_without_termination() {
        let (_stream, consumer) = seeded_consumer(1).await;

        let run = PollLoop::new(consumer, SilentKeys, VecSink::default(), fast_options()).run();
        let result = tokio::time::timeout(Duration::from_millis(200), run).await;

        assert!(result.is_err(), "loop exited without a termination event");
    }

    #[tokio::test]
    async fn cancellation_token_stops_the_loop() {
        let (_stream, consumer) = seeded_consumer(1).await;
        let token = CancellationToken::new();

        let run = PollLoop::new(consumer, SilentKeys, VecSink::default(), fast_options())
            .with_cancellation_token(token.clone())
            .run();

        token.cancel();
        let summary = tokio::time::timeout(Duration::from_millis(200), run)
            .await
            .expect("loop ignored cancellation");

        assert_eq!(summary.emitted, 0);
    }

    #[tokio::test]
    async fn fetch_failure_does_not_stop_the_loop() {
        let (_stream, consumer) = seeded_consumer(3).await;
        let flaky = FlakyFetchConsumer {
            inner: consumer.clone(),
            failed: Arc::new(AtomicBool::new(false)),
        };
        let sink = VecSink::default();
        let records = sink.records.clone();

        // One extra tick absorbs the failed fetch.
        let keys = ScriptedKeys::new(vec![None, None, None, None]);
        let summary = PollLoop::new(flaky, keys, sink, fast_options()).run().await;

        assert_eq!(summary.emitted, 3);
        let sequences: Vec<u64> = records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.stream_sequence)
            .collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn metadata_failure_skips_only_that_record() {
        let (_stream, consumer) = seeded_consumer(3).await;
        let broken = BrokenMetaConsumer {
            inner: consumer.clone(),
            broken_seq: 2,
        };
        let sink = VecSink::default();
        let records = sink.records.clone();

        let keys = ScriptedKeys::new(vec![None, None, None]);
        let summary = PollLoop::new(broken, keys, sink, fast_options()).run().await;

        assert_eq!(summary.emitted, 2);
        let sequences: Vec<u64> = records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.stream_sequence)
            .collect();
        assert_eq!(sequences, vec![1, 3]);

        // The record with unreadable metadata was still acknowledged.
        assert_eq!(consumer.ack_floor().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn sink_failure_does_not_stop_the_loop() {
        let (_stream, consumer) = seeded_consumer(3).await;
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = FailingSink {
            records: records.clone(),
            broken_seq: 2,
        };

        let keys = ScriptedKeys::new(vec![None, None, None]);
        let summary = PollLoop::new(consumer.clone(), keys, sink, fast_options())
            .run()
            .await;

        // The rejected record is not counted as emitted and the loop carries on.
        assert_eq!(summary.emitted, 2);
        let sequences: Vec<u64> = records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.stream_sequence)
            .collect();
        assert_eq!(sequences, vec![1, 3]);
        assert_eq!(consumer.ack_floor().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn larger_batches_preserve_order() {
        let (_stream, consumer) = seeded_consumer(5).await;
        let sink = VecSink::default();
        let records = sink.records.clone();

        let options = PollLoopOptions {
            batch: 2,
            ..fast_options()
        };
        let keys = ScriptedKeys::new(vec![None, None, None]);
        let summary = PollLoop::new(consumer, keys, sink, options).run().await;

        assert_eq!(summary.emitted, 5);
        let sequences: Vec<u64> = records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.stream_sequence)
            .collect();
        assert_eq!(sequences, vec![1, 2, 3, 4, 5]);
    }
}

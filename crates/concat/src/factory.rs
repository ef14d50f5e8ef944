//! Concatenator factory
//!
//! Owns everything the workers share: the output channel all of them emit
//! into, the pending-slot pool, the fleet metrics, and the cancellation
//! token that drives the shutdown drain.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use stitch_config::TagConfig;
use stitch_protocol::Record;

use crate::error::Result;
use crate::metrics::ConcatMetrics;
use crate::slot::SlotPool;
use crate::timer::TimerConfig;
use crate::worker::Concatenator;
use crate::{DEFAULT_SLOT_POOL_CAPACITY, INPUT_CHANNEL_SIZE, OUTPUT_CHANNEL_SIZE};

/// Spawns one concatenator per tag and collects their output
///
/// The factory outlives its workers: dropping the factory without calling
/// [`ConcatFactory::shutdown`] leaves them running until their input
/// channels close.
///
/// # Example
///
/// ```ignore
/// let mut factory = ConcatFactory::new(config.global.max_msg_length);
/// for (tag, tag_config) in config.tags.iter() {
///     let input = factory.spawn_from_config(tag, tag_config)?;
///     router.register(tag, input);
/// }
/// let fused = factory.message_chan().expect("taken once");
/// ```
pub struct ConcatFactory {
    output_tx: mpsc::Sender<Record>,
    output_rx: Option<mpsc::Receiver<Record>>,
    max_msg_length: usize,
    timer_config: TimerConfig,
    pool: Arc<SlotPool>,
    metrics: Arc<ConcatMetrics>,
    cancel: CancellationToken,
    workers: Vec<JoinHandle<()>>,
}

impl ConcatFactory {
    /// Create a factory with the given fused-payload length bound
    pub fn new(max_msg_length: usize) -> Self {
        info!(max_msg_length, "created concatenator factory");

        let (output_tx, output_rx) = mpsc::channel(OUTPUT_CHANNEL_SIZE);

        Self {
            output_tx,
            output_rx: Some(output_rx),
            max_msg_length,
            timer_config: TimerConfig::default(),
            pool: Arc::new(SlotPool::new(DEFAULT_SLOT_POOL_CAPACITY)),
            metrics: Arc::new(ConcatMetrics::new()),
            cancel: CancellationToken::new(),
            workers: Vec::new(),
        }
    }

    /// Override the idle sleeper configuration for spawned workers
    pub fn with_timer_config(mut self, config: TimerConfig) -> Self {
        self.timer_config = config;
        self
    }

    /// Spawn a concatenator for a tag
    ///
    /// Allocates the tag's input channel, starts the worker, and returns
    /// the sender for the caller's router to push records into.
    pub fn spawn(
        &mut self,
        tag: impl Into<String>,
        msg_key: impl Into<String>,
        identifier_key: impl Into<String>,
        first_line: regex::bytes::Regex,
    ) -> mpsc::Sender<Record> {
        let tag = tag.into();
        let (input_tx, input_rx) = mpsc::channel(INPUT_CHANNEL_SIZE);

        let worker = Concatenator::new(
            tag.as_str(),
            self.output_tx.clone(),
            msg_key,
            identifier_key,
            first_line,
            self.max_msg_length,
            Arc::clone(&self.pool),
            Arc::clone(&self.metrics),
            self.timer_config.clone(),
            self.cancel.child_token(),
        );

        debug!(tag = %tag, "spawning concatenator");
        self.workers.push(tokio::spawn(worker.run(input_rx)));

        input_tx
    }

    /// Spawn a concatenator from a tag-table entry
    ///
    /// # Errors
    ///
    /// Returns the configuration error if the entry's first-line pattern
    /// does not compile.
    pub fn spawn_from_config(
        &mut self,
        tag: impl Into<String>,
        config: &TagConfig,
    ) -> Result<mpsc::Sender<Record>> {
        let tag = tag.into();
        let first_line = config.compile_first_line(&tag)?;
        Ok(self.spawn(
            tag,
            config.msg_key.as_str(),
            config.identifier_key.as_str(),
            first_line,
        ))
    }

    /// Take the shared output channel
    ///
    /// All workers emit into this channel. It can only be taken once;
    /// later calls return `None`.
    pub fn message_chan(&mut self) -> Option<mpsc::Receiver<Record>> {
        self.output_rx.take()
    }

    /// Number of workers spawned so far
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Fleet metrics
    pub fn metrics(&self) -> &Arc<ConcatMetrics> {
        &self.metrics
    }

    /// The shared pending-slot pool
    pub fn slot_pool(&self) -> &Arc<SlotPool> {
        &self.pool
    }

    /// Stop every worker, flushing all pending records first
    ///
    /// Each worker drains its own slot map before exiting; no flush order
    /// is defined across tags.
    pub async fn shutdown(self) {
        info!(workers = self.workers.len(), "shutting down concatenator fleet");
        self.cancel.cancel();

        for handle in self.workers {
            // A worker that panicked is already gone; nothing to do here
            let _ = handle.await;
        }

        let snapshot = self.metrics.snapshot();
        info!(
            records_received = snapshot.records_received,
            records_forwarded = snapshot.records_forwarded,
            fragments_fused = snapshot.fragments_fused,
            emits_drain = snapshot.emits_drain,
            "concatenator fleet stopped"
        );
    }
}

impl std::fmt::Debug for ConcatFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcatFactory")
            .field("workers", &self.workers.len())
            .field("max_msg_length", &self.max_msg_length)
            .finish()
    }
}

//! Post-filter pipeline
//!
//! Wraps a record channel with an ordered chain of post-filters. Each
//! filter may modify the record, consume it, or push it onto the re-entry
//! channel for another full traversal.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use stitch_protocol::{Record, RecordPool};

use crate::{PIPELINE_OUTPUT_SIZE, REENTRY_CHANNEL_SIZE};

/// A stage in the post-filter chain
///
/// Filters run on the pipeline task, in configured order. Returning
/// `None` consumes the record: the remaining filters are skipped and the
/// pipeline moves on. A consumed record should be recycled through the
/// record pool unless it was requeued.
///
/// The upstream sender targets the re-entry channel; filters must use
/// `try_send` on it - the pipeline task is the one calling `filter`, so a
/// blocking send on a full re-entry channel would deadlock.
pub trait PostFilter: Send {
    /// Name of this filter for logging
    fn name(&self) -> &'static str;

    /// Pass a record through, modify it, or consume it
    fn filter(&mut self, record: Record) -> Option<Record>;

    /// Receive the re-entry sender before the pipeline starts
    fn set_upstream(&mut self, _upstream: mpsc::Sender<Record>) {}

    /// Receive the shared record pool before the pipeline starts
    fn set_record_pool(&mut self, _pool: Arc<RecordPool>) {}
}

/// Ordered post-filter chain with a re-entry channel
///
/// # Example
///
/// ```ignore
/// let pipeline = PostPipeline::new(pool, vec![Box::new(MyFilter::new())]);
/// let fused = factory.message_chan().expect("taken once");
/// let mut downstream = pipeline.wrap(fused);
///
/// while let Some(record) = downstream.recv().await {
///     sender.deliver(record).await?;
/// }
/// ```
pub struct PostPipeline {
    filters: Vec<Box<dyn PostFilter>>,
    reenter_tx: mpsc::Sender<Record>,
    reenter_rx: mpsc::Receiver<Record>,
}

impl PostPipeline {
    /// Create a pipeline, wiring every filter with the re-entry sender
    /// and the shared record pool
    pub fn new(pool: Arc<RecordPool>, mut filters: Vec<Box<dyn PostFilter>>) -> Self {
        let (reenter_tx, reenter_rx) = mpsc::channel(REENTRY_CHANNEL_SIZE);

        for filter in &mut filters {
            filter.set_upstream(reenter_tx.clone());
            filter.set_record_pool(Arc::clone(&pool));
        }

        Self {
            filters,
            reenter_tx,
            reenter_rx,
        }
    }

    /// Names of the configured filters, in order
    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// A sender onto the re-entry channel
    ///
    /// Mostly useful to external producers that want their records to
    /// traverse the chain without passing through the input channel.
    pub fn reentry(&self) -> mpsc::Sender<Record> {
        self.reenter_tx.clone()
    }

    /// Wrap a record channel with the filter chain
    ///
    /// Spawns the pipeline task and returns its output channel. The task
    /// runs until the input channel closes; any re-entry backlog is
    /// filtered through before the output channel closes.
    pub fn wrap(self, input: mpsc::Receiver<Record>) -> mpsc::Receiver<Record> {
        let (out_tx, out_rx) = mpsc::channel(PIPELINE_OUTPUT_SIZE);
        tokio::spawn(self.run(input, out_tx));
        out_rx
    }

    async fn run(mut self, mut input: mpsc::Receiver<Record>, output: mpsc::Sender<Record>) {
        info!(filters = ?self.filter_names(), "post pipeline started");

        loop {
            // Unfair select: a re-entered record races with fresh input.
            let record = tokio::select! {
                Some(record) = self.reenter_rx.recv() => record,
                maybe = input.recv() => match maybe {
                    Some(record) => record,
                    None => break,
                },
            };

            let Some(record) = self.apply(record) else {
                continue;
            };
            if output.send(record).await.is_err() {
                warn!("pipeline output channel closed, stopping");
                return;
            }
        }

        // Input closed: filter the remaining re-entry backlog through.
        while let Ok(record) = self.reenter_rx.try_recv() {
            let Some(record) = self.apply(record) else {
                continue;
            };
            if output.send(record).await.is_err() {
                warn!("pipeline output channel closed, stopping");
                return;
            }
        }

        debug!("post pipeline stopped");
    }

    /// Run one record through every filter in order
    fn apply(&mut self, record: Record) -> Option<Record> {
        let mut current = record;

        for filter in &mut self.filters {
            match filter.filter(current) {
                Some(record) => current = record,
                None => {
                    trace!(filter = filter.name(), "record consumed by filter");
                    return None;
                }
            }
        }

        Some(current)
    }
}

impl std::fmt::Debug for PostPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostPipeline")
            .field("filters", &self.filter_names())
            .finish()
    }
}

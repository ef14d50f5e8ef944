//! Per-tag concatenation worker
//!
//! One `Concatenator` runs per tag. It owns a map of identifier → pending
//! slot and decides, record by record, whether an arrival starts a new
//! logical entry or continues the pending one. Pending entries are
//! flushed on a first-line match, on payload overflow, on the idle
//! timeout, and on shutdown.
//!
//! # Failure semantics
//!
//! Records the worker cannot group (missing identifier, wrong identifier
//! type, missing message field) are forwarded unchanged with a diagnostic
//! log. The worker never drops a record silently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use stitch_protocol::{Record, RecordError, Value};

use crate::error::{ConcatError, Result};
use crate::metrics::ConcatMetrics;
use crate::slot::{PendingSlot, SlotPool};
use crate::timer::{BackoffTimer, TimerConfig};

/// Single-tag fusion worker
///
/// Constructed by the factory and consumed by [`Concatenator::run`],
/// which loops until the input channel closes or the worker is
/// cancelled. The slot map is single-owner: no other task touches it.
pub struct Concatenator {
    tag: String,
    output: mpsc::Sender<Record>,
    msg_key: String,
    identifier_key: String,
    first_line: regex::bytes::Regex,
    max_msg_length: usize,
    slots: HashMap<String, PendingSlot>,
    pool: Arc<SlotPool>,
    metrics: Arc<ConcatMetrics>,
    timer: BackoffTimer,
    last_scan: Instant,
    cancel: CancellationToken,
}

impl Concatenator {
    /// Create a worker for one tag
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tag: impl Into<String>,
        output: mpsc::Sender<Record>,
        msg_key: impl Into<String>,
        identifier_key: impl Into<String>,
        first_line: regex::bytes::Regex,
        max_msg_length: usize,
        pool: Arc<SlotPool>,
        metrics: Arc<ConcatMetrics>,
        timer_config: TimerConfig,
        cancel: CancellationToken,
    ) -> Self {
        let tag = tag.into();
        let msg_key = msg_key.into();
        let identifier_key = identifier_key.into();

        debug!(
            tag = %tag,
            msg_key = %msg_key,
            identifier_key = %identifier_key,
            "created concatenator"
        );

        Self {
            tag,
            output,
            msg_key,
            identifier_key,
            first_line,
            max_msg_length,
            slots: HashMap::new(),
            pool,
            metrics,
            timer: BackoffTimer::new(timer_config),
            last_scan: Instant::now(),
            cancel,
        }
    }

    /// Run the worker until the input closes or it is cancelled
    ///
    /// On exit every pending record is flushed to the output channel so
    /// nothing admitted is lost.
    pub async fn run(mut self, mut input: mpsc::Receiver<Record>) {
        debug!(tag = %self.tag, "concatenator started");

        loop {
            tokio::select! {
                maybe = input.recv() => match maybe {
                    Some(record) => {
                        self.timer.reset();
                        // A steadily-ready input channel keeps the sleep
                        // arm from firing; scan inline once the deadline
                        // is overdue.
                        let result = match self.admit(record).await {
                            Ok(()) if self.scan_due() => self.flush_expired().await,
                            other => other,
                        };
                        if result.is_err() {
                            warn!(
                                tag = %self.tag,
                                pending = self.slots.len(),
                                "output channel closed, stopping without drain"
                            );
                            return;
                        }
                    }
                    None => break,
                },
                _ = self.timer.sleep() => {
                    if self.flush_expired().await.is_err() {
                        warn!(tag = %self.tag, "output channel closed, stopping without drain");
                        return;
                    }
                }
                _ = self.cancel.cancelled() => break,
            }
        }

        self.drain().await;
        debug!(tag = %self.tag, "concatenator stopped");
    }

    /// Admit one record into the fusion state machine
    async fn admit(&mut self, record: Record) -> Result<()> {
        self.metrics.record_received();
        let now = Instant::now();

        // Records without an identifier cannot be grouped; deliver them
        // as they are.
        let identifier = match record.get(&self.identifier_key) {
            Some(Value::Bytes(bytes)) => String::from_utf8_lossy(bytes).into_owned(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                let err = RecordError::unexpected_type(&self.identifier_key, other.type_name());
                error!(tag = %self.tag, error = %err, "unusable identifier, forwarding unchanged");
                self.metrics.record_forwarded();
                return Self::emit(&self.output, record).await;
            }
            None => {
                warn!(
                    tag = %self.tag,
                    identifier_key = %self.identifier_key,
                    "identifier not present, forwarding unchanged"
                );
                self.metrics.record_forwarded();
                return Self::emit(&self.output, record).await;
            }
        };

        // First record seen for this identifier: park it and wait for
        // fragments.
        let Some(slot) = self.slots.get_mut(&identifier) else {
            debug!(tag = %self.tag, identifier = %identifier, id = record.id(), "new identifier");
            let mut slot = self.pool.get();
            slot.admit(record, now);
            self.slots.insert(identifier, slot);
            return Ok(());
        };

        // A fragment without the message field cannot participate in
        // fusion; deliver it as it is.
        let starts_entry = match record.get(&self.msg_key) {
            Some(value) => match value.as_bytes() {
                Some(text) => self.first_line.is_match(text),
                None => {
                    let err = RecordError::unexpected_type(&self.msg_key, value.type_name());
                    error!(tag = %self.tag, error = %err, "unusable message field, forwarding unchanged");
                    self.metrics.record_forwarded();
                    return Self::emit(&self.output, record).await;
                }
            },
            None => {
                warn!(
                    tag = %self.tag,
                    msg_key = %self.msg_key,
                    "message field not present, forwarding unchanged"
                );
                self.metrics.record_forwarded();
                return Self::emit(&self.output, record).await;
            }
        };

        if starts_entry {
            // The fragment begins a new logical entry: flush what is
            // pending and reuse the holder in place.
            debug!(tag = %self.tag, identifier = %identifier, id = record.id(), "first line matched");
            if let Some(previous) = slot.replace(record, now) {
                self.metrics.record_emit_newline();
                Self::emit(&self.output, previous).await?;
            }
            return Ok(());
        }

        // Continuation: accrete the fragment onto the pending record.
        let Some(pending) = slot.record_mut() else {
            return Ok(());
        };
        let appended = match record.get(&self.msg_key).and_then(Value::as_bytes) {
            Some(fragment) => pending.append_to(&self.msg_key, fragment),
            None => Ok(()),
        };
        if let Err(err) = appended {
            error!(
                tag = %self.tag,
                identifier = %identifier,
                error = %err,
                "pending record cannot accept fragment, forwarding fragment unchanged"
            );
            self.metrics.record_forwarded();
            return Self::emit(&self.output, record).await;
        }
        pending.push_ext_id(record.id());
        let fused_len = pending.payload_len(&self.msg_key);
        slot.touch(now);
        self.metrics.record_fused();
        debug!(
            tag = %self.tag,
            identifier = %identifier,
            id = record.id(),
            fused_len,
            "fused fragment"
        );

        // Flush once the fused payload reaches the length bound.
        if fused_len >= self.max_msg_length
            && let Some(mut slot) = self.slots.remove(&identifier)
        {
            debug!(
                tag = %self.tag,
                identifier = %identifier,
                fused_len,
                max_msg_length = self.max_msg_length,
                "payload over length bound, flushing"
            );
            if let Some(full) = slot.take() {
                self.metrics.record_emit_overflow();
                Self::emit(&self.output, full).await?;
            }
            self.pool.put(slot);
        }

        Ok(())
    }

    /// Whether the timeout scan is overdue
    fn scan_due(&self) -> bool {
        self.last_scan.elapsed() >= self.timer.concat_timeout()
    }

    /// Flush every slot idle for longer than the concat timeout
    async fn flush_expired(&mut self) -> Result<()> {
        let now = Instant::now();
        self.last_scan = now;
        let timeout = self.timer.concat_timeout();

        let expired: Vec<String> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.is_expired(now, timeout))
            .map(|(identifier, _)| identifier.clone())
            .collect();

        for identifier in expired {
            if let Some(mut slot) = self.slots.remove(&identifier) {
                if let Some(record) = slot.take() {
                    debug!(tag = %self.tag, identifier = %identifier, id = record.id(), "flush on timeout");
                    self.metrics.record_emit_timeout();
                    Self::emit(&self.output, record).await?;
                }
                self.pool.put(slot);
            }
        }

        Ok(())
    }

    /// Flush every remaining pending record on shutdown
    async fn drain(&mut self) {
        if self.slots.is_empty() {
            return;
        }

        debug!(tag = %self.tag, pending = self.slots.len(), "draining pending records");

        for (_, mut slot) in self.slots.drain() {
            if let Some(record) = slot.take() {
                self.metrics.record_emit_drain();
                if Self::emit(&self.output, record).await.is_err() {
                    warn!(tag = %self.tag, "output channel closed during drain, pending record lost");
                }
            }
            self.pool.put(slot);
        }
    }

    /// Send a record downstream, blocking while the channel is full
    async fn emit(output: &mpsc::Sender<Record>, record: Record) -> Result<()> {
        output
            .send(record)
            .await
            .map_err(|_| ConcatError::OutputClosed)
    }
}

impl std::fmt::Debug for Concatenator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Concatenator")
            .field("tag", &self.tag)
            .field("pending", &self.slots.len())
            .finish()
    }
}

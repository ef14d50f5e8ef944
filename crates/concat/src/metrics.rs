//! Engine metrics
//!
//! Atomic counters shared by all concatenators. Relaxed ordering
//! throughout; values are eventually consistent, not real-time.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the concatenator fleet
///
/// Safe to read and update from any task concurrently.
#[derive(Debug, Default)]
pub struct ConcatMetrics {
    /// Records admitted by any worker
    records_received: AtomicU64,

    /// Records forwarded unchanged (missing identifier/msg_key, bad type)
    records_forwarded: AtomicU64,

    /// Fragments appended onto a pending record
    fragments_fused: AtomicU64,

    /// Emissions triggered by a first-line match
    emits_newline: AtomicU64,

    /// Emissions triggered by the payload length bound
    emits_overflow: AtomicU64,

    /// Emissions triggered by the idle timeout scan
    emits_timeout: AtomicU64,

    /// Emissions triggered by the shutdown drain
    emits_drain: AtomicU64,
}

impl ConcatMetrics {
    /// Create a zeroed metrics instance
    pub const fn new() -> Self {
        Self {
            records_received: AtomicU64::new(0),
            records_forwarded: AtomicU64::new(0),
            fragments_fused: AtomicU64::new(0),
            emits_newline: AtomicU64::new(0),
            emits_overflow: AtomicU64::new(0),
            emits_timeout: AtomicU64::new(0),
            emits_drain: AtomicU64::new(0),
        }
    }

    /// Record an admitted record
    #[inline]
    pub fn record_received(&self) {
        self.records_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a bypass forward
    #[inline]
    pub fn record_forwarded(&self) {
        self.records_forwarded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a fused fragment
    #[inline]
    pub fn record_fused(&self) {
        self.fragments_fused.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an emission caused by a first-line match
    #[inline]
    pub fn record_emit_newline(&self) {
        self.emits_newline.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an emission caused by payload overflow
    #[inline]
    pub fn record_emit_overflow(&self) {
        self.emits_overflow.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an emission caused by the idle timeout
    #[inline]
    pub fn record_emit_timeout(&self) {
        self.emits_timeout.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an emission caused by the shutdown drain
    #[inline]
    pub fn record_emit_drain(&self) {
        self.emits_drain.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> ConcatMetricsSnapshot {
        ConcatMetricsSnapshot {
            records_received: self.records_received.load(Ordering::Relaxed),
            records_forwarded: self.records_forwarded.load(Ordering::Relaxed),
            fragments_fused: self.fragments_fused.load(Ordering::Relaxed),
            emits_newline: self.emits_newline.load(Ordering::Relaxed),
            emits_overflow: self.emits_overflow.load(Ordering::Relaxed),
            emits_timeout: self.emits_timeout.load(Ordering::Relaxed),
            emits_drain: self.emits_drain.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.records_received.store(0, Ordering::Relaxed);
        self.records_forwarded.store(0, Ordering::Relaxed);
        self.fragments_fused.store(0, Ordering::Relaxed);
        self.emits_newline.store(0, Ordering::Relaxed);
        self.emits_overflow.store(0, Ordering::Relaxed);
        self.emits_timeout.store(0, Ordering::Relaxed);
        self.emits_drain.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time snapshot of engine counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConcatMetricsSnapshot {
    /// Records admitted by any worker
    pub records_received: u64,
    /// Records forwarded unchanged
    pub records_forwarded: u64,
    /// Fragments appended onto a pending record
    pub fragments_fused: u64,
    /// Emissions from first-line matches
    pub emits_newline: u64,
    /// Emissions from the payload length bound
    pub emits_overflow: u64,
    /// Emissions from the idle timeout scan
    pub emits_timeout: u64,
    /// Emissions from the shutdown drain
    pub emits_drain: u64,
}

impl ConcatMetricsSnapshot {
    /// Total records emitted on the shared output channel
    pub fn total_emitted(&self) -> u64 {
        self.records_forwarded
            + self.emits_newline
            + self.emits_overflow
            + self.emits_timeout
            + self.emits_drain
    }
}

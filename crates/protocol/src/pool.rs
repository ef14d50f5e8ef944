//! Lock-free record pool
//!
//! Recycles `Record` allocations (payload maps, ext_id vectors) so that
//! dropped or emitted records do not cost an allocation on re-admission.
//! Pooling is a footprint optimization: when the pool runs dry, `get`
//! falls back to a fresh allocation.

use crossbeam::queue::ArrayQueue;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::record::Record;

/// Counters shared by the record and slot pools
///
/// Relaxed ordering throughout; these are eventually consistent.
#[derive(Debug, Default)]
pub struct PoolMetrics {
    /// Pool hits (recycled object reused)
    pub hits: AtomicU64,

    /// Pool misses (fresh allocation required)
    pub misses: AtomicU64,

    /// Objects returned to the pool
    pub returns: AtomicU64,

    /// Objects dropped because the pool was full
    pub drops: AtomicU64,
}

impl PoolMetrics {
    /// Create a zeroed metrics instance
    pub const fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            returns: AtomicU64::new(0),
            drops: AtomicU64::new(0),
        }
    }

    /// Record a pool hit
    #[inline]
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a pool miss
    #[inline]
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an object returned to the pool
    #[inline]
    pub fn record_return(&self) {
        self.returns.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an object dropped because the pool was full
    #[inline]
    pub fn record_drop(&self) {
        self.drops.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> PoolMetricsSnapshot {
        PoolMetricsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            returns: self.returns.load(Ordering::Relaxed),
            drops: self.drops.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of pool counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolMetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub returns: u64,
    pub drops: u64,
}

impl PoolMetricsSnapshot {
    /// Fraction of gets served from the pool (1.0 when no gets yet)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            1.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Lock-free pool of recycled records
///
/// Safe to share across tasks; `get` and `put` are O(1) queue operations.
pub struct RecordPool {
    queue: ArrayQueue<Record>,
    metrics: PoolMetrics,
}

impl RecordPool {
    /// Create a pool that retains at most `capacity` recycled records
    ///
    /// The pool starts empty; it fills as records are returned.
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: ArrayQueue::new(capacity),
            metrics: PoolMetrics::new(),
        }
    }

    /// Take a recycled record, or allocate a fresh one
    #[inline]
    pub fn get(&self) -> Record {
        match self.queue.pop() {
            Some(record) => {
                self.metrics.record_hit();
                record
            }
            None => {
                self.metrics.record_miss();
                Record::default()
            }
        }
    }

    /// Recycle a record back into the pool
    ///
    /// The record is cleared first. If the pool is full it is dropped.
    #[inline]
    pub fn put(&self, mut record: Record) {
        record.recycle();
        match self.queue.push(record) {
            Ok(()) => self.metrics.record_return(),
            Err(_) => self.metrics.record_drop(),
        }
    }

    /// Number of recycled records currently held
    #[inline]
    pub fn available(&self) -> usize {
        self.queue.len()
    }

    /// Maximum number of recycled records retained
    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Pool counters
    #[inline]
    pub fn metrics(&self) -> &PoolMetrics {
        &self.metrics
    }
}

impl std::fmt::Debug for RecordPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordPool")
            .field("available", &self.available())
            .field("capacity", &self.capacity())
            .finish()
    }
}

//! Pending-record slots and their pool
//!
//! A `PendingSlot` holds one in-flight record while its fragments arrive.
//! Slots are owned by exactly one worker's identifier map for their dwell
//! time and recycled through a shared lock-free `SlotPool` afterwards.

use crossbeam::queue::ArrayQueue;
use tokio::time::Instant;

use stitch_protocol::{PoolMetrics, Record};

/// Holder for a record that is still accreting fragments
#[derive(Debug)]
pub struct PendingSlot {
    record: Option<Record>,
    last_touch: Instant,
}

impl PendingSlot {
    /// Create an empty slot
    pub fn new() -> Self {
        Self {
            record: None,
            last_touch: Instant::now(),
        }
    }

    /// Park a record in this slot
    pub fn admit(&mut self, record: Record, now: Instant) {
        self.record = Some(record);
        self.last_touch = now;
    }

    /// Swap in a new record, returning the previous one
    ///
    /// Used when a first-line match rotates the pending entry: the holder
    /// is reused in place rather than cycled through the pool.
    pub fn replace(&mut self, record: Record, now: Instant) -> Option<Record> {
        self.last_touch = now;
        self.record.replace(record)
    }

    /// Take the held record out, leaving the slot empty
    pub fn take(&mut self) -> Option<Record> {
        self.record.take()
    }

    /// Mutable access to the held record
    pub fn record_mut(&mut self) -> Option<&mut Record> {
        self.record.as_mut()
    }

    /// Read access to the held record
    pub fn record(&self) -> Option<&Record> {
        self.record.as_ref()
    }

    /// Update the last-activity timestamp
    pub fn touch(&mut self, now: Instant) {
        self.last_touch = now;
    }

    /// When this slot last saw an admission or append
    pub fn last_touch(&self) -> Instant {
        self.last_touch
    }

    /// Whether the slot has been idle longer than `timeout`
    pub fn is_expired(&self, now: Instant, timeout: std::time::Duration) -> bool {
        now.saturating_duration_since(self.last_touch) > timeout
    }
}

impl Default for PendingSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Lock-free pool of pending-slot holders
///
/// Shared by every worker; holders are pre-allocated so steady-state
/// admission does not allocate.
pub struct SlotPool {
    queue: ArrayQueue<PendingSlot>,
    metrics: PoolMetrics,
}

impl SlotPool {
    /// Create a pool with `capacity` pre-allocated holders
    pub fn new(capacity: usize) -> Self {
        let queue = ArrayQueue::new(capacity);
        for _ in 0..capacity {
            // Filling an empty queue cannot fail
            let _ = queue.push(PendingSlot::new());
        }

        Self {
            queue,
            metrics: PoolMetrics::new(),
        }
    }

    /// Take a holder from the pool, or allocate a fresh one
    #[inline]
    pub fn get(&self) -> PendingSlot {
        match self.queue.pop() {
            Some(slot) => {
                self.metrics.record_hit();
                slot
            }
            None => {
                self.metrics.record_miss();
                PendingSlot::new()
            }
        }
    }

    /// Return a holder to the pool
    ///
    /// Any record still held is dropped; callers emit it first. If the
    /// pool is full the holder is dropped.
    #[inline]
    pub fn put(&self, mut slot: PendingSlot) {
        slot.record = None;
        match self.queue.push(slot) {
            Ok(()) => self.metrics.record_return(),
            Err(_) => self.metrics.record_drop(),
        }
    }

    /// Number of holders currently available
    #[inline]
    pub fn available(&self) -> usize {
        self.queue.len()
    }

    /// Maximum number of holders retained
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

impl std::fmt::Debug for SlotPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotPool")
            .field("available", &self.available())
            .field("capacity", &self.capacity())
            .finish()
    }
}

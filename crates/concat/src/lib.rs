//! Stitch - Concatenation engine
//!
//! Reassembles multi-line log records that an upstream collector split
//! into fragments. One worker runs per tag; within a tag, independent
//! sources are distinguished by an identifier payload field (typically a
//! container id) and fused separately.
//!
//! # Architecture
//!
//! ```text
//! [Router]                  [Workers]                 [Downstream]
//!   tag "app" ──→ input ──→ Concatenator ──┐
//!   tag "db"  ──→ input ──→ Concatenator ──┼──→ shared output channel
//!   tag "web" ──→ input ──→ Concatenator ──┘
//! ```
//!
//! # Key Design
//!
//! - **Channel-based**: bounded `tokio::sync::mpsc` channels everywhere;
//!   a full output channel blocks the workers, which is the engine's
//!   backpressure
//! - **Single-owner state**: each worker owns its identifier → pending
//!   slot map outright, so the fusion state machine needs no locks
//! - **Adaptive idle scan**: an exponentially backed-off sleeper paces
//!   the per-slot timeout scan instead of a ticker per worker
//! - **Pooled holders**: pending-slot holders are recycled through a
//!   lock-free pool shared by all workers
//!
//! # Example
//!
//! ```ignore
//! use stitch_concat::ConcatFactory;
//!
//! let mut factory = ConcatFactory::new(65536);
//! let input = factory.spawn("app", "log", "container_id", regex);
//! let mut fused = factory.message_chan().expect("taken once");
//!
//! input.send(record).await?;
//! let record = fused.recv().await;
//! ```

mod error;
mod factory;
mod metrics;
mod slot;
mod timer;
mod worker;

pub use error::{ConcatError, Result};
pub use factory::ConcatFactory;
pub use metrics::{ConcatMetrics, ConcatMetricsSnapshot};
pub use slot::{PendingSlot, SlotPool};
pub use timer::{BackoffTimer, TimerConfig};
pub use worker::Concatenator;

/// Capacity of each per-tag input channel
pub const INPUT_CHANNEL_SIZE: usize = 1000;

/// Capacity of the shared output channel
pub const OUTPUT_CHANNEL_SIZE: usize = 5000;

/// Default capacity of the shared pending-slot pool
pub const DEFAULT_SLOT_POOL_CAPACITY: usize = 1024;

//! Stitch - Protocol
//!
//! Core types that flow through the reassembly pipeline:
//! - `Record` - A routed log record: tag, key/value payload, monotonic id
//! - `Value` - Payload value variants (byte buffers, strings, scalars)
//! - `RecordPool` - Lock-free pool of recycled records
//!
//! # Design Principles
//!
//! - **Byte-oriented**: log text is carried as `BytesMut` so fusion appends
//!   happen in place without re-encoding
//! - **Pool-friendly**: records can be recycled and reused to avoid
//!   per-record allocation on the hot path
//! - **Ownership transfer**: a record sent on a channel belongs to the
//!   receiver; the sender must not touch it again

mod error;
mod pool;
mod record;

pub use error::RecordError;
pub use pool::{PoolMetrics, PoolMetricsSnapshot, RecordPool};
pub use record::{Record, Value};

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

/// Result type for record operations
pub type Result<T> = std::result::Result<T, RecordError>;

/// Default capacity for the shared record pool
pub const DEFAULT_RECORD_POOL_CAPACITY: usize = 4096;

// Test modules - only compiled during testing
#[cfg(test)]
mod pool_test;
#[cfg(test)]
mod record_test;

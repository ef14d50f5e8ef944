//! Stitch - Transform
//!
//! The filter stages around the concatenation engine:
//!
//! - `TagFilter` - ingress predicate that drops records with empty or
//!   unrecognized tags before they reach a concatenator
//! - `PostPipeline` - ordered post-filter chain applied to fused records,
//!   with a re-entry channel filters can requeue into
//!
//! # Design Principles
//!
//! - **Fast**: filters run on the hot path and must stay allocation-free
//! - **Consuming**: a filter that returns `None` owns the record; dropped
//!   records are recycled through the shared record pool
//! - **Ordered**: post-filters always run in their configured order
//!
//! # Architecture
//!
//! ```text
//!              ┌──────────── re-entry ────────────┐
//!              ▼                                  │
//! [input] ──select──→ [Filter 1] → [Filter 2] → [Filter N] ──→ [output]
//! ```
//!
//! The select between re-entry and input is deliberately unfair:
//! re-entered records race with fresh ones. A filter that needs priority
//! for its re-entries must queue internally.

mod noop;
mod pipeline;
mod tag_filter;

pub use noop::NoopPostFilter;
pub use pipeline::{PostFilter, PostPipeline};
pub use tag_filter::TagFilter;

/// Capacity of the post-pipeline's re-entry channel
pub const REENTRY_CHANNEL_SIZE: usize = 1000;

/// Capacity of the post-pipeline's output channel
pub const PIPELINE_OUTPUT_SIZE: usize = 1000;

#[cfg(test)]
mod tag_filter_test;

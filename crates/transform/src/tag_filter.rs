//! Ingress tag filter
//!
//! Drops records the engine has no concatenator for: empty tags and tags
//! outside the configured table. Dropped records are recycled through the
//! shared record pool so their storage is reused by the acceptor.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use stitch_config::{TagFilterConfig, TagsConfig};
use stitch_protocol::{Record, RecordPool};

/// Synchronous tag predicate
///
/// Stateless beyond its options and the startup snapshot of supported
/// tags; applying it twice is the same as applying it once.
pub struct TagFilter {
    config: TagFilterConfig,
    tags: HashSet<String>,
    pool: Arc<RecordPool>,
}

impl TagFilter {
    /// Create a filter over an explicit tag set
    pub fn new(config: TagFilterConfig, tags: HashSet<String>, pool: Arc<RecordPool>) -> Self {
        debug!(
            supported_tags = tags.len(),
            remove_empty_tag = config.remove_empty_tag,
            remove_unsupported_tag = config.remove_unsupported_tag,
            "created tag filter"
        );

        Self { config, tags, pool }
    }

    /// Create a filter whose tag set snapshots the configured tag table
    pub fn from_table(config: TagFilterConfig, table: &TagsConfig, pool: Arc<RecordPool>) -> Self {
        Self::new(config, table.tag_set(), pool)
    }

    /// Whether a tag is in the snapshot
    pub fn is_supported(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Pass a record through, or consume it
    ///
    /// Returns `None` when the record was dropped; its storage has been
    /// recycled into the record pool and must not be touched again.
    pub fn filter(&self, record: Record) -> Option<Record> {
        if self.config.remove_empty_tag && record.tag().is_empty() {
            debug!("dropping record with empty tag");
            self.pool.put(record);
            return None;
        }

        if self.config.remove_unsupported_tag && !self.is_supported(record.tag()) {
            debug!(tag = %record.tag(), "dropping record with unsupported tag");
            self.pool.put(record);
            return None;
        }

        Some(record)
    }
}

impl std::fmt::Debug for TagFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagFilter")
            .field("supported_tags", &self.tags.len())
            .field("config", &self.config)
            .finish()
    }
}

//! Tag filter tests

use std::collections::HashSet;
use std::sync::Arc;

use stitch_config::TagFilterConfig;
use stitch_protocol::{Record, RecordPool};

use crate::TagFilter;

fn tag_set(tags: &[&str]) -> HashSet<String> {
    tags.iter().map(|t| t.to_string()).collect()
}

fn filter_with(config: TagFilterConfig) -> (TagFilter, Arc<RecordPool>) {
    let pool = Arc::new(RecordPool::new(16));
    let filter = TagFilter::new(config, tag_set(&["app"]), Arc::clone(&pool));
    (filter, pool)
}

#[test]
fn test_supported_tag_passes() {
    let (filter, pool) = filter_with(TagFilterConfig::default());

    let record = Record::new("app", 1);
    let passed = filter.filter(record.clone()).unwrap();
    assert_eq!(passed, record);
    assert_eq!(pool.metrics().snapshot().returns, 0);
}

#[test]
fn test_empty_tag_dropped_and_recycled() {
    let (filter, pool) = filter_with(TagFilterConfig::default());

    let mut record = Record::new("", 2);
    record.insert("log", "text");

    assert!(filter.filter(record).is_none());
    assert_eq!(pool.metrics().snapshot().returns, 1);
    assert_eq!(pool.available(), 1);
}

#[test]
fn test_unsupported_tag_dropped_and_recycled() {
    let (filter, pool) = filter_with(TagFilterConfig::default());

    assert!(filter.filter(Record::new("other", 3)).is_none());
    assert_eq!(pool.metrics().snapshot().returns, 1);
}

#[test]
fn test_remove_empty_tag_disabled() {
    let config = TagFilterConfig {
        remove_empty_tag: false,
        remove_unsupported_tag: false,
    };
    let (filter, pool) = filter_with(config);

    assert!(filter.filter(Record::new("", 4)).is_some());
    assert!(filter.filter(Record::new("other", 5)).is_some());
    assert_eq!(pool.metrics().snapshot().returns, 0);
}

#[test]
fn test_empty_tag_checked_before_support() {
    // An empty tag is never in the tag set; with only unsupported-removal
    // enabled it is still dropped by the membership check
    let config = TagFilterConfig {
        remove_empty_tag: false,
        remove_unsupported_tag: true,
    };
    let (filter, _pool) = filter_with(config);

    assert!(filter.filter(Record::new("", 6)).is_none());
}

#[test]
fn test_filter_is_idempotent() {
    let (filter, _pool) = filter_with(TagFilterConfig::default());

    let record = Record::new("app", 7);
    let once = filter.filter(record.clone()).unwrap();
    let twice = filter.filter(once).unwrap();
    assert_eq!(twice, record);
}

#[test]
fn test_from_table_snapshot() {
    let tags: stitch_config::TagsConfig = toml::from_str(
        "[app]\nmsg_key = \"log\"\nidentifier_key = \"cid\"\nfirst_line = \"^x\"",
    )
    .unwrap();

    let pool = Arc::new(RecordPool::new(4));
    let filter = TagFilter::from_table(TagFilterConfig::default(), &tags, pool);

    assert!(filter.is_supported("app"));
    assert!(!filter.is_supported("nginx"));
}

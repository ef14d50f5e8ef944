//! Record pool tests

use crate::{Record, RecordPool};

#[test]
fn test_get_from_empty_pool_is_miss() {
    let pool = RecordPool::new(4);
    let record = pool.get();

    assert_eq!(record, Record::default());
    let snapshot = pool.metrics().snapshot();
    assert_eq!(snapshot.misses, 1);
    assert_eq!(snapshot.hits, 0);
}

#[test]
fn test_put_then_get_is_hit() {
    let pool = RecordPool::new(4);

    let mut record = Record::new("app", 5);
    record.insert("log", "text");
    pool.put(record);

    assert_eq!(pool.available(), 1);

    let recycled = pool.get();
    // Returned record was cleared before pooling
    assert_eq!(recycled.tag(), "");
    assert_eq!(recycled.id(), 0);
    assert!(recycled.payload().is_empty());

    let snapshot = pool.metrics().snapshot();
    assert_eq!(snapshot.hits, 1);
    assert_eq!(snapshot.returns, 1);
}

#[test]
fn test_put_into_full_pool_drops() {
    let pool = RecordPool::new(2);

    pool.put(Record::default());
    pool.put(Record::default());
    pool.put(Record::default());

    assert_eq!(pool.available(), 2);
    let snapshot = pool.metrics().snapshot();
    assert_eq!(snapshot.returns, 2);
    assert_eq!(snapshot.drops, 1);
}

#[test]
fn test_capacity() {
    let pool = RecordPool::new(16);
    assert_eq!(pool.capacity(), 16);
    assert_eq!(pool.available(), 0);
}

#[test]
fn test_hit_rate() {
    let pool = RecordPool::new(4);

    // No gets yet: rate defaults to 1.0
    assert_eq!(pool.metrics().snapshot().hit_rate(), 1.0);

    let _ = pool.get(); // miss
    pool.put(Record::default());
    let _ = pool.get(); // hit

    assert_eq!(pool.metrics().snapshot().hit_rate(), 0.5);
}

#[test]
fn test_shared_across_threads() {
    use std::sync::Arc;
    use std::thread;

    let pool = Arc::new(RecordPool::new(64));
    let mut handles = vec![];

    for _ in 0..4 {
        let pool = Arc::clone(&pool);
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                let record = pool.get();
                pool.put(record);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = pool.metrics().snapshot();
    assert_eq!(snapshot.hits + snapshot.misses, 400);
    assert_eq!(snapshot.returns + snapshot.drops, 400);
}

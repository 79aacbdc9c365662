// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for `LocalCache`.

use std::time::Duration;

use cachegate_memory::LocalCache;
use cachegate_tier::{Cache, CacheEntry};

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

#[test]
fn builder_creates_named_cache() {
    let cache = LocalCache::<String, i32>::builder("cache-resources_products").build();
    assert_eq!(cache.name(), "cache-resources_products");
    assert_eq!(cache.len(), Some(0));
}

#[test]
fn get_returns_none_for_missing_key() {
    block_on(async {
        let cache = LocalCache::<String, i32>::builder("misses").build();
        let result = cache.get(&"missing".to_string()).await.expect("get failed");
        assert!(result.is_none());
    });
}

#[test]
fn put_and_get_returns_value() {
    block_on(async {
        let cache = LocalCache::<String, i32>::builder("hits").build();
        cache.put(&"key".to_string(), CacheEntry::new(42)).await.expect("put failed");

        let entry = cache.get(&"key".to_string()).await.expect("get failed").expect("entry should exist");
        assert_eq!(*entry.value(), 42);
    });
}

#[test]
fn put_overwrites_existing_value() {
    block_on(async {
        let cache = LocalCache::<String, i32>::builder("upserts").build();
        cache.put(&"key".to_string(), CacheEntry::new(42)).await.expect("put failed");
        cache.put(&"key".to_string(), CacheEntry::new(100)).await.expect("put failed");

        let entry = cache.get(&"key".to_string()).await.expect("get failed").expect("entry should exist");
        assert_eq!(*entry.value(), 100);
    });
}

#[test]
fn put_keeps_per_entry_ttl_out_of_engine_bounds() {
    block_on(async {
        // The engine bounds are static; the override rides along on the entry
        // but does not change expiry behavior.
        let cache = LocalCache::<String, i32>::builder("static-bounds")
            .time_to_live(Duration::from_secs(600))
            .build();
        cache
            .put(&"key".to_string(), CacheEntry::with_ttl(42, Duration::from_secs(1)))
            .await
            .expect("put failed");

        let entry = cache.get(&"key".to_string()).await.expect("get failed").expect("entry should exist");
        assert_eq!(*entry.value(), 42);
        assert_eq!(cache.inner().policy().time_to_live(), Some(Duration::from_secs(600)));
    });
}

#[test]
fn evict_removes_entry() {
    block_on(async {
        let cache = LocalCache::<String, i32>::builder("evictions").build();
        cache.put(&"key".to_string(), CacheEntry::new(42)).await.expect("put failed");

        cache.evict(&"key".to_string()).await.expect("evict failed");

        assert!(cache.get(&"key".to_string()).await.expect("get failed").is_none());
    });
}

#[test]
fn evict_of_missing_key_is_a_no_op() {
    block_on(async {
        let cache = LocalCache::<String, i32>::builder("evictions").build();
        cache.evict(&"missing".to_string()).await.expect("evict of missing key must succeed");
    });
}

#[test]
fn clear_removes_all_entries() {
    block_on(async {
        let cache = LocalCache::<String, i32>::builder("clears").build();
        cache.put(&"a".to_string(), CacheEntry::new(1)).await.expect("put failed");
        cache.put(&"b".to_string(), CacheEntry::new(2)).await.expect("put failed");

        cache.clear().await.expect("clear failed");

        assert!(cache.get(&"a".to_string()).await.expect("get failed").is_none());
        assert!(cache.get(&"b".to_string()).await.expect("get failed").is_none());
    });
}

#[test]
fn clones_share_storage() {
    block_on(async {
        let cache = LocalCache::<String, i32>::builder("shared").build();
        let clone = cache.clone();

        cache.put(&"key".to_string(), CacheEntry::new(9)).await.expect("put failed");

        let entry = clone.get(&"key".to_string()).await.expect("get failed").expect("entry should exist");
        assert_eq!(*entry.value(), 9);
    });
}

#[test]
fn builder_bounds_reach_the_engine() {
    let cache = LocalCache::<String, i32>::builder("bounded")
        .max_capacity(150)
        .time_to_live(Duration::from_secs(10))
        .time_to_idle(Duration::from_secs(20))
        .build();

    let policy = cache.inner().policy();
    assert_eq!(policy.max_capacity(), Some(150));
    assert_eq!(policy.time_to_live(), Some(Duration::from_secs(10)));
    assert_eq!(policy.time_to_idle(), Some(Duration::from_secs(20)));
}

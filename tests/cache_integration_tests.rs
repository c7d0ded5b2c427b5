//! Integration Tests for the Cache
//!
//! Drives the public API end to end: key building, policy decisions over
//! each store, persistence across store instances and concurrent use.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use offline_cache::cache::{
    context_from_probe, context_from_probe_and_outcome, FileStore, FileStoreConfig, HeaderUtil,
    LruMemoryStore, MemoryStore, RequestOutcome,
};
use offline_cache::{Cache, CacheContext, CacheEntry, CacheKey, CachePolicy, CacheStore};
use tempfile::TempDir;

// == Helper Functions ==

fn stores(dir: &TempDir) -> Vec<(&'static str, Arc<dyn CacheStore>)> {
    vec![
        ("memory", Arc::new(MemoryStore::new()) as Arc<dyn CacheStore>),
        ("lru", Arc::new(LruMemoryStore::with_capacity(16)) as Arc<dyn CacheStore>),
        ("file", Arc::new(FileStore::at(dir.path().join("cache.json"))) as Arc<dyn CacheStore>),
    ]
}

fn response(created_at_ms: i64) -> CacheEntry {
    CacheEntry::new(200, "{\"items\":[]}", created_at_ms)
        .with_header("content-type", "application/json")
}

// == Key Tests ==

#[test]
fn test_key_determinism() {
    let none: [&str; 0] = [];
    let a = CacheKey::from_request("get", "/a", "b=2&a=1", &HashMap::new(), &none);
    let b = CacheKey::from_request("GET", "/a", "a=1&b=2", &HashMap::new(), &none);

    assert_eq!(a, b);
}

#[test]
fn test_key_with_normalized_headers() {
    let mut headers = HashMap::from([
        ("Accept-Language".to_string(), " fr ".to_string()),
        ("X-Trace".to_string(), "ignored".to_string()),
    ]);
    HeaderUtil::normalize_in_place(&mut headers);

    let key = CacheKey::from_request("GET", "/docs", "page=2", &headers, &["Accept-Language"]);

    assert_eq!(key, "GET /docs?page=2 |h:accept-language=fr;");
}

// == Policy Over Every Store ==

#[test]
fn test_freshness_on_every_store() {
    let dir = TempDir::new().unwrap();
    let policy = CachePolicy::default();

    for (name, store) in stores(&dir) {
        let cache = Cache::new(policy, store);
        cache.put("GET /a", response(0)).unwrap();

        assert!(
            cache.get("GET /a", policy.ttl_ms, CacheContext::online()).unwrap().is_some(),
            "{name}: entry at ttl should be fresh"
        );
        assert!(
            cache.get("GET /a", policy.ttl_ms + 1, CacheContext::online()).unwrap().is_none(),
            "{name}: entry past ttl should be rejected online"
        );
    }
}

#[test]
fn test_stale_serving_on_every_store() {
    let dir = TempDir::new().unwrap();
    let policy = CachePolicy::default();
    let past_ttl = policy.ttl_ms + 1;

    for (name, store) in stores(&dir) {
        let cache = Cache::new(policy, store);
        cache.put("GET /a", response(0)).unwrap();

        assert!(
            cache.get("GET /a", past_ttl, CacheContext::network_error()).unwrap().is_some(),
            "{name}: stale-if-error"
        );
        assert!(
            cache.get("GET /a", past_ttl, CacheContext::offline()).unwrap().is_some(),
            "{name}: stale-if-offline"
        );
        assert!(
            cache
                .get("GET /a", policy.stale_if_offline_ms + 1, CacheContext::offline())
                .unwrap()
                .is_none(),
            "{name}: past every window"
        );
    }
}

#[test]
fn test_context_from_probe_drives_decision() {
    let policy = CachePolicy::default();
    let cache = Cache::new(policy, Arc::new(MemoryStore::new()));
    cache.put("k", response(0)).unwrap();
    let now = policy.ttl_ms + 1;

    let online_probe = |_now: i64| true;
    let offline_probe = |_now: i64| false;

    let ctx = context_from_probe(&online_probe, now);
    assert!(cache.get("k", now, ctx).unwrap().is_none());

    let ctx = context_from_probe(&offline_probe, now);
    assert!(cache.get("k", now, ctx).unwrap().is_some());

    let ctx = context_from_probe_and_outcome(&online_probe, now, RequestOutcome::NetworkError);
    assert!(cache.get("k", now, ctx).unwrap().is_some());
}

// == Persistence ==

#[test]
fn test_persistence_round_trip_across_instances() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("http").join("cache.json");
    let stored = response(1_700_000_000_000).with_header("etag", "\"v7\"");

    {
        let cache = Cache::new(CachePolicy::default(), Arc::new(FileStore::at(&path)));
        cache.put("GET /a", stored.clone()).unwrap();
    }

    // Simulated restart
    let reopened = FileStore::new(FileStoreConfig {
        file_path: path,
        pretty_json: true,
    });
    let entry = reopened.get("GET /a").unwrap().unwrap();

    assert_eq!(entry.status, stored.status);
    assert_eq!(entry.body, stored.body);
    assert_eq!(entry.headers, stored.headers);
    assert_eq!(entry.created_at_ms, stored.created_at_ms);
}

#[test]
fn test_prune_persists_for_file_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache.json");
    let policy = CachePolicy::default();
    let now = 10_000_000;

    let cache = Cache::new(policy, Arc::new(FileStore::at(&path)));
    cache.put("keep", response(now)).unwrap();
    cache.put("drop", response(now - policy.stale_if_offline_ms - 1)).unwrap();

    assert_eq!(cache.prune(now).unwrap(), 1);

    let reopened = FileStore::at(&path);
    assert!(reopened.get("keep").unwrap().is_some());
    assert!(reopened.get("drop").unwrap().is_none());
}

// == Idempotence ==

#[test]
fn test_clear_and_erase_are_idempotent() {
    let dir = TempDir::new().unwrap();

    for (name, store) in stores(&dir) {
        store.erase("absent").unwrap();
        store.put("a", response(0)).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        store.erase("a").unwrap();

        assert!(store.is_empty().unwrap(), "{name}: store should be empty");
    }
}

// == LRU ==

#[test]
fn test_lru_access_protects_from_eviction() {
    let max_entries = 4;
    let store = Arc::new(LruMemoryStore::with_capacity(max_entries));
    let cache = Cache::new(CachePolicy::default(), store.clone());

    for i in 0..max_entries {
        cache.put(&format!("k{i}"), response(0)).unwrap();
    }
    // Touch the oldest before the overflowing insert
    assert!(cache.get("k0", 0, CacheContext::online()).unwrap().is_some());
    cache.put("overflow", response(0)).unwrap();

    assert!(store.get("k0").unwrap().is_some());
    assert!(store.get("k1").unwrap().is_none());
    assert_eq!(store.len().unwrap(), max_entries);
    assert_eq!(store.evictions().unwrap(), 1);
}

// == Concurrency ==

#[test]
fn test_concurrent_cache_use() {
    let dir = TempDir::new().unwrap();

    for (name, store) in stores(&dir) {
        let cache = Arc::new(Cache::new(CachePolicy::default(), store));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..10 {
                        let key = format!("t{t}-{}", i % 3);
                        cache.put(&key, response(0)).unwrap();
                        assert!(cache.get(&key, 0, CacheContext::online()).unwrap().is_some());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.store().len().unwrap(), 12, "{name}");
        assert_eq!(cache.stats().hits, 40, "{name}");
    }
}

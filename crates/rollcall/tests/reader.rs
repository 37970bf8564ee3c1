// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for `CachedReader::get_all()` on a single caller.

use rollcall::{CacheKey, CachedReader, ReadPath, StoreErrorKind, TelemetryConfig};
use rollcall_memory::InMemoryCache;
use rollcall_tier::{
    RecordCache,
    testing::{CacheOp, MockCache, MockStore},
};
use serde::{Deserialize, Serialize};
use testing_aids::LogCapture;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Student {
    id: u32,
    name: String,
}

fn students() -> Vec<Student> {
    vec![
        Student {
            id: 1,
            name: "A".to_string(),
        },
        Student {
            id: 2,
            name: "B".to_string(),
        },
    ]
}

fn quiet<S, C>(store: S, cache: C) -> CachedReader<Student, S, C> {
    CachedReader::builder(store, cache).telemetry(TelemetryConfig::new()).build()
}

#[tokio::test]
async fn cold_then_warm() {
    let store = MockStore::new(students());
    let cache = MockCache::new();
    let reader = quiet(store.clone(), cache.clone());

    let first = reader.get_all().await.unwrap();
    assert_eq!(first, students());
    assert_eq!(store.query_count(), 1);
    assert_eq!(cache.peek(&CacheKey::ALL_RECORDS), Some(students()));

    let second = reader.get_all().await.unwrap();
    assert_eq!(second, first);
    assert_eq!(store.query_count(), 1);
}

#[tokio::test]
async fn warm_reads_return_what_was_set() {
    let store = MockStore::new(students());
    let cache = MockCache::new();
    let reader = quiet(store.clone(), cache);

    reader.get_all().await.unwrap();
    store.set_records(Vec::new());

    for _ in 0..5 {
        let (records, path) = reader.get_all_with_path().await.unwrap();
        assert_eq!(records, students());
        assert_eq!(path, ReadPath::Cache);
    }
    assert_eq!(store.query_count(), 1);
}

#[tokio::test]
async fn empty_collection_is_a_cached_value() {
    let store = MockStore::new(Vec::<Student>::new());
    let cache = InMemoryCache::new();
    let reader = quiet(store.clone(), cache.clone());

    assert_eq!(reader.get_all_with_path().await.unwrap(), (Vec::new(), ReadPath::Store));
    assert_eq!(reader.get_all_with_path().await.unwrap(), (Vec::new(), ReadPath::Cache));
    assert_eq!(store.query_count(), 1);
    assert!(cache.contains_key(&CacheKey::ALL_RECORDS));
}

#[tokio::test]
async fn in_memory_roundtrip_through_reader() {
    let store = MockStore::new(students());
    let cache = InMemoryCache::new();
    let reader = quiet(store, cache.clone());

    reader.get_all().await.unwrap();

    let cached: Option<Vec<Student>> = cache.get(&CacheKey::ALL_RECORDS).await.unwrap();
    assert_eq!(cached, Some(students()));
}

#[tokio::test]
async fn failed_populate_releases_the_gate() {
    let store = MockStore::new(students());
    store.fail_once(StoreErrorKind::Unavailable);
    let cache = MockCache::new();
    let reader = quiet(store.clone(), cache.clone());

    let error = reader.get_all().await.unwrap_err();
    assert_eq!(error.store_error_kind(), StoreErrorKind::Unavailable);
    assert!(cache.peek(&CacheKey::ALL_RECORDS).is_none());
    assert!(!reader.gates().is_held(&CacheKey::ALL_RECORDS));

    assert_eq!(reader.get_all().await.unwrap(), students());
    assert_eq!(store.query_count(), 2);
    assert_eq!(cache.set_count(), 1);
}

#[tokio::test]
async fn persistent_store_failure_fails_every_read() {
    let store = MockStore::new(students());
    store.fail_always(StoreErrorKind::Query);
    let reader = quiet(store.clone(), MockCache::new());

    for _ in 0..3 {
        let error = reader.get_all().await.unwrap_err();
        assert_eq!(error.store_error_kind(), StoreErrorKind::Query);
    }
    assert_eq!(store.query_count(), 3);

    store.clear_failures();
    assert_eq!(reader.get_all().await.unwrap(), students());
}

#[tokio::test]
async fn failing_cache_get_falls_back_to_store() {
    let store = MockStore::new(students());
    let cache = MockCache::with_records(CacheKey::ALL_RECORDS, Vec::new());
    cache.fail_when(|op| matches!(op, CacheOp::Get(_)));
    let reader = quiet(store.clone(), cache);

    for _ in 0..3 {
        let (records, path) = reader.get_all_with_path().await.unwrap();
        assert_eq!(records, students());
        assert_eq!(path, ReadPath::Store);
    }
    assert_eq!(store.query_count(), 3);
}

#[tokio::test]
async fn failing_cache_set_still_returns_records() {
    let store = MockStore::new(students());
    let cache = MockCache::new();
    cache.fail_when(|op| matches!(op, CacheOp::Set { .. }));
    let reader = quiet(store.clone(), cache.clone());

    assert_eq!(reader.get_all().await.unwrap(), students());
    assert!(!cache.contains_key(&CacheKey::ALL_RECORDS));

    assert_eq!(reader.get_all().await.unwrap(), students());
    assert_eq!(store.query_count(), 2);
}

#[tokio::test]
async fn corrupt_cache_value_is_repopulated() {
    let store = MockStore::new(students());
    let cache = InMemoryCache::new();
    cache.set_raw(CacheKey::ALL_RECORDS, b"not json".as_slice().into()).await;
    let reader = quiet(store.clone(), cache.clone());

    let (records, path) = reader.get_all_with_path().await.unwrap();
    assert_eq!(records, students());
    assert_eq!(path, ReadPath::Store);

    let (_, path) = reader.get_all_with_path().await.unwrap();
    assert_eq!(path, ReadPath::Cache);
    assert_eq!(store.query_count(), 1);
}

#[tokio::test]
async fn invalidated_key_populates_once_more() {
    let store = MockStore::new(students());
    let cache = MockCache::new();
    let reader = quiet(store.clone(), cache.clone());

    reader.get_all().await.unwrap();
    cache.remove(&CacheKey::ALL_RECORDS);

    let (_, path) = reader.get_all_with_path().await.unwrap();
    assert_eq!(path, ReadPath::Store);
    let (_, path) = reader.get_all_with_path().await.unwrap();
    assert_eq!(path, ReadPath::Cache);
    assert_eq!(store.query_count(), 2);
}

#[tokio::test]
async fn readers_over_different_keys_do_not_share_entries() {
    let cache = MockCache::new();
    let store_a = MockStore::new(students());
    let store_b = MockStore::new(students()[..1].to_vec());

    let a: CachedReader<Student, _, _> = CachedReader::builder(store_a, cache.clone()).key("a").build();
    let b: CachedReader<Student, _, _> = CachedReader::builder(store_b, cache.clone()).key("b").build();

    assert_eq!(a.get_all().await.unwrap().len(), 2);
    assert_eq!(b.get_all().await.unwrap().len(), 1);
    assert_eq!(cache.peek(&CacheKey::from_static("a")).map(|r| r.len()), Some(2));
    assert_eq!(cache.peek(&CacheKey::from_static("b")).map(|r| r.len()), Some(1));
}

#[tokio::test]
async fn cache_faults_are_logged_as_warnings() {
    let capture = LogCapture::new();
    let _guard = tracing::subscriber::set_default(capture.subscriber());

    let cache = MockCache::new();
    cache.fail_when(|_| true);
    let reader: CachedReader<Student, _, _> = CachedReader::builder(MockStore::new(students()), cache).name("students").build();

    reader.get_all().await.unwrap();

    capture.assert_contains("WARN");
    assert_eq!(capture.count_lines_containing("reader.cache_get_error"), 2);
    assert_eq!(capture.count_lines_containing("reader.cache_set_error"), 1);
    capture.assert_contains("mock: get failed");
}

#[tokio::test]
async fn store_faults_are_logged_as_errors() {
    let capture = LogCapture::new();
    let _guard = tracing::subscriber::set_default(capture.subscriber());

    let store = MockStore::new(students());
    store.fail_once(StoreErrorKind::Unavailable);
    let reader: CachedReader<Student, _, _> = CachedReader::builder(store, MockCache::new()).build();

    let _ = reader.get_all().await.unwrap_err();

    capture.assert_contains("ERROR");
    capture.assert_contains("reader.store_error");
}

//! Tests for capacity eviction and stale-entry retention.

use bytes::Bytes;
use chrono::Utc;
use rescache_backend::{Backend, DeleteStatus};
use rescache_core::{CacheKey, CacheValue, KeyPart};
use rescache_moka::{EvictionPolicy, MokaBackend};

fn make_key(id: u32) -> CacheKey {
    CacheKey::new("test", 1, vec![KeyPart::new("id", Some(id.to_string()))])
}

fn make_value(body: &str, expire_in_secs: i64) -> CacheValue<Bytes> {
    CacheValue::new(
        Bytes::from(body.to_owned()),
        Some(Utc::now() + chrono::Duration::seconds(expire_in_secs)),
    )
}

#[tokio::test]
async fn write_read_remove_roundtrip() {
    let backend = MokaBackend::builder().max_entries(100).build();
    let key = make_key(1);

    assert!(backend.read(&key).await.unwrap().is_none());

    backend.write(&key, make_value("payload", 3600)).await.unwrap();
    let value = backend.read(&key).await.unwrap().unwrap();
    assert_eq!(value.data().as_ref(), b"payload");

    assert_eq!(backend.remove(&key).await.unwrap(), DeleteStatus::Deleted(1));
    assert_eq!(backend.remove(&key).await.unwrap(), DeleteStatus::Missing);
    assert!(backend.read(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn logically_expired_entries_stay_readable() {
    // Expiry is evaluated by the adapter's reader; the backend must keep
    // expired entries physically present for the stale-rescue path.
    let backend = MokaBackend::builder().max_entries(100).build();
    let key = make_key(1);

    backend.write(&key, make_value("old", -60)).await.unwrap();

    let value = backend.read(&key).await.unwrap().unwrap();
    assert_eq!(value.data().as_ref(), b"old");
    assert!(value.expire().unwrap() < Utc::now());
}

#[tokio::test]
async fn capacity_eviction_drops_entries() {
    let backend = MokaBackend::builder()
        .max_entries(3)
        .eviction_policy(EvictionPolicy::lru())
        .build();

    for i in 1..=4 {
        backend
            .write(&make_key(i), make_value("payload", 3600))
            .await
            .unwrap();
    }

    backend.cache().run_pending_tasks().await;

    let mut present = 0;
    for i in 1..=4 {
        if backend.read(&make_key(i)).await.unwrap().is_some() {
            present += 1;
        }
    }
    assert!(present <= 3, "capacity 3 exceeded: {present} entries present");
}

#[tokio::test]
async fn overwrite_replaces_value() {
    let backend = MokaBackend::builder().max_entries(10).build();
    let key = make_key(1);

    backend.write(&key, make_value("first", 3600)).await.unwrap();
    backend.write(&key, make_value("second", 3600)).await.unwrap();

    let value = backend.read(&key).await.unwrap().unwrap();
    assert_eq!(value.data().as_ref(), b"second");
}

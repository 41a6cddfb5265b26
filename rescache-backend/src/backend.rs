use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use rescache_core::{CacheKey, CacheValue, Cacheable, Raw};
use serde::Serialize;

use crate::{BackendError, DeleteStatus};

/// Result alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Raw storage interface of a cache backend.
///
/// Operates on serialized payloads ([`Raw`] bytes wrapped in a
/// [`CacheValue`] that carries the expiry timestamp). All three operations
/// may suspend and may fail; the policy for which failures are fatal lives
/// with the caller, not here.
#[async_trait]
pub trait Backend: Sync + Send {
    /// Reads the stored entry for a key, if present.
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<CacheValue<Raw>>>;

    /// Writes an entry, overwriting any previous value for the key.
    async fn write(&self, key: &CacheKey, value: CacheValue<Raw>) -> BackendResult<()>;

    /// Removes the stored entry for a key.
    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus>;

    /// Returns the name of this backend for log messages.
    fn name(&self) -> &str {
        "backend"
    }
}

#[async_trait]
impl Backend for &dyn Backend {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<CacheValue<Raw>>> {
        (*self).read(key).await
    }

    async fn write(&self, key: &CacheKey, value: CacheValue<Raw>) -> BackendResult<()> {
        (*self).write(key, value).await
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        (*self).remove(key).await
    }

    fn name(&self) -> &str {
        (*self).name()
    }
}

#[async_trait]
impl Backend for Box<dyn Backend> {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<CacheValue<Raw>>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &CacheKey, value: CacheValue<Raw>) -> BackendResult<()> {
        (**self).write(key, value).await
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        (**self).remove(key).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl Backend for Arc<dyn Backend + Send + 'static> {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<CacheValue<Raw>>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &CacheKey, value: CacheValue<Raw>) -> BackendResult<()> {
        (**self).write(key, value).await
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        (**self).remove(key).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// High-level cache backend trait with typed operations.
///
/// Provides typed `get`, `set`, and `delete` on top of [`Backend`],
/// handling JSON encoding and decoding of cached payloads. Default
/// implementations cover every backend; implementors only write the raw
/// byte operations.
pub trait CacheBackend: Backend {
    /// Reads and decodes the stored entry for a key.
    fn get<T>(
        &self,
        key: &CacheKey,
    ) -> impl Future<Output = BackendResult<Option<CacheValue<T>>>> + Send
    where
        T: Cacheable,
    {
        async move {
            match self.read(key).await? {
                Some(value) => {
                    let (expire, raw) = value.into_parts();
                    let data: T = serde_json::from_slice(&raw)?;
                    Ok(Some(CacheValue::new(data, expire)))
                }
                None => Ok(None),
            }
        }
    }

    /// Encodes and writes an entry for a key.
    ///
    /// Only serialization is needed here, so the bound is looser than on
    /// [`get`](CacheBackend::get); this lets callers write a borrowed
    /// payload without cloning it.
    fn set<T>(
        &self,
        key: &CacheKey,
        value: &CacheValue<T>,
    ) -> impl Future<Output = BackendResult<()>> + Send
    where
        T: Serialize + Send + Sync,
    {
        async move {
            let raw = Raw::from(serde_json::to_vec(value.data())?);
            self.write(key, CacheValue::new(raw, value.expire())).await
        }
    }

    /// Removes the stored entry for a key.
    fn delete(&self, key: &CacheKey) -> impl Future<Output = BackendResult<DeleteStatus>> + Send {
        async move { self.remove(key).await }
    }
}

// Explicit CacheBackend implementations for trait objects.
// These use the default implementations from the trait.
impl CacheBackend for &dyn Backend {}

impl CacheBackend for Box<dyn Backend> {}

impl CacheBackend for Arc<dyn Backend + Send + 'static> {}

#[cfg(test)]
mod tests {
    use super::*;
    use dashmap::DashMap;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Default)]
    struct MapBackend {
        store: Arc<DashMap<CacheKey, CacheValue<Raw>>>,
    }

    #[async_trait]
    impl Backend for MapBackend {
        async fn read(&self, key: &CacheKey) -> BackendResult<Option<CacheValue<Raw>>> {
            Ok(self.store.get(key).map(|v| v.clone()))
        }

        async fn write(&self, key: &CacheKey, value: CacheValue<Raw>) -> BackendResult<()> {
            self.store.insert(key.clone(), value);
            Ok(())
        }

        async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
            Ok(match self.store.remove(key) {
                Some(_) => DeleteStatus::Deleted(1),
                None => DeleteStatus::Missing,
            })
        }
    }

    impl CacheBackend for MapBackend {}

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Payload {
        body: String,
        status: u16,
    }

    #[tokio::test]
    async fn typed_get_returns_what_set_stored() {
        let backend = MapBackend::default();
        let key = CacheKey::from_str("url", "/a");
        let payload = Payload {
            body: "hello".into(),
            status: 200,
        };
        let expire = Some(chrono::Utc::now() + chrono::Duration::minutes(5));

        backend
            .set(&key, &CacheValue::new(payload.clone(), expire))
            .await
            .unwrap();

        let read = backend.get::<Payload>(&key).await.unwrap().unwrap();
        assert_eq!(read.data(), &payload);
        assert_eq!(read.expire(), expire);
    }

    #[tokio::test]
    async fn get_on_missing_key_is_none() {
        let backend = MapBackend::default();
        let key = CacheKey::from_str("url", "/missing");
        assert!(backend.get::<Payload>(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_payload_surfaces_format_error() {
        let backend = MapBackend::default();
        let key = CacheKey::from_str("url", "/corrupt");
        backend
            .write(&key, CacheValue::new(Raw::from_static(b"not json"), None))
            .await
            .unwrap();

        let err = backend.get::<Payload>(&key).await.unwrap_err();
        assert!(matches!(err, BackendError::FormatError(_)));
    }

    #[tokio::test]
    async fn delete_reports_missing_records() {
        let backend = MapBackend::default();
        let key = CacheKey::from_str("url", "/a");
        assert_eq!(backend.delete(&key).await.unwrap(), DeleteStatus::Missing);

        backend
            .write(&key, CacheValue::new(Raw::from_static(b"{}"), None))
            .await
            .unwrap();
        assert_eq!(backend.delete(&key).await.unwrap(), DeleteStatus::Deleted(1));
    }
}

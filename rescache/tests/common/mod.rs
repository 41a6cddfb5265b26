//! Shared fixtures for the adapter integration tests: an instrumented
//! in-memory backend, a minimal request type with a URL extractor, and a
//! mock upstream transport.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rescache::backend::{Backend, BackendError, BackendResult, CacheBackend, DeleteStatus};
use rescache::{
    CacheKey, CacheValue, CacheableRequest, Extractor, KeyPart, KeyParts, Raw, Upstream,
};
use serde::{Deserialize, Serialize};

/// In-memory backend that counts every operation and can be told to fail.
#[derive(Clone)]
pub struct TestBackend {
    store: Arc<DashMap<CacheKey, CacheValue<Raw>>>,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    removes: Arc<AtomicUsize>,
    read_budget: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl TestBackend {
    pub fn new() -> Self {
        TestBackend {
            store: Arc::new(DashMap::new()),
            reads: Arc::new(AtomicUsize::new(0)),
            writes: Arc::new(AtomicUsize::new(0)),
            removes: Arc::new(AtomicUsize::new(0)),
            read_budget: Arc::new(AtomicUsize::new(usize::MAX)),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn removes(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }

    /// Reads beyond the first `budget` fail with an internal error.
    pub fn fail_reads_after(&self, budget: usize) {
        self.read_budget.store(budget, Ordering::SeqCst);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn internal_error(message: &str) -> BackendError {
        BackendError::InternalError(Box::new(std::io::Error::other(message.to_string())))
    }
}

#[async_trait]
impl Backend for TestBackend {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<CacheValue<Raw>>> {
        let seen = self.reads.fetch_add(1, Ordering::SeqCst);
        if seen >= self.read_budget.load(Ordering::SeqCst) {
            return Err(Self::internal_error("injected read failure"));
        }
        Ok(self.store.get(key).map(|v| v.clone()))
    }

    async fn write(&self, key: &CacheKey, value: CacheValue<Raw>) -> BackendResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::internal_error("injected write failure"));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.store.insert(key.clone(), value);
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        Ok(match self.store.remove(key) {
            Some(_) => DeleteStatus::Deleted(1),
            None => DeleteStatus::Missing,
        })
    }

    fn name(&self) -> &str {
        "test"
    }
}

impl CacheBackend for TestBackend {}

/// Stores a payload under the key, bypassing the adapter. Counts as one
/// write; tests snapshot counters after seeding.
pub async fn seed(
    backend: &TestBackend,
    key: &CacheKey,
    payload: &Payload,
    expire: Option<DateTime<Utc>>,
) {
    backend
        .set(key, &CacheValue::new(payload, expire))
        .await
        .unwrap();
}

pub fn fresh() -> Option<DateTime<Utc>> {
    Some(Utc::now() + chrono::Duration::minutes(10))
}

pub fn expired() -> Option<DateTime<Utc>> {
    Some(Utc::now() - chrono::Duration::minutes(10))
}

#[derive(Debug, Clone)]
pub struct TestRequest {
    pub method: String,
    pub url: String,
}

impl TestRequest {
    pub fn new(method: &str, url: &str) -> Self {
        TestRequest {
            method: method.to_string(),
            url: url.to_string(),
        }
    }

    pub fn get(url: &str) -> Self {
        TestRequest::new("GET", url)
    }
}

impl CacheableRequest for TestRequest {
    fn method(&self) -> &str {
        &self.method
    }
}

/// Keys requests by their URL.
pub struct UrlExtractor;

#[async_trait]
impl Extractor for UrlExtractor {
    type Subject = TestRequest;

    async fn get(&self, subject: TestRequest) -> KeyParts<TestRequest> {
        let url = subject.url.clone();
        let mut parts = KeyParts::new(subject);
        parts.push(KeyPart::new("url", Some(url.as_str())));
        parts
    }
}

/// The key the [`UrlExtractor`] produces for a URL.
pub fn url_key(url: &str) -> CacheKey {
    CacheKey::from_str("url", url)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub body: String,
    pub status: u16,
}

impl Payload {
    pub fn ok(body: &str) -> Self {
        Payload {
            body: body.to_string(),
            status: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestError(pub &'static str);

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport error: {}", self.0)
    }
}

impl std::error::Error for TestError {}

/// Scripted upstream transport counting its invocations.
pub struct MockUpstream {
    outcome: Result<Payload, TestError>,
    calls: Arc<AtomicUsize>,
}

impl MockUpstream {
    pub fn ok(payload: Payload) -> Self {
        MockUpstream {
            outcome: Ok(payload),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(error: TestError) -> Self {
        MockUpstream {
            outcome: Err(error),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle to the invocation counter, valid after the upstream has been
    /// consumed by the adapter.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Upstream<TestRequest> for MockUpstream {
    type Response = Payload;
    type Error = TestError;

    async fn call(&mut self, _req: &TestRequest) -> Result<Payload, TestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

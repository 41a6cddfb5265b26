//! Cache key extraction from requests.
//!
//! This module provides the [`Extractor`] trait for deriving cache keys
//! from requests.
//!
//! Extractors pull relevant data from requests (like HTTP method, URL and
//! query parameters) and produce [`KeyParts`] that form the cache key.
//! Multiple extractors can be chained to build composite keys; each one
//! takes ownership of the subject and hands it back, so no cloning happens
//! along the chain.
//!
//! The adapter invokes the configured extractor **at most once per
//! request**: an explicitly configured key short-circuits extraction
//! entirely, and a derived key is resolved up front and threaded through
//! the rest of the pipeline.

use std::sync::Arc;

use async_trait::async_trait;

use crate::KeyParts;

/// Trait for extracting cache key components from a subject.
///
/// The `Subject` associated type defines what this extractor processes,
/// typically a request type.
///
/// # Blanket Implementations
///
/// This trait is implemented for:
/// - `&T` where `T: Extractor`
/// - `Box<T>` where `T: Extractor`
/// - `Arc<T>` where `T: Extractor`
#[async_trait]
pub trait Extractor {
    /// The type from which cache key components are extracted.
    type Subject;

    /// Extract cache key components from the subject.
    ///
    /// Returns a [`KeyParts`] containing the subject and accumulated key parts.
    async fn get(&self, subject: Self::Subject) -> KeyParts<Self::Subject>;
}

#[async_trait]
impl<T> Extractor for &T
where
    T: Extractor + ?Sized + Sync,
    T::Subject: Send,
{
    type Subject = T::Subject;

    async fn get(&self, subject: T::Subject) -> KeyParts<T::Subject> {
        (*self).get(subject).await
    }
}

#[async_trait]
impl<T> Extractor for Box<T>
where
    T: Extractor + ?Sized + Sync,
    T::Subject: Send,
{
    type Subject = T::Subject;

    async fn get(&self, subject: T::Subject) -> KeyParts<T::Subject> {
        self.as_ref().get(subject).await
    }
}

#[async_trait]
impl<T> Extractor for Arc<T>
where
    T: Extractor + Send + Sync + ?Sized,
    T::Subject: Send,
{
    type Subject = T::Subject;

    async fn get(&self, subject: T::Subject) -> KeyParts<T::Subject> {
        self.as_ref().get(subject).await
    }
}

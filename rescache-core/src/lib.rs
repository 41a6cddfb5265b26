#![warn(missing_docs)]
//! # rescache-core
//!
//! Core traits and types for the rescache HTTP response caching adapter.
//!
//! This crate provides the foundational abstractions the adapter state
//! machine is composed from. It is deliberately free of any concrete
//! transport or storage implementation:
//!
//! - **Address** cached entries ([`CacheKey`])
//! - **Derive** keys from requests ([`Extractor`])
//! - **Store** payloads with expiry metadata ([`CacheValue`])
//! - **Call** the live transport ([`Upstream`])
//! - **Decide** exclusion and stale reads ([`ExcludePolicy`], [`StaleReadPolicy`])
//! - **Report** response provenance ([`CacheContext`])

pub mod cacheable;
pub mod context;
pub mod extractor;
pub mod key;
pub mod policy;
pub mod request;
pub mod upstream;
pub mod value;

pub use cacheable::Cacheable;
pub use context::{CacheContext, CacheStatus, ResponseSource};
pub use extractor::Extractor;
pub use key::{CacheKey, KeyPart, KeyParts};
pub use policy::{ExcludePolicy, StaleReadPolicy};
pub use request::CacheableRequest;
pub use upstream::Upstream;
pub use value::{CacheState, CacheValue};

/// Raw byte data type used for serialized cache payloads.
/// Using `Bytes` provides cheap zero-copy cloning via reference counting.
pub type Raw = bytes::Bytes;

//! Cache key types and construction.
//!
//! This module provides types for building and representing cache keys:
//!
//! - [`CacheKey`] - The complete cache key with prefix, version, and parts
//! - [`KeyPart`] - A single key-value component of a cache key
//! - [`KeyParts`] - Builder for accumulating key parts during extraction
//!
//! ## Format
//!
//! When serialized to string, keys follow this format:
//! `{prefix}:v{version}:key1=value1&key2=value2`
//!
//! - Prefix is omitted if empty
//! - Version is omitted if zero
//!
//! ```
//! use rescache_core::{CacheKey, KeyPart};
//!
//! let key = CacheKey::new("api", 1, vec![KeyPart::new("id", Some("42"))]);
//! assert_eq!(format!("{}", key), "api:v1:id=42");
//!
//! let key = CacheKey::new("", 0, vec![KeyPart::new("id", Some("42"))]);
//! assert_eq!(format!("{}", key), "id=42");
//! ```
//!
//! [`CacheKey`] uses `Arc` internally, so cloning a key only increments a
//! reference count. An explicitly configured key can therefore be reused
//! verbatim across repeated resolutions without recomputation.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;
use std::sync::Arc;

/// Inner structure containing the actual cache key data.
/// Wrapped in Arc for cheap cloning.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
struct CacheKeyInner {
    parts: Vec<KeyPart>,
    version: u32,
    prefix: SmolStr,
}

/// A cache key identifying a cached entry.
///
/// Cache keys are composed of:
/// - A **prefix** for namespacing (e.g., "api", "users")
/// - A **version** number for wholesale invalidation
/// - A list of **parts** (key-value pairs) derived from requests
///
/// `CacheKey` wraps its data in [`Arc`], making `clone()` an O(1) operation.
/// Keys are passed around through every stage of the adapter pipeline, so
/// cheap cloning matters.
///
/// # Example
///
/// ```
/// use rescache_core::{CacheKey, KeyPart};
///
/// let key = CacheKey::new(
///     "api",
///     1,
///     vec![
///         KeyPart::new("method", Some("GET")),
///         KeyPart::new("path", Some("/users/123")),
///     ],
/// );
///
/// assert_eq!(key.prefix(), "api");
/// assert_eq!(key.version(), 1);
/// assert_eq!(format!("{}", key), "api:v1:method=GET&path=/users/123");
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    inner: Arc<CacheKeyInner>,
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Compact format: prefix:v{version}:key=value&key2=value2
        if !self.inner.prefix.is_empty() {
            write!(f, "{}:", self.inner.prefix)?;
        }
        if self.inner.version > 0 {
            write!(f, "v{}:", self.inner.version)?;
        }
        for (i, part) in self.inner.parts.iter().enumerate() {
            if i > 0 {
                write!(f, "&")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

impl CacheKey {
    /// Creates a new cache key with the given components.
    pub fn new(prefix: impl Into<SmolStr>, version: u32, parts: Vec<KeyPart>) -> Self {
        CacheKey {
            inner: Arc::new(CacheKeyInner {
                parts,
                version,
                prefix: prefix.into(),
            }),
        }
    }

    /// Creates a simple cache key with a single key-value part.
    ///
    /// The prefix is empty and version is 0.
    pub fn from_str(key: &str, value: &str) -> Self {
        CacheKey::new("", 0, vec![KeyPart::new(key, Some(value))])
    }

    /// Creates a cache key from a slice of key-value pairs.
    ///
    /// The prefix is empty and version is 0.
    pub fn from_slice(parts: &[(&str, Option<&str>)]) -> Self {
        let parts = parts
            .iter()
            .map(|(key, value)| KeyPart::new(key, *value))
            .collect();
        CacheKey::new("", 0, parts)
    }

    /// Returns an iterator over the key parts.
    pub fn parts(&self) -> impl Iterator<Item = &KeyPart> {
        self.inner.parts.iter()
    }

    /// Returns the cache key version number.
    pub fn version(&self) -> u32 {
        self.inner.version
    }

    /// Returns the cache key prefix.
    pub fn prefix(&self) -> &str {
        &self.inner.prefix
    }
}

/// A single component of a cache key.
///
/// Each part represents a key-value pair derived from a request. The value
/// is optional - some parts may be key-only flags.
///
/// Both key and value use [`SmolStr`], which stores short strings inline
/// without heap allocation. Typical components like "method" or "GET" never
/// allocate.
///
/// # Example
///
/// ```
/// use rescache_core::KeyPart;
///
/// let method = KeyPart::new("method", Some("GET"));
/// assert_eq!(method.key(), "method");
/// assert_eq!(method.value(), Some("GET"));
///
/// let flag = KeyPart::new("compressed", None::<&str>);
/// assert_eq!(flag.value(), None);
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct KeyPart {
    key: SmolStr,
    value: Option<SmolStr>,
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)?;
        if let Some(ref value) = self.value {
            write!(f, "={}", value)?;
        }
        Ok(())
    }
}

impl KeyPart {
    /// Creates a new key part.
    pub fn new<K: AsRef<str>, V: AsRef<str>>(key: K, value: Option<V>) -> Self {
        KeyPart {
            key: SmolStr::new(key),
            value: value.map(SmolStr::new),
        }
    }

    /// Returns the key name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the optional value.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// Builder for accumulating cache key parts during extraction.
///
/// `KeyParts` carries both the subject being processed and the accumulated
/// key parts. Extractors receive a `KeyParts<T>`, add their parts, and
/// return it for the next extractor in the chain. Finally
/// [`into_cache_key`](KeyParts::into_cache_key) hands back the subject
/// together with the finished [`CacheKey`].
#[derive(Debug)]
pub struct KeyParts<T: Sized> {
    subject: T,
    parts: Vec<KeyPart>,
}

impl<T> KeyParts<T> {
    /// Creates a new `KeyParts` wrapping the given subject.
    pub fn new(subject: T) -> Self {
        KeyParts {
            subject,
            parts: Vec::new(),
        }
    }

    /// Adds a single key part.
    pub fn push(&mut self, part: KeyPart) {
        self.parts.push(part)
    }

    /// Appends multiple key parts from a vector.
    pub fn append(&mut self, parts: &mut Vec<KeyPart>) {
        self.parts.append(parts)
    }

    /// Consumes the builder and returns the subject with its cache key.
    ///
    /// The returned cache key has an empty prefix and version 0.
    pub fn into_cache_key(self) -> (T, CacheKey) {
        (self.subject, CacheKey::new("", 0, self.parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_omits_empty_prefix_and_zero_version() {
        let key = CacheKey::new("", 0, vec![KeyPart::new("id", Some("1"))]);
        assert_eq!(key.to_string(), "id=1");

        let key = CacheKey::new("api", 0, vec![KeyPart::new("id", Some("1"))]);
        assert_eq!(key.to_string(), "api:id=1");

        let key = CacheKey::new("", 3, vec![KeyPart::new("id", Some("1"))]);
        assert_eq!(key.to_string(), "v3:id=1");
    }

    #[test]
    fn value_less_parts_render_as_flags() {
        let key = CacheKey::from_slice(&[("method", Some("GET")), ("cached", None)]);
        assert_eq!(key.to_string(), "method=GET&cached");
    }

    #[test]
    fn clones_compare_equal() {
        let key = CacheKey::from_str("url", "https://example.com/a?b=1");
        let clone = key.clone();
        assert_eq!(key, clone);
        assert_eq!(key.to_string(), clone.to_string());
    }

    #[test]
    fn key_parts_roundtrip_subject() {
        let mut parts = KeyParts::new("request");
        parts.push(KeyPart::new("method", Some("GET")));
        parts.push(KeyPart::new("path", Some("/a")));
        let (subject, key) = parts.into_cache_key();
        assert_eq!(subject, "request");
        assert_eq!(key.to_string(), "method=GET&path=/a");
    }
}

use serde::{Serialize, de::DeserializeOwned};

/// Trait alias abstracting the serialization requirements for cached
/// payloads.
///
/// Any type that is serde-serializable in both directions and safe to move
/// across tasks can be persisted by the adapter. Blanket-implemented; never
/// implement it manually.
pub trait Cacheable: Serialize + DeserializeOwned + Send + Sync {}

impl<T> Cacheable for T where T: Serialize + DeserializeOwned + Send + Sync {}

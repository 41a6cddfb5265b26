#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod config;
mod error;
mod fsm;
mod persister;
mod reader;

pub use config::{CacheOptions, ResolvedContext};
pub use error::{Error, ReadMiss};
pub use fsm::{Cache, CacheBuilder, NotSet};

pub use rescache_core::{
    CacheContext, CacheKey, CacheState, CacheStatus, CacheValue, Cacheable, CacheableRequest,
    ExcludePolicy, Extractor, KeyPart, KeyParts, Raw, ResponseSource, StaleReadPolicy, Upstream,
};

/// Store seam re-exports.
pub mod backend {
    pub use rescache_backend::{Backend, BackendError, BackendResult, CacheBackend, DeleteStatus};
}

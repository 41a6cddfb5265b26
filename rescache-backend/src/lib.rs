#![warn(missing_docs)]
//! Traits and structs for rescache backend interaction.
//!
//! A backend is the persistent key-value store the adapter reads cached
//! responses from and writes them to. The adapter never assumes in-process
//! exclusivity over a store: entries may be created or evicted at any time
//! by other adapter instances sharing the same backend.
//!
//! If you want to implement your own backend, you are in the right place.

mod backend;
mod error;

pub use backend::{Backend, BackendResult, CacheBackend};
pub use error::BackendError;

/// Status of a delete operation.
#[derive(Debug, PartialEq, Eq)]
pub enum DeleteStatus {
    /// Record successfully deleted.
    Deleted(u32),
    /// Record already missing.
    Missing,
}

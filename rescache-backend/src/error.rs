//! Error types for backend operations.

use thiserror::Error;

/// Error type for backend operations.
///
/// Categorizes errors occurring during store interaction. The adapter
/// treats read and write failures as fatal for the surrounding request;
/// removal failures are logged and swallowed.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Internal backend error, state or computation error.
    ///
    /// Any error not related to network interaction.
    #[error(transparent)]
    InternalError(Box<dyn std::error::Error + Send>),

    /// Network interaction error.
    ///
    /// Errors occurring during communication with remote backends.
    #[error(transparent)]
    ConnectionError(Box<dyn std::error::Error + Send>),

    /// Serialization or deserialization error for stored payloads.
    #[error(transparent)]
    FormatError(#[from] serde_json::Error),
}

//! Session error types.

use thiserror::Error;

/// Errors that can occur when reading or writing session state.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// The backing store is unusable (e.g. a writer panicked mid-update).
    #[error("Store operation failed: {0}")]
    StoreError(String),
}

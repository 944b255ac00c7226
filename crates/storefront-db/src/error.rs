//! Error types for the persistence layer.
//!
//! Only writes and file access fail. Reading a missing or corrupt key is
//! not an error: the codec falls back to defaults and reports it in a
//! [`LoadReport`](crate::LoadReport).

/// Errors that can occur in the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A value does not fit the store's integer width.
    #[error("Value {value} for key {key} exceeds the store's integer range")]
    OutOfRange {
        /// The key being written.
        key: String,
        /// The value that did not fit.
        value: u64,
    },
}

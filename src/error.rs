use thiserror::Error;

/// Error types for zio streams.
///
/// Every variant is terminal for the stream that produced it: there is no
/// resumption and no partial-record recovery.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying I/O errors from the backend, propagated unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A read needed more bytes than the backend can ever supply.
    #[error("Unexpected end of stream: needed {needed} bytes, {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// A string's UTF-8 encoding does not fit the 2-byte length prefix.
    #[error("String of {len} bytes exceeds the {limit}-byte encoding limit")]
    OversizedString { len: usize, limit: usize },

    /// A re-population read found a different item count than the target collection holds.
    #[error("Count mismatch: expected {expected} items, stream holds {found}")]
    CountMismatch { expected: usize, found: usize },

    /// A re-population read found a different key than the target map holds at that position.
    #[error("Key mismatch at index {index}: expected {expected:?}, stream holds {found:?}")]
    KeyMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    /// A primitive operation was invoked after `close()`.
    #[error("Stream is closed")]
    Closed,

    /// A writer's backend failed earlier; pending bytes were discarded and
    /// the stream accepts nothing further.
    #[error("Stream failed: {discarded} buffered bytes were not written")]
    Failed { discarded: usize },

    /// The backend cannot answer this operation (e.g. size queries on a wrapped stream).
    #[error("Operation not supported by this backend: {operation}")]
    Unsupported { operation: &'static str },

    /// The stream contained bytes that do not decode to a valid value.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// A record carried a version newer than the reader understands.
    #[error("Unsupported version {found} (newest known is {max})")]
    UnsupportedVersion { found: i32, max: i32 },

    /// A stream was constructed with unusable settings.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl Error {
    /// Create a new `InvalidData` error with a descriptive message.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a new `InvalidConfig` error with a descriptive message.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a new `CountMismatch` error.
    pub fn count_mismatch(expected: usize, found: usize) -> Self {
        Self::CountMismatch { expected, found }
    }

    /// Create a new `KeyMismatch` error.
    pub fn key_mismatch(index: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::KeyMismatch {
            index,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }
}

/// Result type alias for zio operations.
pub type Result<T> = std::result::Result<T, Error>;

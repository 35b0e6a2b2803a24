//! Error types and result aliases shared across ephjob crates.

/// The result type used throughout ephjob.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in core ephjob operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An invalid job key was provided.
    #[error("invalid job key: {message}")]
    InvalidKey {
        /// Description of what made the key invalid.
        message: String,
    },
}

impl Error {
    /// Creates a new invalid-key error with the given message.
    #[must_use]
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }
}

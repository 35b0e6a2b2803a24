//! Error types for the watch-event trigger layer.
//!
//! Nothing in this module escapes an event handler: classification failures
//! degrade to "this event produces no trigger" and the periodic resync
//! backstop recovers. The structured variants exist so collaborators and
//! tests can distinguish failure causes.

use ephjob_core::error::Error as CoreError;

/// The result type used throughout ephjob-watch.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in trigger-layer operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An event payload was not of the expected resource kind.
    #[error("kind mismatch: expected {expected}, got {actual}")]
    KindMismatch {
        /// The kind the classifier expected.
        expected: &'static str,
        /// The kind actually carried by the event.
        actual: &'static str,
    },

    /// The namespace listing capability failed.
    #[error("job listing failed: {message}")]
    Lister {
        /// Description of the listing failure.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A trigger-queue operation failed.
    #[error("trigger queue error: {message}")]
    Queue {
        /// Description of the queue failure.
        message: String,
    },

    /// An expectation-tracker operation failed.
    #[error("expectation tracker error: {message}")]
    Expectations {
        /// Description of the tracker failure.
        message: String,
    },

    /// An error from ephjob-core.
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

impl Error {
    /// Creates a new lister error.
    #[must_use]
    pub fn lister(message: impl Into<String>) -> Self {
        Self::Lister {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new lister error with a source.
    #[must_use]
    pub fn lister_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Lister {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new trigger-queue error.
    #[must_use]
    pub fn queue(message: impl Into<String>) -> Self {
        Self::Queue {
            message: message.into(),
        }
    }

    /// Creates a new expectation-tracker error.
    #[must_use]
    pub fn expectations(message: impl Into<String>) -> Self {
        Self::Expectations {
            message: message.into(),
        }
    }
}
